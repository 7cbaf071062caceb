use crate::utils::error::{PortalError, Result};
use chrono::NaiveTime;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PortalError::ValidationError {
            field: field_name.to_string(),
            reason: "value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| PortalError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Inventory invariant: 0 <= available <= quantity (the lower bound holds by
/// type, the upper bound is checked here).
pub fn validate_stock_bounds(field_name: &str, available: u32, quantity: u32) -> Result<()> {
    if available > quantity {
        return Err(PortalError::ValidationError {
            field: field_name.to_string(),
            reason: format!(
                "available ({}) cannot exceed total quantity ({})",
                available, quantity
            ),
        });
    }
    Ok(())
}

/// Parses a schedule time-of-day given as "HH:MM".
pub fn validate_time_of_day(field_name: &str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| PortalError::ValidationError {
        field: field_name.to_string(),
        reason: format!("expected HH:MM time of day, got '{}' ({})", value, e),
    })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
