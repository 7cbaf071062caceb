use crate::domain::model::{RequestStatus, UserRole};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Validation failed for {field}: {reason}")]
    ValidationError { field: String, reason: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Role {role} is not allowed to {action}")]
    Forbidden { role: UserRole, action: &'static str },

    #[error("Illegal status transition: {from} -> {to}")]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("Insufficient {resource}: requested {requested}, available {available}")]
    InsufficientResources {
        resource: String,
        requested: u32,
        available: u32,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Report generation error: {message}")]
    ReportError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

impl PortalError {
    /// Short message suitable for a toast/banner, never a stack trace.
    pub fn user_friendly_message(&self) -> String {
        match self {
            PortalError::ValidationError { field, reason } => {
                format!("Please check the '{}' field: {}", field, reason)
            }
            PortalError::NotFound { entity, id } => {
                format!("The {} '{}' could not be found.", entity, id)
            }
            PortalError::Forbidden { role, action } => {
                format!("Your account ({}) is not permitted to {}.", role, action)
            }
            PortalError::InvalidTransition { from, to } => {
                format!("A {} request cannot be moved to {}.", from, to)
            }
            PortalError::InsufficientResources {
                resource,
                requested,
                available,
            } => format!(
                "Not enough {} in stock: requested {}, only {} available.",
                resource, requested, available
            ),
            PortalError::ConfigError { .. }
            | PortalError::InvalidConfigValueError { .. }
            | PortalError::MissingConfigError { .. } => {
                format!("Configuration problem: {}", self)
            }
            other => format!("Operation failed: {}", other),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PortalError::ValidationError { .. } => "Correct the highlighted field and retry",
            PortalError::NotFound { .. } => "Check the identifier and refresh the list",
            PortalError::Forbidden { .. } => "Sign in with an account that holds the required role",
            PortalError::InvalidTransition { .. } => {
                "Review the request's current status before updating it"
            }
            PortalError::InsufficientResources { .. } => {
                "Restock the resource or reduce the requested quantity"
            }
            PortalError::IoError(_) => "Check file paths and permissions",
            PortalError::ConfigError { .. }
            | PortalError::InvalidConfigValueError { .. }
            | PortalError::MissingConfigError { .. } => "Fix the seed/config file and rerun",
            _ => "Retry the operation; report the issue if it persists",
        }
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
