use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::domain::model::{RepairRequest, Resource, User, WorkOrder};
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_stock_bounds, Validate};

/// TOML seed file describing the initial portal state: users, the resource
/// inventory, and optionally pre-existing requests and work orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub portal: PortalMeta,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub requests: Vec<RepairRequest>,
    #[serde(default)]
    pub work_orders: Vec<WorkOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalMeta {
    pub name: String,
    pub description: String,
    pub version: String,
}

impl SeedConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PortalError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| PortalError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` placeholders with environment values; unknown
    /// variables are left in place so validation can flag them.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid");
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("portal.name", &self.portal.name)?;

        let mut user_ids = HashSet::new();
        for user in &self.users {
            validate_non_empty_string("users.name", &user.name)?;
            validate_non_empty_string("users.email", &user.email)?;
            if !user_ids.insert(user.id.as_str()) {
                return Err(PortalError::InvalidConfigValueError {
                    field: "users.id".to_string(),
                    value: user.id.clone(),
                    reason: "duplicate user id".to_string(),
                });
            }
        }

        let mut resource_ids = HashSet::new();
        for resource in &self.resources {
            validate_stock_bounds("resources.available", resource.available, resource.quantity)?;
            if !resource_ids.insert(resource.id.as_str()) {
                return Err(PortalError::InvalidConfigValueError {
                    field: "resources.id".to_string(),
                    value: resource.id.clone(),
                    reason: "duplicate resource id".to_string(),
                });
            }
        }

        let mut request_ids = HashSet::new();
        for request in &self.requests {
            if !user_ids.contains(request.submitted_by.as_str()) {
                return Err(PortalError::InvalidConfigValueError {
                    field: "requests.submitted_by".to_string(),
                    value: request.submitted_by.clone(),
                    reason: "references an unknown user".to_string(),
                });
            }
            if let Some(date) = request.estimated_completion_date {
                if date < request.submitted_at {
                    return Err(PortalError::InvalidConfigValueError {
                        field: "requests.estimated_completion_date".to_string(),
                        value: date.to_rfc3339(),
                        reason: "precedes the submission timestamp".to_string(),
                    });
                }
            }
            if !request_ids.insert(request.id.as_str()) {
                return Err(PortalError::InvalidConfigValueError {
                    field: "requests.id".to_string(),
                    value: request.id.clone(),
                    reason: "duplicate request id".to_string(),
                });
            }
        }

        for order in &self.work_orders {
            if !request_ids.contains(order.request_id.as_str()) {
                return Err(PortalError::InvalidConfigValueError {
                    field: "work_orders.request_id".to_string(),
                    value: order.request_id.clone(),
                    reason: "references an unknown request".to_string(),
                });
            }
            for alloc in &order.resources {
                if !resource_ids.contains(alloc.resource_id.as_str()) {
                    return Err(PortalError::InvalidConfigValueError {
                        field: "work_orders.resources".to_string(),
                        value: alloc.resource_id.clone(),
                        reason: "references an unknown resource".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Validate for SeedConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
