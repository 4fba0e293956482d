use std::env;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Letterhead printed on quotation documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConfig {
    pub name: String,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CompanyConfig {
    /// Expected environment variables:
    /// - COMPANY_NAME (defaults to "Event Planner")
    /// - COMPANY_ADDRESS, COMPANY_EMAIL, COMPANY_PHONE (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = CompanyConfig {
            name: env::var("COMPANY_NAME").unwrap_or_else(|_| "Event Planner".to_string()),
            address: env::var("COMPANY_ADDRESS").ok().filter(|s| !s.trim().is_empty()),
            email: env::var("COMPANY_EMAIL").ok().filter(|s| !s.trim().is_empty()),
            phone: env::var("COMPANY_PHONE").ok().filter(|s| !s.trim().is_empty()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError("Company name cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for CompanyConfig {
    fn default() -> Self {
        CompanyConfig {
            name: "Event Planner".to_string(),
            address: None,
            email: None,
            phone: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CompanyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut config = CompanyConfig::default();
        config.name = "   ".to_string();
        assert!(config.validate().is_err());
    }
}
