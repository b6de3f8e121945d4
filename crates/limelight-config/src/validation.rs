//! Schema validation for loaded configuration (no filesystem checks).

use crate::config::LimelightConfig;
use crate::error::{ConfigError, Result};

/// Validate a configuration after paths have been rooted.
pub fn validate(config: &LimelightConfig) -> Result<()> {
    if config.environment.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "environment".to_string(),
            hint: "environment name cannot be empty".to_string(),
        });
    }

    for (name, path) in &config.gems {
        if name.is_empty() || name.contains('/') {
            return Err(ConfigError::InvalidGem {
                name: name.clone(),
                reason: "gem names must be non-empty and cannot contain '/'".to_string(),
            });
        }
        if !path.is_absolute() {
            return Err(ConfigError::InvalidGem {
                name: name.clone(),
                reason: format!("gem path {} is not absolute", path.display()),
            });
        }
    }

    for suffix in &config.css.module_suffixes {
        if !suffix.starts_with('.') {
            return Err(ConfigError::InvalidValue {
                field: "css.module_suffixes".to_string(),
                hint: format!("suffix '{suffix}' must start with '.'"),
            });
        }
    }

    Ok(())
}
