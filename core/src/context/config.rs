//! Dashboard configuration
//!
//! The config type itself lives in conflux-types so views can read it; this
//! module adds persistence through confy and validation.

use std::path::PathBuf;

pub use conflux_types::{CachePolicy, DashboardConfig};

use super::error::ConfigError;

const APP_NAME: &str = "conflux";
const CONFIG_NAME: &str = "config";

/// Location of the persisted config file, if the platform has a config dir.
pub fn config_path() -> Option<PathBuf> {
    confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).ok()
}

/// Extension trait for DashboardConfig persistence
pub trait DashboardConfigExt: Sized {
    /// Load the stored config, falling back to defaults if it is missing or unreadable.
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn validate(&self) -> Result<(), ConfigError>;
}

impl DashboardConfigExt for DashboardConfig {
    fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "Using default configuration");
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self, ConfigError> {
        let config: DashboardConfig = confy::load(APP_NAME, CONFIG_NAME)?;
        config.validate()?;
        Ok(config)
    }

    fn save(&self) -> Result<(), ConfigError> {
        self.validate()?;
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::InvalidValue {
                key: "top_n",
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(path) = &self.data_path
            && path.trim().is_empty()
        {
            return Err(ConfigError::InvalidValue {
                key: "data_path",
                reason: "must not be blank".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(DashboardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let config = DashboardConfig {
            top_n: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "top_n", .. })
        ));
    }

    #[test]
    fn test_blank_data_path_rejected() {
        let config = DashboardConfig {
            data_path: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
