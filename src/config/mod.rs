//! Application configuration.
//!
//! Aggregates configuration from all modules into a single Config struct
//! that can be loaded from YAML files or environment variables.

mod business;
mod client;

pub use business::{
    CheckoutConfig, FeedbackConfig, DEFAULT_CURRENCY, DEFAULT_LOCATION,
    DEFAULT_SUCCESS_INDICATOR_MS,
};
pub use client::{ApiConfig, DEFAULT_TIMEOUT_SECS};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "decorhub.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "DECORHUB_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "DECORHUB";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "DECORHUB_LOG";

/// Environment variable carrying the identity provider's access token.
pub const TOKEN_ENV_VAR: &str = "DECORHUB_TOKEN";
/// Environment variable for the signed-in user's email.
pub const USER_EMAIL_ENV_VAR: &str = "DECORHUB_USER_EMAIL";
/// Environment variable for the signed-in user's display name.
pub const USER_NAME_ENV_VAR: &str = "DECORHUB_USER_NAME";

use serde::Deserialize;

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend connection.
    pub api: ApiConfig,
    /// Checkout defaults.
    pub checkout: CheckoutConfig,
    /// User feedback timings.
    pub feedback: FeedbackConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `decorhub.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later, at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid("api.timeout_secs must be positive".into()));
        }
        if self.checkout.default_location.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "checkout.default_location must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Create config for testing.
    pub fn for_test() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.checkout.default_location, "Dhaka");
        assert_eq!(config.checkout.currency, "BDT");
        assert_eq!(config.feedback.success_indicator_ms, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_config_mapping() {
        let mut config = Config::for_test();
        config.api.timeout_secs = 7;
        let client = config.api.client_config();
        assert_eq!(client.base_url, "http://localhost:3000");
        assert_eq!(client.timeout, std::time::Duration::from_secs(7));
    }

    #[test]
    fn test_validate_rejects_empty_location() {
        let mut config = Config::for_test();
        config.checkout.default_location = "  ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    #[serial]
    fn test_load_from_file_and_env() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "api:\n  base_url: https://api.decorhub.test\ncheckout:\n  default_location: Sylhet"
        )
        .unwrap();

        std::env::set_var("DECORHUB__API__TIMEOUT_SECS", "9");
        let loaded = Config::load(file.path().to_str());
        std::env::remove_var("DECORHUB__API__TIMEOUT_SECS");

        let config = loaded.unwrap();
        assert_eq!(config.api.base_url, "https://api.decorhub.test");
        assert_eq!(config.api.timeout_secs, 9);
        assert_eq!(config.checkout.default_location, "Sylhet");
        assert_eq!(config.feedback.success_indicator_ms, 3000);
    }

    #[test]
    #[serial]
    fn test_load_missing_explicit_file_fails() {
        let result = Config::load(Some("/nonexistent/decorhub.yaml"));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
