//! Startup configuration for the recipes binary

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Prefix of every environment variable read by [`BootstrapConfig::load`]
pub const ENV_PREFIX: &str = "RECIPES";

/// Settings applied once at startup
///
/// # Environment Variables
/// - `RECIPES__SUPERUSER_EMAIL`: email of the superuser to create if missing
/// - `RECIPES__SUPERUSER_PASSWORD`: password for that superuser
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootstrapConfig {
    pub superuser_email: Option<String>,
    pub superuser_password: Option<String>,
}

impl BootstrapConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Email and password when a superuser should be ensured
    ///
    /// Fails when an email is configured without a password.
    pub fn superuser(&self) -> Result<Option<(&str, &str)>, ConfigError> {
        match (&self.superuser_email, &self.superuser_password) {
            (Some(email), Some(password)) => Ok(Some((email.as_str(), password.as_str()))),
            (Some(_), None) => Err(ConfigError::Message(format!(
                "{}__SUPERUSER_PASSWORD must be set together with {}__SUPERUSER_EMAIL",
                ENV_PREFIX, ENV_PREFIX
            ))),
            (None, _) => Ok(None),
        }
    }
}
