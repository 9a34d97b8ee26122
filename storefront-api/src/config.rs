//! Service configuration, loaded from TOML.

use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::application_service::Credentials;

/// Environment variable that overrides [`JwtConfig::key`].
pub const JWT_KEY_ENV: &str = "STOREFRONT_JWT_KEY";

/// Longest accepted token lifetime: one year.
pub const MAX_EXPIRY_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP listen address
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Load the starter products and users on startup
    #[serde(default = "default_seed")]
    pub seed: bool,

    #[serde(default)]
    pub jwt: JwtConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Symmetric signing key
    #[serde(default = "default_jwt_key")]
    pub key: String,

    #[serde(default = "default_issuer")]
    pub issuer: String,

    #[serde(default = "default_audience")]
    pub audience: String,

    /// Token lifetime in minutes
    #[serde(default = "default_expiry_minutes")]
    pub expiry_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_login")]
    pub username: String,

    #[serde(default = "default_login")]
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            seed: default_seed(),
            jwt: JwtConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            key: default_jwt_key(),
            issuer: default_issuer(),
            audience: default_audience(),
            expiry_minutes: default_expiry_minutes(),
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            username: default_login(),
            password: default_login(),
        }
    }
}

impl From<&CredentialsConfig> for Credentials {
    fn from(config: &CredentialsConfig) -> Self {
        Credentials {
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

impl ServiceConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies overrides taken from the process environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(JWT_KEY_ENV) {
            self.jwt.key = key;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.key.is_empty() {
            return Err(ConfigError::Invalid("jwt.key must not be empty".into()));
        }
        if !(1..=MAX_EXPIRY_MINUTES).contains(&self.jwt.expiry_minutes) {
            return Err(ConfigError::Invalid(format!(
                "jwt.expiry_minutes must be between 1 and {MAX_EXPIRY_MINUTES}"
            )));
        }
        Ok(())
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_seed() -> bool {
    true
}

fn default_jwt_key() -> String {
    "storefront-development-signing-key-change-me".to_string()
}

fn default_issuer() -> String {
    "storefront-api".to_string()
}

fn default_audience() -> String {
    "storefront-clients".to_string()
}

fn default_expiry_minutes() -> i64 {
    60
}

fn default_login() -> String {
    "string".to_string()
}
