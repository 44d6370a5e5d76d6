//! Configuration management for the vendor management server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with VMS_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Signing key used when none is configured. Rejected in production.
pub const FALLBACK_JWT_SECRET: &str = "default_secret";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production, test)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Logo upload configuration
    pub uploads: UploadConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Token expiration in seconds
    pub expires_in_secs: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Directory logos are written to
    pub dir: String,

    /// Largest accepted logo, in bytes
    pub max_file_size: usize,

    /// URL prefix the upload directory is served under
    pub public_path: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("VMS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 5)?
            .set_default("database.min_connections", 0)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("jwt.secret", FALLBACK_JWT_SECRET)?
            .set_default("jwt.expires_in_secs", 86400)?
            .set_default("uploads.dir", "images")?
            .set_default("uploads.max_file_size", 5 * 1024 * 1024)?
            .set_default("uploads.public_path", "/images")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (VMS_ prefix)
            .add_source(
                Environment::with_prefix("VMS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that are unsafe for the current environment
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_production() && self.jwt.secret == FALLBACK_JWT_SECRET {
            return Err(ConfigError::Message(
                "jwt.secret must be configured explicitly in production".to_string(),
            ));
        }
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".to_string()));
        }
        if self.jwt.expires_in_secs <= 0 {
            return Err(ConfigError::Message(
                "jwt.expires_in_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: FALLBACK_JWT_SECRET.to_string(),
            expires_in_secs: 86400,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: "images".to_string(),
            max_file_size: 5 * 1024 * 1024,
            public_path: "/images".to_string(),
        }
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for unit tests, with logos written under `upload_dir`
    pub fn for_tests(upload_dir: &std::path::Path) -> Self {
        Self {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "postgres://localhost/vendors_test".to_string(),
                max_connections: 1,
                min_connections: 0,
                acquire_timeout_secs: 1,
            },
            jwt: JwtConfig {
                secret: "test-secret-key".to_string(),
                expires_in_secs: 3600,
            },
            uploads: UploadConfig {
                dir: upload_dir.to_string_lossy().into_owned(),
                ..UploadConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_secret_allowed_outside_production() {
        let mut config = Config::for_tests(std::path::Path::new("images"));
        config.jwt = JwtConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fallback_secret_rejected_in_production() {
        let mut config = Config::for_tests(std::path::Path::new("images"));
        config.environment = "production".to_string();
        config.jwt = JwtConfig::default();
        assert!(config.validate().is_err());

        config.jwt.secret = "a-real-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_positive_expiry_rejected() {
        let mut config = Config::for_tests(std::path::Path::new("images"));
        config.jwt.expires_in_secs = 0;
        assert!(config.validate().is_err());
    }
}
