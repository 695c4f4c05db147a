//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use blog_core::Credentials;
use chrono_tz::Tz;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// A sqlx SQLite URL, or `memory` for a non-durable store.
    pub database_url: String,
    pub log_level: Level,
    pub credentials: Credentials,
    pub display_timezone: Tz,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Server and Database Settings ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:5000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://blog.db?mode=rwc".to_string());

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Login Gate ---
        let username = lookup("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string());
        let password = lookup("ADMIN_PASSWORD").unwrap_or_else(|| "password123".to_string());
        if username.is_empty() {
            return Err(ConfigError::InvalidValue(
                "ADMIN_USERNAME".to_string(),
                "must not be empty".to_string(),
            ));
        }

        // --- Collaborators ---
        let tz_str = lookup("DISPLAY_TIMEZONE").unwrap_or_else(|| "America/Toronto".to_string());
        let display_timezone = tz_str.parse::<Tz>().map_err(|e| {
            ConfigError::InvalidValue("DISPLAY_TIMEZONE".to_string(), e.to_string())
        })?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            credentials: Credentials::new(username, password),
            display_timezone,
        })
    }
}
