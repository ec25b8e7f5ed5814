//! Configuration management for the lectern core

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LendingConfig {
    /// Days added to a loan's due date when extending without an explicit count.
    pub extend_days: i64,
    /// Due-soon window used when the caller does not supply one.
    pub due_soon_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Display name of the default admin identity created on first init.
    pub admin_name: String,
    pub admin_group: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub lending: LendingConfig,
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix LECTERN_)
            .add_source(
                Environment::with_prefix("LECTERN")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override database path from DATABASE_PATH env var if present
            .set_override_option("database.path", env::var("DATABASE_PATH").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "lectern.db".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            extend_days: 14,
            due_soon_days: 7,
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            admin_name: "Administrator".to_string(),
            admin_group: "Staff".to_string(),
        }
    }
}
