//! Error types for the lectern core

use thiserror::Error;

/// Main application error type.
///
/// Only genuine faults live here. Expected conditions -- lookup misses,
/// rejected writes, failed preconditions, bad import rows -- are modelled
/// as `Option`, `bool` or outcome values on the operation itself and never
/// surface as errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
