use thiserror::Error;

/// Application error type shared across all modules.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed domain or request validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requested entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not allowed to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Reference generation exhausted its retry budget, or the store rejected
    /// an insert on the reference unique constraint.
    #[error("Duplicate reference: {0}")]
    DuplicateReference(String),

    /// A downstream collaborator call failed.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(anyhow::Error),
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
