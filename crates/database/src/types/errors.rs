//! Error types for the database layer

use thiserror::Error;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("database connection error: {0}")]
    ConnectionError(String),

    #[error("database migration error: {0}")]
    MigrationError(String),
}

/// Credential-store errors
#[derive(Debug, Error)]
pub enum UserError {
    #[error("username already exists")]
    DuplicateUsername,

    #[error("credential store unavailable: {0}")]
    StoreUnavailable(String),
}
