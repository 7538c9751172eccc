use thiserror::Error;

use crate::core::client::database::DatabaseError;

/// Result type for bootstrap operations
pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Error types for the index bootstrapper
///
/// Every variant is surfaced to the caller; none is retried or recovered internally.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// The datastore cannot be reached
    #[error("Connection error: {0}")]
    Connection(DatabaseError),

    /// Authentication failed or the user may not create collections/indexes
    #[error("Authorization error: {0}")]
    Authorization(DatabaseError),

    /// An index of the same name exists with a different definition
    #[error("Index conflict on {namespace} for index {index}: {reason}")]
    IndexConflict { namespace: String, index: String, reason: String },

    /// An index spec or manifest breaks the index set invariants
    #[error("Invalid index spec: {0}")]
    InvalidSpec(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Any other datastore failure
    #[error("Database error: {0}")]
    DatabaseError(DatabaseError),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl From<DatabaseError> for BootstrapError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Connection(_) => BootstrapError::Connection(err),
            DatabaseError::Authorization(_) => BootstrapError::Authorization(err),
            DatabaseError::InvalidOptions(message) => BootstrapError::ConfigError(message),
            other => BootstrapError::DatabaseError(other),
        }
    }
}
