use super::constant::{
    AUTHENTICATION_FAILED_CODE, INDEX_KEY_SPECS_CONFLICT_CODE, INDEX_OPTIONS_CONFLICT_CODE, NAMESPACE_EXISTS_CODE,
    NAMESPACE_NOT_FOUND_CODE, UNAUTHORIZED_CODE,
};
use mongodb::error::{Error as MongoError, ErrorKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The server could not be reached or the connection dropped.
    #[error("Failed to reach the database: {0}")]
    Connection(String),

    /// Authentication failed or the user lacks the privilege for the command.
    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Namespace already exists: {0}")]
    NamespaceExists(String),

    #[error("Namespace not found: {0}")]
    NamespaceNotFound(String),

    /// The server refused to create an index because it clashes with an existing one.
    #[error("Index conflict (code {code}): {message}")]
    IndexConflict { code: i32, message: String },

    #[error("Invalid client options: {0}")]
    InvalidOptions(String),

    #[error("Mongo error: {0}")]
    MongoError(MongoError),
}

/// Command error codes grouped by how the bootstrapper reacts to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandErrorClass {
    Authorization,
    NamespaceExists,
    NamespaceNotFound,
    IndexConflict,
    Other,
}

impl CommandErrorClass {
    pub fn from_code(code: i32) -> Self {
        match code {
            UNAUTHORIZED_CODE | AUTHENTICATION_FAILED_CODE => CommandErrorClass::Authorization,
            NAMESPACE_EXISTS_CODE => CommandErrorClass::NamespaceExists,
            NAMESPACE_NOT_FOUND_CODE => CommandErrorClass::NamespaceNotFound,
            INDEX_OPTIONS_CONFLICT_CODE | INDEX_KEY_SPECS_CONFLICT_CODE => CommandErrorClass::IndexConflict,
            _ => CommandErrorClass::Other,
        }
    }
}

impl From<MongoError> for DatabaseError {
    fn from(err: MongoError) -> Self {
        match err.kind.as_ref() {
            ErrorKind::Command(command) => match CommandErrorClass::from_code(command.code) {
                CommandErrorClass::Authorization => DatabaseError::Authorization(command.message.clone()),
                CommandErrorClass::NamespaceExists => DatabaseError::NamespaceExists(command.message.clone()),
                CommandErrorClass::NamespaceNotFound => DatabaseError::NamespaceNotFound(command.message.clone()),
                CommandErrorClass::IndexConflict => {
                    DatabaseError::IndexConflict { code: command.code, message: command.message.clone() }
                }
                CommandErrorClass::Other => DatabaseError::MongoError(err),
            },
            ErrorKind::Authentication { .. } => DatabaseError::Authorization(err.to_string()),
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::ConnectionPoolCleared { .. } => DatabaseError::Connection(err.to_string()),
            ErrorKind::InvalidArgument { .. } => DatabaseError::InvalidOptions(err.to_string()),
            _ => DatabaseError::MongoError(err),
        }
    }
}
