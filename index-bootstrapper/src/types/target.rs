use crate::error::{BootstrapError, BootstrapResult};
use std::fmt;

/// Characters MongoDB does not allow in database names.
const FORBIDDEN_DATABASE_CHARS: &[char] = &['/', '\\', '.', ' ', '"', '$', '\0'];

/// Database and collection the index set applies to. Fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionTarget {
    database: String,
    collection: String,
}

impl CollectionTarget {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> BootstrapResult<Self> {
        let target = Self { database: database.into(), collection: collection.into() };

        if target.database.is_empty() {
            return Err(BootstrapError::ConfigError("database name must not be empty".to_string()));
        }
        if let Some(c) = target.database.chars().find(|c| FORBIDDEN_DATABASE_CHARS.contains(c)) {
            return Err(BootstrapError::ConfigError(format!(
                "database name {:?} contains forbidden character {:?}",
                target.database, c
            )));
        }
        if target.collection.is_empty() {
            return Err(BootstrapError::ConfigError("collection name must not be empty".to_string()));
        }
        if target.collection.contains('$') || target.collection.contains('\0') {
            return Err(BootstrapError::ConfigError(format!(
                "collection name {:?} must not contain '$' or null characters",
                target.collection
            )));
        }
        if target.collection.starts_with("system.") {
            return Err(BootstrapError::ConfigError(format!(
                "collection name {:?} is in the reserved system namespace",
                target.collection
            )));
        }

        Ok(target)
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// `database.collection`
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.collection)
    }
}

impl fmt::Display for CollectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}
