use crate::error::{BootstrapError, BootstrapResult};
use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Name MongoDB gives the primary key index. Never managed by the bootstrapper.
pub const PRIMARY_KEY_INDEX_NAME: &str = "_id_";

/// Sort direction of one index key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum KeyDirection {
    Ascending,
    Descending,
}

impl KeyDirection {
    pub fn as_i32(self) -> i32 {
        match self {
            KeyDirection::Ascending => 1,
            KeyDirection::Descending => -1,
        }
    }

    /// Reads a direction out of an index key document value.
    ///
    /// The shell stores `1` as a double while drivers store it as an int, so every
    /// numeric type is accepted. Special index types (`"text"`, `"hashed"`, ...) have
    /// no direction and yield `None`.
    pub fn from_bson(value: &Bson) -> Option<Self> {
        let number = match value {
            Bson::Int32(v) => *v as f64,
            Bson::Int64(v) => *v as f64,
            Bson::Double(v) => *v,
            _ => return None,
        };
        if number > 0.0 {
            Some(KeyDirection::Ascending)
        } else if number < 0.0 {
            Some(KeyDirection::Descending)
        } else {
            None
        }
    }
}

impl TryFrom<i32> for KeyDirection {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(KeyDirection::Ascending),
            -1 => Ok(KeyDirection::Descending),
            other => Err(format!("invalid key direction {}, expected 1 or -1", other)),
        }
    }
}

impl From<KeyDirection> for i32 {
    fn from(direction: KeyDirection) -> Self {
        direction.as_i32()
    }
}

/// One `(field, direction)` pair of an index key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexKey {
    pub field: String,
    pub direction: KeyDirection,
}

impl IndexKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: KeyDirection::Ascending }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: KeyDirection::Descending }
    }
}

/// A desired secondary index.
///
/// Key order is significant: it is the order of the compound index and decides
/// which prefixes the query planner can use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexSpec {
    name: String,
    keys: Vec<IndexKey>,
    #[serde(default)]
    unique: bool,
}

impl IndexSpec {
    pub fn new(name: impl Into<String>, keys: Vec<IndexKey>) -> Self {
        Self { name: name.into(), keys, unique: false }
    }

    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keys(&self) -> &[IndexKey] {
        &self.keys
    }

    pub fn unique(&self) -> bool {
        self.unique
    }

    /// Key document in declaration order, e.g. `{ origin: 1, fl_date: 1 }`.
    pub fn key_document(&self) -> Document {
        let mut keys = Document::new();
        for key in &self.keys {
            keys.insert(key.field.clone(), key.direction.as_i32());
        }
        keys
    }

    /// Checks the invariants of a single spec.
    pub fn validate(&self) -> BootstrapResult<()> {
        if self.name.trim().is_empty() {
            return Err(BootstrapError::InvalidSpec("index name must not be empty".to_string()));
        }
        if self.name == PRIMARY_KEY_INDEX_NAME {
            return Err(BootstrapError::InvalidSpec(format!(
                "index name {} is reserved for the primary key index",
                PRIMARY_KEY_INDEX_NAME
            )));
        }
        if self.keys.is_empty() {
            return Err(BootstrapError::InvalidSpec(format!("index {} has no keys", self.name)));
        }

        let mut seen = HashSet::new();
        for key in &self.keys {
            if key.field.trim().is_empty() {
                return Err(BootstrapError::InvalidSpec(format!("index {} has a key with an empty field", self.name)));
            }
            if !seen.insert(key.field.as_str()) {
                return Err(BootstrapError::InvalidSpec(format!(
                    "index {} lists field {} more than once",
                    self.name, key.field
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ ", self.name)?;
        for (position, key) in self.keys.iter().enumerate() {
            if position > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key.field, key.direction.as_i32())?;
        }
        write!(f, " }} unique={}", self.unique)
    }
}

/// Validates a whole index set: every spec on its own, plus unique names across the set.
pub fn validate_index_set(specs: &[IndexSpec]) -> BootstrapResult<()> {
    let mut names = HashSet::new();
    for spec in specs {
        spec.validate()?;
        if !names.insert(spec.name()) {
            return Err(BootstrapError::InvalidSpec(format!("index name {} is used more than once", spec.name())));
        }
    }
    Ok(())
}

/// An index as reported by the datastore's index metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingIndex {
    pub name: String,
    pub keys: Document,
    pub unique: bool,
    /// Options other than `name` and `unique` that change the index, e.g. `sparse`
    /// or `partialFilterExpression`. Options left at their default are not recorded.
    pub options: Document,
}

impl ExistingIndex {
    pub fn new(name: impl Into<String>, keys: Document, unique: bool) -> Self {
        Self { name: name.into(), keys, unique, options: Document::new() }
    }

    pub fn with_options(mut self, options: Document) -> Self {
        self.options = options;
        self
    }

    /// Same name, same keys in the same order with the same directions, same unique flag
    /// and no further options. A spec never carries options, so any recorded option is a difference.
    pub fn matches(&self, spec: &IndexSpec) -> bool {
        if self.name != spec.name()
            || self.unique != spec.unique()
            || !self.options.is_empty()
            || self.keys.len() != spec.keys().len()
        {
            return false;
        }
        self.keys.iter().zip(spec.keys()).all(|((field, value), key)| {
            field == &key.field && KeyDirection::from_bson(value) == Some(key.direction)
        })
    }
}

impl fmt::Display for ExistingIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ ", self.name)?;
        for (position, (field, value)) in self.keys.iter().enumerate() {
            if position > 0 {
                write!(f, ", ")?;
            }
            match KeyDirection::from_bson(value) {
                Some(direction) => write!(f, "{}: {}", field, direction.as_i32())?,
                None => write!(f, "{}: {}", field, value)?,
            }
        }
        write!(f, " }} unique={}", self.unique)?;
        if !self.options.is_empty() {
            write!(f, " options={}", self.options)?;
        }
        Ok(())
    }
}
