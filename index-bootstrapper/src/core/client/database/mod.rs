pub mod constant;
pub mod error;
pub mod mongodb;

use crate::types::index::{ExistingIndex, IndexSpec};
use crate::types::target::CollectionTarget;
use async_trait::async_trait;
pub use error::DatabaseError;

/// Trait defining the schema-management operations the bootstrapper needs
///
/// An explicit handle: the bootstrapper never reaches for an ambient database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchemaClient: Send + Sync {
    /// collection_exists - Whether the target collection is present in its database
    async fn collection_exists(&self, target: &CollectionTarget) -> Result<bool, DatabaseError>;

    /// create_collection - Create the target collection; fails with `NamespaceExists` if it is already there
    async fn create_collection(&self, target: &CollectionTarget) -> Result<(), DatabaseError>;

    /// list_indexes - All indexes of the target collection, including `_id_`.
    /// Returns an empty list when the collection does not exist.
    async fn list_indexes(&self, target: &CollectionTarget) -> Result<Vec<ExistingIndex>, DatabaseError>;

    /// create_index - Create one index with the spec's name, keys and unique flag
    async fn create_index(&self, target: &CollectionTarget, spec: &IndexSpec) -> Result<(), DatabaseError>;
}
