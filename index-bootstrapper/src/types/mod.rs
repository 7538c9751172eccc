pub mod flights;
pub mod index;
pub mod manifest;
pub mod params;
pub mod report;
pub mod target;

pub use index::{ExistingIndex, IndexKey, IndexSpec, KeyDirection};
pub use target::CollectionTarget;
