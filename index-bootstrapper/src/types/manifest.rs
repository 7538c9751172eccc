use super::index::{validate_index_set, IndexSpec};
use crate::error::BootstrapResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Index set loaded from a YAML file instead of the built-in flights set.
///
/// ```yaml
/// indexes:
///   - name: origin_day
///     keys:
///       - { field: origin, direction: 1 }
///       - { field: fl_date, direction: 1 }
///     unique: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexManifest {
    pub indexes: Vec<IndexSpec>,
}

impl IndexManifest {
    pub fn from_yaml_str(contents: &str) -> BootstrapResult<Self> {
        let manifest: IndexManifest = serde_yaml::from_str(contents)?;
        validate_index_set(&manifest.indexes)?;
        Ok(manifest)
    }

    pub fn from_path(path: &Path) -> BootstrapResult<Self> {
        debug!(path = %path.display(), "Loading index manifest");
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn into_specs(self) -> Vec<IndexSpec> {
        self.indexes
    }
}
