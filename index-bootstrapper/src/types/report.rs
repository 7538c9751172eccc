use serde::Serialize;

/// What `ensure_collection` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionOutcome {
    Created,
    AlreadyExists,
}

/// What `ensure_index` did for one spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexOutcome {
    Created,
    AlreadyPresent,
    /// The name is taken by a different definition; nothing was changed.
    Conflict { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub name: String,
    pub outcome: IndexOutcome,
}

/// Result of one `apply` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub namespace: String,
    pub collection: CollectionOutcome,
    pub indexes: Vec<IndexReport>,
}

impl BootstrapReport {
    pub fn new(namespace: String, collection: CollectionOutcome) -> Self {
        Self { namespace, collection, indexes: Vec::new() }
    }

    pub fn record(&mut self, name: impl Into<String>, outcome: IndexOutcome) {
        self.indexes.push(IndexReport { name: name.into(), outcome });
    }

    pub fn created(&self) -> usize {
        self.indexes.iter().filter(|report| report.outcome == IndexOutcome::Created).count()
    }

    pub fn already_present(&self) -> usize {
        self.indexes.iter().filter(|report| report.outcome == IndexOutcome::AlreadyPresent).count()
    }

    pub fn conflicts(&self) -> Vec<&IndexReport> {
        self.indexes.iter().filter(|report| matches!(report.outcome, IndexOutcome::Conflict { .. })).collect()
    }

    /// No conflicts were recorded.
    pub fn is_success(&self) -> bool {
        self.conflicts().is_empty()
    }
}

/// Read-only state of one spec, as seen by `verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStatus {
    Matching,
    Missing,
    Mismatched { existing: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStatusReport {
    pub name: String,
    pub status: IndexStatus,
}

/// Result of one `verify` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub namespace: String,
    pub collection_exists: bool,
    pub indexes: Vec<IndexStatusReport>,
}

impl VerifyReport {
    /// Collection exists and every spec is present with a matching definition.
    pub fn is_satisfied(&self) -> bool {
        self.collection_exists && self.indexes.iter().all(|report| report.status == IndexStatus::Matching)
    }

    pub fn count(&self, status: &IndexStatus) -> usize {
        self.indexes.iter().filter(|report| &report.status == status).count()
    }
}
