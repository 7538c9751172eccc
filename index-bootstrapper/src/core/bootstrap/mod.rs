//! Idempotent collection and index bootstrap.
//!
//! A run is a sequence of assertions against the datastore: the collection is
//! ensured first, then every index in declaration order. Nothing here retries;
//! connection and authorization failures end the run and go back to the caller.

use crate::core::client::database::{DatabaseError, SchemaClient};
use crate::error::{BootstrapError, BootstrapResult};
use crate::types::index::{validate_index_set, IndexSpec};
use crate::types::params::ConflictPolicy;
use crate::types::report::{
    BootstrapReport, CollectionOutcome, IndexOutcome, IndexStatus, IndexStatusReport, VerifyReport,
};
use crate::types::target::CollectionTarget;
use tracing::{debug, error, info, info_span, warn, Instrument};

pub struct IndexBootstrapper<'a, C: SchemaClient + ?Sized> {
    client: &'a C,
    policy: ConflictPolicy,
}

impl<'a, C: SchemaClient + ?Sized> IndexBootstrapper<'a, C> {
    pub fn new(client: &'a C, policy: ConflictPolicy) -> Self {
        Self { client, policy }
    }

    /// Creates the collection if absent. An existing collection, and its data, is left as is.
    pub async fn ensure_collection(&self, target: &CollectionTarget) -> BootstrapResult<CollectionOutcome> {
        if self.client.collection_exists(target).await? {
            debug!(namespace = %target, "Collection already exists");
            return Ok(CollectionOutcome::AlreadyExists);
        }

        match self.client.create_collection(target).await {
            Ok(()) => {
                info!(namespace = %target, "Created collection");
                Ok(CollectionOutcome::Created)
            }
            // Someone else created it between the check and the create.
            Err(DatabaseError::NamespaceExists(_)) => Ok(CollectionOutcome::AlreadyExists),
            Err(err) => Err(err.into()),
        }
    }

    /// Creates the index if absent.
    ///
    /// An index with the same name and an identical definition is a no-op. An index
    /// with the same name and a different definition is an [`BootstrapError::IndexConflict`];
    /// the existing index is never altered.
    pub async fn ensure_index(&self, target: &CollectionTarget, spec: &IndexSpec) -> BootstrapResult<IndexOutcome> {
        let existing = self.client.list_indexes(target).await?;

        if let Some(current) = existing.iter().find(|index| index.name == spec.name()) {
            if current.matches(spec) {
                debug!(index = %spec.name(), "Index already present");
                return Ok(IndexOutcome::AlreadyPresent);
            }
            return Err(BootstrapError::IndexConflict {
                namespace: target.namespace(),
                index: spec.name().to_string(),
                reason: format!("existing definition {} differs from requested {}", current, spec),
            });
        }

        match self.client.create_index(target, spec).await {
            Ok(()) => {
                info!(index = %spec.name(), keys = %spec, "Created index");
                Ok(IndexOutcome::Created)
            }
            Err(DatabaseError::IndexConflict { code, message }) => Err(BootstrapError::IndexConflict {
                namespace: target.namespace(),
                index: spec.name().to_string(),
                reason: format!("server rejected the index (code {}): {}", code, message),
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Ensures the collection, then every spec in order.
    ///
    /// Conflicts are recorded in the report and processing continues, unless the
    /// policy is [`ConflictPolicy::FailFast`], in which case the first conflict is returned.
    /// Every other error aborts the run.
    pub async fn run(&self, target: &CollectionTarget, specs: &[IndexSpec]) -> BootstrapResult<BootstrapReport> {
        validate_index_set(specs)?;

        let span = info_span!("bootstrap", db = %target.database(), collection = %target.collection());
        async {
            info!(index_count = specs.len(), policy = ?self.policy, "Bootstrapping collection and indexes");

            let collection = self.ensure_collection(target).await?;
            let mut report = BootstrapReport::new(target.namespace(), collection);

            for spec in specs {
                match self.ensure_index(target, spec).await {
                    Ok(outcome) => report.record(spec.name(), outcome),
                    Err(BootstrapError::IndexConflict { namespace, index, reason }) => {
                        error!(index = %index, reason = %reason, "Index conflicts with an existing definition");
                        if self.policy == ConflictPolicy::FailFast {
                            return Err(BootstrapError::IndexConflict { namespace, index, reason });
                        }
                        report.record(index, IndexOutcome::Conflict { reason });
                    }
                    Err(err) => return Err(err),
                }
            }

            info!(
                created = report.created(),
                already_present = report.already_present(),
                conflicts = report.conflicts().len(),
                "Bootstrap finished"
            );
            Ok::<_, BootstrapError>(report)
        }
        .instrument(span)
        .await
    }

    /// Read-only check of the collection and every spec. Never writes.
    pub async fn verify(&self, target: &CollectionTarget, specs: &[IndexSpec]) -> BootstrapResult<VerifyReport> {
        validate_index_set(specs)?;

        let span = info_span!("verify", db = %target.database(), collection = %target.collection());
        async {
            let collection_exists = self.client.collection_exists(target).await?;
            let existing = if collection_exists { self.client.list_indexes(target).await? } else { Vec::new() };

            let indexes: Vec<IndexStatusReport> = specs
                .iter()
                .map(|spec| {
                    let status = match existing.iter().find(|index| index.name == spec.name()) {
                        None => IndexStatus::Missing,
                        Some(current) if current.matches(spec) => IndexStatus::Matching,
                        Some(current) => IndexStatus::Mismatched { existing: current.to_string() },
                    };
                    match &status {
                        IndexStatus::Matching => debug!(index = %spec.name(), "Index matches"),
                        IndexStatus::Missing => warn!(index = %spec.name(), "Index is missing"),
                        IndexStatus::Mismatched { existing } => {
                            warn!(index = %spec.name(), existing = %existing, wanted = %spec, "Index definition differs")
                        }
                    }
                    IndexStatusReport { name: spec.name().to_string(), status }
                })
                .collect();

            let report = VerifyReport { namespace: target.namespace(), collection_exists, indexes };
            info!(
                collection_exists,
                matching = report.count(&IndexStatus::Matching),
                missing = report.count(&IndexStatus::Missing),
                satisfied = report.is_satisfied(),
                "Verification finished"
            );
            Ok::<_, BootstrapError>(report)
        }
        .instrument(span)
        .await
    }
}
