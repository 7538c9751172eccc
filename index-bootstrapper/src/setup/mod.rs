use crate::cli::{ApplyCmd, VerifyCmd};
use crate::core::bootstrap::IndexBootstrapper;
use crate::core::client::MongoSchemaClient;
use crate::types::params::{ApplyArgs, ConflictPolicy, VerifyArgs};
use crate::types::report::{BootstrapReport, VerifyReport};
use crate::BootstrapResult;
use tracing::{debug, info};

/// Runs the bootstrap against a live MongoDB server.
///
/// Conflict policy: by default a conflicting index is reported and the remaining
/// indexes are still created, since each index is independent of the others.
/// `--fail-fast` stops at the first conflict instead. Connection and authorization
/// errors always end the run; retrying belongs to the deployment tooling.
pub async fn apply(apply_cmd: &ApplyCmd) -> BootstrapResult<BootstrapReport> {
    let args = ApplyArgs::try_from(apply_cmd.clone())?;
    debug!(namespace = %args.database.target, policy = ?args.policy, "Apply params validated");

    let client = MongoSchemaClient::new(&args.database).await?;
    info!(namespace = %args.database.target, "Connected to MongoDB");

    IndexBootstrapper::new(&client, args.policy).run(&args.database.target, &args.index_set.specs).await
}

/// Checks the live collection and indexes without creating anything.
pub async fn verify(verify_cmd: &VerifyCmd) -> BootstrapResult<VerifyReport> {
    let args = VerifyArgs::try_from(verify_cmd.clone())?;
    debug!(namespace = %args.database.target, "Verify params validated");

    let client = MongoSchemaClient::new(&args.database).await?;
    info!(namespace = %args.database.target, "Connected to MongoDB");

    IndexBootstrapper::new(&client, ConflictPolicy::default()).verify(&args.database.target, &args.index_set.specs).await
}
