pub mod database;

use crate::cli::{ApplyCmd, IndexSetCliArgs, VerifyCmd};
use crate::error::{BootstrapError, BootstrapResult};
use crate::types::flights::flight_index_specs;
use crate::types::index::{validate_index_set, IndexSpec};
use crate::types::manifest::IndexManifest;
pub use database::DatabaseArgs;
use tracing::info;

/// What the bootstrapper does when an index conflicts with an existing definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Record the conflict and keep processing the remaining indexes.
    #[default]
    Continue,
    /// Stop at the first conflict.
    FailFast,
}

impl ConflictPolicy {
    pub fn from_fail_fast(fail_fast: bool) -> Self {
        if fail_fast {
            ConflictPolicy::FailFast
        } else {
            ConflictPolicy::Continue
        }
    }
}

/// IndexSetArgs - the validated index set to bootstrap
#[derive(Debug, Clone)]
pub struct IndexSetArgs {
    pub specs: Vec<IndexSpec>,
}

impl TryFrom<IndexSetCliArgs> for IndexSetArgs {
    type Error = BootstrapError;

    fn try_from(args: IndexSetCliArgs) -> BootstrapResult<Self> {
        let specs = match args.manifest {
            Some(path) => {
                info!(path = %path.display(), "Using index manifest");
                IndexManifest::from_path(&path)?.into_specs()
            }
            None => flight_index_specs(),
        };
        validate_index_set(&specs)?;
        Ok(Self { specs })
    }
}

/// ApplyArgs - everything the `apply` command needs, validated
#[derive(Debug, Clone)]
pub struct ApplyArgs {
    pub database: DatabaseArgs,
    pub index_set: IndexSetArgs,
    pub policy: ConflictPolicy,
}

impl TryFrom<ApplyCmd> for ApplyArgs {
    type Error = BootstrapError;

    fn try_from(cmd: ApplyCmd) -> BootstrapResult<Self> {
        Ok(Self {
            database: DatabaseArgs::try_from(cmd.mongodb_args)?,
            index_set: IndexSetArgs::try_from(cmd.index_args)?,
            policy: ConflictPolicy::from_fail_fast(cmd.fail_fast),
        })
    }
}

/// VerifyArgs - everything the `verify` command needs, validated
#[derive(Debug, Clone)]
pub struct VerifyArgs {
    pub database: DatabaseArgs,
    pub index_set: IndexSetArgs,
}

impl TryFrom<VerifyCmd> for VerifyArgs {
    type Error = BootstrapError;

    fn try_from(cmd: VerifyCmd) -> BootstrapResult<Self> {
        Ok(Self {
            database: DatabaseArgs::try_from(cmd.mongodb_args)?,
            index_set: IndexSetArgs::try_from(cmd.index_args)?,
        })
    }
}
