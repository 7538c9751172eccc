use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod database;

#[derive(Parser, Debug)]
#[command(
    name = "index-bootstrapper",
    about = "Ensures the flightsdb collection and its secondary indexes exist",
    long_about = "Idempotently creates the flights collection and its secondary indexes in MongoDB.\n\n\
    Existing indexes with an identical definition are left alone. An index whose name is taken by a \
    different definition is reported as a conflict and never altered.",
    after_help = "Examples:\n  \
    index-bootstrapper apply --mongo-host localhost\n  \
    index-bootstrapper apply --mongodb-connection-url mongodb://localhost:27017 --fail-fast\n  \
    index-bootstrapper verify --manifest manifests/flights.yaml"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the collection and any missing indexes
    #[command(long_about = "Create the collection if absent, then each index in order.\n\n\
        Conflicting indexes are reported and the remaining indexes are still processed, \
        unless --fail-fast is given. Connection and authorization errors always stop the run.")]
    Apply {
        #[command(flatten)]
        apply_command: Box<ApplyCmd>,
    },
    /// Check the collection and indexes without changing anything
    Verify {
        #[command(flatten)]
        verify_command: Box<VerifyCmd>,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct ApplyCmd {
    #[clap(flatten)]
    pub mongodb_args: database::mongodb::MongoDBCliArgs,

    #[clap(flatten)]
    pub index_args: IndexSetCliArgs,

    /// Stop at the first conflicting index instead of processing the remaining ones.
    #[arg(env = "FLIGHTSDB_FAIL_FAST", long, default_value_t = false)]
    pub fail_fast: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct VerifyCmd {
    #[clap(flatten)]
    pub mongodb_args: database::mongodb::MongoDBCliArgs,

    #[clap(flatten)]
    pub index_args: IndexSetCliArgs,
}

/// Where the index set comes from.
#[derive(Debug, Clone, Args)]
pub struct IndexSetCliArgs {
    /// YAML manifest replacing the built-in flights index set.
    #[arg(env = "FLIGHTSDB_INDEX_MANIFEST", long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,
}
