use clap::Args;

/// Parameters used to config MongoDB.
#[derive(Debug, Clone, Args)]
pub struct MongoDBCliArgs {
    /// The connection string to the MongoDB server.
    ///
    /// Takes precedence over `--mongo-host`.
    #[arg(env = "FLIGHTSDB_MONGODB_CONNECTION_URL", long)]
    pub mongodb_connection_url: Option<String>,

    /// Host of the MongoDB server, used to build `mongodb://<host>:27017/?retryWrites=false`
    /// when no connection url is given.
    #[arg(env = "MONGO_HOST", long, default_value = "mongodb")]
    pub mongo_host: String,

    /// The name of the database.
    #[arg(env = "FLIGHTSDB_DATABASE_NAME", long, default_value = "flightsdb")]
    pub database_name: String,

    /// The name of the collection carrying the indexes.
    #[arg(env = "FLIGHTSDB_COLLECTION_NAME", long, default_value = "flights")]
    pub collection_name: String,

    /// How long the driver waits for a suitable server before giving up, in milliseconds.
    #[arg(env = "FLIGHTSDB_SERVER_SELECTION_TIMEOUT_MS", long, default_value_t = 5000)]
    pub server_selection_timeout_ms: u64,

    /// TCP connect timeout, in milliseconds.
    #[arg(env = "FLIGHTSDB_CONNECT_TIMEOUT_MS", long, default_value_t = 10000)]
    pub connect_timeout_ms: u64,
}
