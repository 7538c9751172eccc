use crate::cli::database::mongodb::MongoDBCliArgs;
use crate::error::{BootstrapError, BootstrapResult};
use crate::types::target::CollectionTarget;
use std::time::Duration;

const DEFAULT_MONGO_PORT: u16 = 27017;

/// Validated MongoDB parameters
#[derive(Debug, Clone)]
pub struct DatabaseArgs {
    pub connection_uri: String,
    pub target: CollectionTarget,
    pub server_selection_timeout: Duration,
    pub connect_timeout: Duration,
}

/// Builds the connection uri used when only a host is configured.
///
/// Retryable writes are switched off so a standalone server accepts the connection.
pub fn connection_uri_for_host(host: &str) -> String {
    format!("mongodb://{}:{}/?retryWrites=false", host, DEFAULT_MONGO_PORT)
}

impl TryFrom<MongoDBCliArgs> for DatabaseArgs {
    type Error = BootstrapError;

    fn try_from(args: MongoDBCliArgs) -> BootstrapResult<Self> {
        let connection_uri = match args.mongodb_connection_url.filter(|url| !url.trim().is_empty()) {
            Some(url) => url,
            None => {
                let host = args.mongo_host.trim();
                if host.is_empty() {
                    return Err(BootstrapError::ConfigError(
                        "either a MongoDB connection url or a MongoDB host is required".to_string(),
                    ));
                }
                connection_uri_for_host(host)
            }
        };

        if !connection_uri.starts_with("mongodb://") && !connection_uri.starts_with("mongodb+srv://") {
            return Err(BootstrapError::ConfigError(format!(
                "connection url must use the mongodb:// or mongodb+srv:// scheme, got {}",
                connection_uri
            )));
        }
        if args.server_selection_timeout_ms == 0 {
            return Err(BootstrapError::ConfigError("server selection timeout must be positive".to_string()));
        }
        if args.connect_timeout_ms == 0 {
            return Err(BootstrapError::ConfigError("connect timeout must be positive".to_string()));
        }

        Ok(Self {
            connection_uri,
            target: CollectionTarget::new(args.database_name, args.collection_name)?,
            server_selection_timeout: Duration::from_millis(args.server_selection_timeout_ms),
            connect_timeout: Duration::from_millis(args.connect_timeout_ms),
        })
    }
}
