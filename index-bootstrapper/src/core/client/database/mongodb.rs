use super::constant::{ADMIN_DATABASE, APP_NAME};
use super::error::DatabaseError;
use super::SchemaClient;
use crate::types::index::{ExistingIndex, IndexSpec};
use crate::types::params::database::DatabaseArgs;
use crate::types::target::CollectionTarget;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::{debug, instrument};

/// MongoDB implementation of [`SchemaClient`]
pub struct MongoSchemaClient {
    client: Client,
}

impl MongoSchemaClient {
    /// Connects and pings the server, so connection and credential problems
    /// surface here rather than halfway through a bootstrap run.
    pub async fn new(config: &DatabaseArgs) -> Result<Self, DatabaseError> {
        let mut options = ClientOptions::parse(&config.connection_uri).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(config.server_selection_timeout);
        options.connect_timeout = Some(config.connect_timeout);

        let client = Client::with_options(options)?;
        client.database(ADMIN_DATABASE).run_command(doc! { "ping": 1 }).await?;
        debug!("Connected to MongoDB");

        Ok(Self { client })
    }

    /// Mongodb client uses Arc internally, reducing the cost of clone.
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    fn database(&self, target: &CollectionTarget) -> Database {
        self.client.database(target.database())
    }

    fn collection(&self, target: &CollectionTarget) -> Collection<Document> {
        self.database(target).collection(target.collection())
    }
}

impl From<&IndexSpec> for IndexModel {
    fn from(spec: &IndexSpec) -> Self {
        let options = IndexOptions::builder().name(spec.name().to_string()).unique(spec.unique()).build();
        IndexModel::builder().keys(spec.key_document()).options(options).build()
    }
}

impl From<IndexModel> for ExistingIndex {
    fn from(model: IndexModel) -> Self {
        match model.options {
            Some(options) => {
                let extra = non_default_options(&options);
                ExistingIndex::new(options.name.unwrap_or_default(), model.keys, options.unique.unwrap_or(false))
                    .with_options(extra)
            }
            None => ExistingIndex::new(String::new(), model.keys, false),
        }
    }
}

/// Options of a listed index that change what it indexes or how, under their server names.
/// `v` and `background` are bookkeeping and ignored; `false` flags count as unset.
fn non_default_options(options: &IndexOptions) -> Document {
    let mut extra = Document::new();
    if options.sparse == Some(true) {
        extra.insert("sparse", true);
    }
    if options.hidden == Some(true) {
        extra.insert("hidden", true);
    }
    if let Some(filter) = &options.partial_filter_expression {
        extra.insert("partialFilterExpression", filter.clone());
    }
    if let Some(expire_after) = options.expire_after {
        extra.insert("expireAfterSeconds", expire_after.as_secs() as i64);
    }
    if let Some(collation) = &options.collation {
        extra.insert("collation", collation.locale.clone());
    }
    if let Some(projection) = &options.wildcard_projection {
        extra.insert("wildcardProjection", projection.clone());
    }
    if let Some(storage_engine) = &options.storage_engine {
        extra.insert("storageEngine", storage_engine.clone());
    }
    extra
}

#[async_trait]
impl SchemaClient for MongoSchemaClient {
    #[instrument(skip(self), fields(db = %target.database(), collection = %target.collection()))]
    async fn collection_exists(&self, target: &CollectionTarget) -> Result<bool, DatabaseError> {
        let names =
            self.database(target).list_collection_names().filter(doc! { "name": target.collection() }).await?;
        Ok(names.iter().any(|name| name == target.collection()))
    }

    #[instrument(skip(self), fields(db = %target.database(), collection = %target.collection()))]
    async fn create_collection(&self, target: &CollectionTarget) -> Result<(), DatabaseError> {
        self.database(target).create_collection(target.collection()).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(db = %target.database(), collection = %target.collection()))]
    async fn list_indexes(&self, target: &CollectionTarget) -> Result<Vec<ExistingIndex>, DatabaseError> {
        let cursor = match self.collection(target).list_indexes().await {
            Ok(cursor) => cursor,
            Err(err) => {
                return match DatabaseError::from(err) {
                    DatabaseError::NamespaceNotFound(_) => Ok(Vec::new()),
                    other => Err(other),
                };
            }
        };
        let models: Vec<IndexModel> = cursor.try_collect().await?;
        Ok(models.into_iter().map(ExistingIndex::from).collect())
    }

    #[instrument(skip(self, spec), fields(db = %target.database(), collection = %target.collection(), index = %spec.name()))]
    async fn create_index(&self, target: &CollectionTarget, spec: &IndexSpec) -> Result<(), DatabaseError> {
        let result = self.collection(target).create_index(IndexModel::from(spec)).await?;
        debug!(index_name = %result.index_name, "createIndexes acknowledged");
        Ok(())
    }
}
