pub mod database;

pub use database::mongodb::MongoSchemaClient;
pub use database::SchemaClient;
