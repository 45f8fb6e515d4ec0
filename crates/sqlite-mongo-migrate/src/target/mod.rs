//! MongoDB destination operations.

use async_trait::async_trait;
use mongodb::bson::{doc, Document as BsonDocument};
use mongodb::Client;
use tracing::{debug, info};

use crate::config::TargetConfig;
use crate::error::Result;

/// Trait for destination document-store operations.
///
/// The bulk-insert wire protocol is opaque to the engine; this is the whole
/// surface it relies on.
#[async_trait]
pub trait TargetStore: Send + Sync {
    /// Drop the destination database, so every table maps to a fresh,
    /// empty collection.
    async fn drop_database(&self) -> Result<()>;

    /// Insert documents into a collection in one bulk write.
    ///
    /// Returns the number of documents inserted.
    async fn insert_many(&self, collection: &str, documents: Vec<BsonDocument>) -> Result<u64>;
}

/// MongoDB destination backed by the official driver.
pub struct MongoTarget {
    client: Client,
    database: String,
}

impl MongoTarget {
    /// Connect to MongoDB and ping the destination database.
    pub async fn connect(config: &TargetConfig) -> Result<Self> {
        let client = Client::with_uri_str(config.connection_string()).await?;

        // Test the connection before any transfer work starts.
        client
            .database(&config.database)
            .run_command(doc! { "ping": 1 }, None)
            .await?;

        info!(
            "Connected to MongoDB: {}:{}/{}",
            config.host, config.port, config.database
        );

        Ok(Self {
            client,
            database: config.database.clone(),
        })
    }
}

#[async_trait]
impl TargetStore for MongoTarget {
    async fn drop_database(&self) -> Result<()> {
        self.client.database(&self.database).drop(None).await?;
        info!("Dropped destination database {}", self.database);
        Ok(())
    }

    async fn insert_many(&self, collection: &str, documents: Vec<BsonDocument>) -> Result<u64> {
        let coll = self
            .client
            .database(&self.database)
            .collection::<BsonDocument>(collection);

        let result = coll.insert_many(documents, None).await?;
        let inserted = result.inserted_ids.len() as u64;

        debug!(
            "Inserted {} documents into {}.{}",
            inserted, self.database, collection
        );
        Ok(inserted)
    }
}
