use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection, Database};

use crate::models::Cheater;

const CHEATERS_COLLECTION: &str = "cheater";

/// Handle on the backing document store. Built once at startup and shared;
/// the driver's own pooling makes it safe for concurrent use.
#[derive(Clone)]
pub struct CheaterStore {
    db: Database,
}

impl CheaterStore {
    pub async fn connect(url: &str, database: &str) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(url).await?;
        let db = client.database(database);
        tracing::info!(database = %database, "document store client initialized");
        Ok(Self { db })
    }

    fn cheaters(&self) -> Collection<Cheater> {
        self.db.collection(CHEATERS_COLLECTION)
    }

    /// Exact-match lookup in store-native order; an empty filter returns
    /// every record.
    pub async fn find_cheaters(&self, filter: Document) -> Result<Vec<Cheater>, mongodb::error::Error> {
        let cursor = self.cheaters().find(filter).await?;
        cursor.try_collect().await
    }

    /// Appends exactly one document and returns the store-assigned id as a
    /// string.
    pub async fn insert_cheater(&self, cheater: &Cheater) -> Result<String, mongodb::error::Error> {
        let result = self.cheaters().insert_one(cheater).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .unwrap_or_else(|| result.inserted_id.to_string());
        Ok(id)
    }

    /// Cheap reachability probe.
    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub async fn collection_names(&self, limit: usize) -> Result<Vec<String>, mongodb::error::Error> {
        let mut names = self.db.list_collection_names().await?;
        names.truncate(limit);
        Ok(names)
    }
}
