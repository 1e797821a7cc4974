use anyhow::{Context, Result};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{Client, Collection, Database};

use crate::store::DocumentStore;

/// MongoDB-backed document store.
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connect to MongoDB and select the named database.
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .context("Failed to connect to MongoDB")?;
        let db = client.database(database);
        tracing::info!("Connected to database '{}'", database);
        Ok(Self { db })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<ObjectId> {
        let result = self
            .collection(collection)
            .insert_one(doc)
            .await
            .context("Failed to insert document")?;
        result
            .inserted_id
            .as_object_id()
            .context("Store assigned a non-ObjectId key")
    }

    async fn find_by_id(&self, collection: &str, id: ObjectId) -> Result<Option<Document>> {
        self.find_one(collection, doc! { "_id": id }).await
    }

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>> {
        self.collection(collection)
            .find_one(filter)
            .await
            .context("Failed to query document")
    }

    async fn list(&self, collection: &str, skip: u64, limit: i64) -> Result<Vec<Document>> {
        let mut cursor = self
            .collection(collection)
            .find(doc! {})
            .skip(skip)
            .limit(limit)
            .await
            .context("Failed to open list cursor")?;

        let mut docs = Vec::new();
        while let Some(doc) = cursor.try_next().await.context("Failed to read cursor")? {
            docs.push(doc);
        }
        Ok(docs)
    }

    async fn update_by_id(&self, collection: &str, id: ObjectId, set: Document) -> Result<bool> {
        let result = self
            .collection(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await
            .context("Failed to update document")?;
        Ok(result.matched_count > 0)
    }

    async fn upsert_one(&self, collection: &str, filter: Document, set: Document) -> Result<()> {
        self.collection(collection)
            .update_one(filter, doc! { "$set": set })
            .upsert(true)
            .await
            .context("Failed to upsert document")?;
        Ok(())
    }

    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<bool> {
        let result = self
            .collection(collection)
            .delete_one(doc! { "_id": id })
            .await
            .context("Failed to delete document")?;
        Ok(result.deleted_count > 0)
    }
}
