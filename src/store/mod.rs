pub mod memory;
pub mod mongo;

use anyhow::Result;
use async_trait::async_trait;
use bson::{oid::ObjectId, Document};

/// Collection-oriented document store boundary.
///
/// The store offers atomic single-document insert/update/delete and
/// exact-match queries; nothing here spans more than one document. The
/// production implementation is MongoDB, tests run against [`memory::MemoryStore`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, returning its store-assigned id.
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<ObjectId>;

    /// Fetch one document by id.
    async fn find_by_id(&self, collection: &str, id: ObjectId) -> Result<Option<Document>>;

    /// Fetch the first document matching an exact-match filter.
    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>>;

    /// List documents in store-native order, applying skip then limit.
    async fn list(&self, collection: &str, skip: u64, limit: i64) -> Result<Vec<Document>>;

    /// Merge `set` into the document with the given id ($set semantics).
    /// Returns whether a document matched.
    async fn update_by_id(&self, collection: &str, id: ObjectId, set: Document) -> Result<bool>;

    /// Merge `set` into the first document matching `filter`, inserting a new
    /// document carrying the filter's equality fields if none matches.
    async fn upsert_one(&self, collection: &str, filter: Document, set: Document) -> Result<()>;

    /// Delete the document with the given id. Returns whether one was deleted.
    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<bool>;
}
