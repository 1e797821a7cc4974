use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};

use crate::store::DocumentStore;

/// In-memory, HashMap-based document store.
///
/// Intended for tests and embedding. Collections are vectors of documents
/// held behind a `RwLock`, so `list` returns insertion order (the closest
/// analogue of store-native order). Documents are cloned on read/write.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .expect("lock poisoned")
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(k, v)| doc.get(k) == Some(v))
}

fn merge(doc: &mut Document, set: &Document) {
    for (k, v) in set {
        doc.insert(k.clone(), v.clone());
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, mut doc: Document) -> Result<ObjectId> {
        let id = match doc.get_object_id("_id") {
            Ok(existing) => existing,
            Err(_) => {
                let id = ObjectId::new();
                doc.insert("_id", id);
                id
            }
        };
        let mut map = self.collections.write().expect("lock poisoned");
        map.entry(collection.to_string()).or_default().push(doc);
        Ok(id)
    }

    async fn find_by_id(&self, collection: &str, id: ObjectId) -> Result<Option<Document>> {
        self.find_one(collection, bson::doc! { "_id": id }).await
    }

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>> {
        let map = self.collections.read().expect("lock poisoned");
        Ok(map
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| matches(d, &filter)).cloned()))
    }

    async fn list(&self, collection: &str, skip: u64, limit: i64) -> Result<Vec<Document>> {
        let map = self.collections.read().expect("lock poisoned");
        let docs = map.get(collection).cloned().unwrap_or_default();
        let iter = docs.into_iter().skip(skip as usize);
        Ok(if limit > 0 {
            iter.take(limit as usize).collect()
        } else {
            iter.collect()
        })
    }

    async fn update_by_id(&self, collection: &str, id: ObjectId, set: Document) -> Result<bool> {
        let mut map = self.collections.write().expect("lock poisoned");
        let Some(docs) = map.get_mut(collection) else {
            return Ok(false);
        };
        let target = Bson::ObjectId(id);
        match docs.iter_mut().find(|d| d.get("_id") == Some(&target)) {
            Some(doc) => {
                merge(doc, &set);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn upsert_one(&self, collection: &str, filter: Document, set: Document) -> Result<()> {
        let mut map = self.collections.write().expect("lock poisoned");
        let docs = map.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| matches(d, &filter)) {
            Some(doc) => merge(doc, &set),
            None => {
                // New document carries the filter's equality fields, as the
                // real store's upsert does.
                let mut doc = Document::new();
                doc.insert("_id", ObjectId::new());
                merge(&mut doc, &filter);
                merge(&mut doc, &set);
                docs.push(doc);
            }
        }
        Ok(())
    }

    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<bool> {
        let mut map = self.collections.write().expect("lock poisoned");
        let Some(docs) = map.get_mut(collection) else {
            return Ok(false);
        };
        let target = Bson::ObjectId(id);
        let before = docs.len();
        docs.retain(|d| d.get("_id") != Some(&target));
        Ok(docs.len() < before)
    }
}
