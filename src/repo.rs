use std::fmt;
use std::sync::Arc;

use bson::{oid::ObjectId, Document};

use crate::api::error::ApiError;
use crate::store::DocumentStore;

/// The four entity kinds the API manages, each backed by one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Venue,
    Event,
    Attendee,
    Booking,
}

impl EntityKind {
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Venue => "venues",
            EntityKind::Event => "events",
            EntityKind::Attendee => "attendees",
            EntityKind::Booking => "bookings",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Venue => "Venue",
            EntityKind::Event => "Event",
            EntityKind::Attendee => "Attendee",
            EntityKind::Booking => "Booking",
        };
        f.write_str(label)
    }
}

/// CRUD operations against one entity collection.
///
/// Holds the injected store handle; one logical instance exists per entity
/// kind. Field-presence invariants (non-empty partial updates) are enforced
/// here, reference resolution happens before these calls.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
    kind: EntityKind,
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>, kind: EntityKind) -> Self {
        Self { store, kind }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Insert a document and return it as stored, id included.
    pub async fn create(&self, doc: Document) -> Result<Document, ApiError> {
        let id = self.store.insert_one(self.kind.collection(), doc).await?;
        tracing::info!("{} {} created", self.kind, id.to_hex());
        self.fetch(id).await
    }

    /// Fetch one entity, failing 404 if absent.
    pub async fn get(&self, id: ObjectId) -> Result<Document, ApiError> {
        self.store
            .find_by_id(self.kind.collection(), id)
            .await?
            .ok_or(ApiError::NotFound(self.kind))
    }

    /// Existence probe used by the reference validator. `None` means absent.
    pub async fn find(&self, id: ObjectId) -> Result<Option<Document>, ApiError> {
        Ok(self.store.find_by_id(self.kind.collection(), id).await?)
    }

    /// List entities in store-native order, applying skip then limit.
    pub async fn list(&self, limit: i64, skip: u64) -> Result<Vec<Document>, ApiError> {
        Ok(self.store.list(self.kind.collection(), skip, limit).await?)
    }

    /// Merge the given fields into the entity and return the refreshed
    /// document. An empty $set is rejected before touching the store.
    pub async fn update(&self, id: ObjectId, set: Document) -> Result<Document, ApiError> {
        if set.is_empty() {
            return Err(ApiError::EmptyUpdate);
        }
        let matched = self
            .store
            .update_by_id(self.kind.collection(), id, set)
            .await?;
        if !matched {
            return Err(ApiError::NotFound(self.kind));
        }
        tracing::info!("{} {} updated", self.kind, id.to_hex());
        self.fetch(id).await
    }

    /// Remove the entity, failing 404 if nothing matched.
    pub async fn delete(&self, id: ObjectId) -> Result<(), ApiError> {
        let deleted = self.store.delete_by_id(self.kind.collection(), id).await?;
        if !deleted {
            return Err(ApiError::NotFound(self.kind));
        }
        tracing::info!("{} {} deleted", self.kind, id.to_hex());
        Ok(())
    }

    async fn fetch(&self, id: ObjectId) -> Result<Document, ApiError> {
        self.store
            .find_by_id(self.kind.collection(), id)
            .await?
            .ok_or(ApiError::NotFound(self.kind))
    }
}

/// One repository per entity kind, all sharing the injected store handle.
#[derive(Clone)]
pub struct Repositories {
    pub venues: Repository,
    pub events: Repository,
    pub attendees: Repository,
    pub bookings: Repository,
}

impl Repositories {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            venues: Repository::new(store.clone(), EntityKind::Venue),
            events: Repository::new(store.clone(), EntityKind::Event),
            attendees: Repository::new(store.clone(), EntityKind::Attendee),
            bookings: Repository::new(store, EntityKind::Booking),
        }
    }

    pub fn of(&self, kind: EntityKind) -> &Repository {
        match kind {
            EntityKind::Venue => &self.venues,
            EntityKind::Event => &self.events,
            EntityKind::Attendee => &self.attendees,
            EntityKind::Booking => &self.bookings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use bson::doc;

    fn venues() -> Repository {
        Repository::new(Arc::new(MemoryStore::new()), EntityKind::Venue)
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let repo = venues();
        let created = repo
            .create(doc! { "name": "Hall A", "address": "1 Main St", "capacity": 100i64 })
            .await
            .unwrap();
        let id = created.get_object_id("_id").unwrap();
        let fetched = repo.get(id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = venues();
        let err = repo.get(ObjectId::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(EntityKind::Venue)));
    }

    #[tokio::test]
    async fn test_empty_update_rejected_regardless_of_target() {
        let repo = venues();
        // Target does not even exist: the empty set must win.
        let err = repo.update(ObjectId::new(), Document::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::EmptyUpdate));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = venues();
        let err = repo
            .update(ObjectId::new(), doc! { "name": "X" })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(EntityKind::Venue)));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let repo = venues();
        let created = repo
            .create(doc! { "name": "Hall A", "capacity": 100i64 })
            .await
            .unwrap();
        let id = created.get_object_id("_id").unwrap();
        let updated = repo.update(id, doc! { "capacity": 150i64 }).await.unwrap();
        assert_eq!(updated.get_str("name").unwrap(), "Hall A");
        assert_eq!(updated.get_i64("capacity").unwrap(), 150);
    }

    #[tokio::test]
    async fn test_delete_then_get_fails() {
        let repo = venues();
        let created = repo.create(doc! { "name": "Hall A" }).await.unwrap();
        let id = created.get_object_id("_id").unwrap();
        repo.delete(id).await.unwrap();
        assert!(matches!(
            repo.delete(id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            repo.get(id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_list_applies_skip_then_limit() {
        let repo = venues();
        for i in 0..4 {
            repo.create(doc! { "seq": i as i32 }).await.unwrap();
        }
        let page = repo.list(2, 1).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].get_i32("seq").unwrap(), 1);
    }
}
