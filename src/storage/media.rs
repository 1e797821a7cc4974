use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use bson::{doc, Document};
use chrono::Utc;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::ids;
use crate::repo::{EntityKind, Repositories};
use crate::serialize::document_to_json;
use crate::storage::blobs::{BlobByteStream, BlobStore};
use crate::store::DocumentStore;

const MEDIA: &str = "media_records";

/// The kind of entity a media record is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    Event,
    Venue,
}

impl OwnerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OwnerKind::Event => "event",
            OwnerKind::Venue => "venue",
        }
    }

    fn entity(self) -> EntityKind {
        match self {
            OwnerKind::Event => EntityKind::Event,
            OwnerKind::Venue => EntityKind::Venue,
        }
    }
}

/// A media slot: the (owner kind, media type) pairing an upload occupies.
/// At most one record exists per slot instance; a slot never empties once
/// occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSlot {
    EventPoster,
    EventPromoVideo,
    VenuePhoto,
}

impl MediaSlot {
    pub fn owner(self) -> OwnerKind {
        match self {
            MediaSlot::EventPoster | MediaSlot::EventPromoVideo => OwnerKind::Event,
            MediaSlot::VenuePhoto => OwnerKind::Venue,
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            MediaSlot::EventPoster => "poster",
            MediaSlot::EventPromoVideo => "promo_video",
            MediaSlot::VenuePhoto => "venue_photo",
        }
    }

    fn required_prefix(self) -> &'static str {
        match self {
            MediaSlot::EventPoster | MediaSlot::VenuePhoto => "image/",
            MediaSlot::EventPromoVideo => "video/",
        }
    }
}

impl fmt::Display for MediaSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.media_type())
    }
}

/// Everything a handler needs to frame a binary download response.
pub struct MediaDownload {
    pub content_type: String,
    pub filename: String,
    pub length: u64,
    pub stream: BlobByteStream,
}

/// Coordinates blob writes/reads with the metadata pointer records that map
/// each (owner, media type) slot to exactly one stored blob.
#[derive(Clone)]
pub struct MediaManager {
    repos: Repositories,
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl MediaManager {
    pub fn new(
        repos: Repositories,
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            repos,
            store,
            blobs,
        }
    }

    /// Store an upload and point the slot's record at it, replacing any
    /// previous record for the same (owner, media type). The prior blob is
    /// left in place.
    pub async fn upload(
        &self,
        slot: MediaSlot,
        raw_owner_id: &str,
        content_type: &str,
        filename: &str,
        data: &[u8],
    ) -> Result<Value, ApiError> {
        if data.is_empty() {
            return Err(ApiError::EmptyPayload);
        }

        let owner = slot.owner();
        let owner_id = ids::decode(raw_owner_id)?;
        if self.repos.of(owner.entity()).find(owner_id).await?.is_none() {
            return Err(ApiError::OwnerNotFound(owner.entity()));
        }

        let prefix = slot.required_prefix();
        if !content_type.starts_with(prefix) {
            return Err(ApiError::InvalidMediaKind(format!(
                "{} requires a {}* content type, got '{}'",
                slot, prefix, content_type
            )));
        }

        // Blob write and record upsert are two independent operations; a
        // failure in between leaves an orphaned blob with no pointer.
        let blob = self.blobs.put(data).await?;

        let filter = self.slot_filter(slot, owner_id);
        let set = doc! {
            "filename": filename,
            "content_type": content_type,
            "blob_id": blob.id,
            "length": blob.length as i64,
            "sha256": blob.sha256.as_str(),
            "uploaded_at": bson::DateTime::from_chrono(Utc::now()),
        };
        self.store.upsert_one(MEDIA, filter.clone(), set).await?;

        let record = self
            .store
            .find_one(MEDIA, filter)
            .await?
            .context("Media record missing after upsert")?;

        tracing::info!(
            "{} for {} {} uploaded: {} bytes, {} chunks",
            slot,
            owner.as_str(),
            owner_id.to_hex(),
            blob.length,
            blob.chunk_count
        );

        Ok(document_to_json(record))
    }

    /// Open the slot's current blob for streaming alongside its stored
    /// content type and filename.
    pub async fn download(
        &self,
        slot: MediaSlot,
        raw_owner_id: &str,
    ) -> Result<MediaDownload, ApiError> {
        let owner = slot.owner();
        let owner_id = ids::decode(raw_owner_id)?;
        if self.repos.of(owner.entity()).find(owner_id).await?.is_none() {
            return Err(ApiError::OwnerNotFound(owner.entity()));
        }

        let record = self
            .store
            .find_one(MEDIA, self.slot_filter(slot, owner_id))
            .await?
            .ok_or(ApiError::MediaNotFound)?;

        let blob_id = record
            .get_object_id("blob_id")
            .context("Media record has no blob handle")?;
        let stream = self.blobs.open(blob_id).await?;

        Ok(MediaDownload {
            content_type: record
                .get_str("content_type")
                .unwrap_or("application/octet-stream")
                .to_string(),
            filename: record.get_str("filename").unwrap_or("download").to_string(),
            length: record.get_i64("length").unwrap_or(0) as u64,
            stream,
        })
    }

    fn slot_filter(&self, slot: MediaSlot, owner_id: bson::oid::ObjectId) -> Document {
        doc! {
            "owner_type": slot.owner().as_str(),
            "owner_id": owner_id,
            "media_type": slot.media_type(),
        }
    }
}
