use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use bson::spec::BinarySubtype;
use bson::{doc, oid::ObjectId, Binary, Bson};
use bytes::Bytes;
use chrono::Utc;
use futures::stream::{BoxStream, StreamExt};

use crate::storage::{chunker, hasher};
use crate::store::DocumentStore;

const BLOBS: &str = "media_blobs";
const CHUNKS: &str = "media_chunks";

/// Descriptor of a blob persisted in the chunk store.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub id: ObjectId,
    pub length: u64,
    pub chunk_count: u32,
    pub sha256: String,
}

/// Finite, consumed-once stream of blob bytes in chunk order.
pub type BlobByteStream = BoxStream<'static, Result<Bytes>>;

/// Opaque large-object store keyed by blob handle, supporting streamed reads.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write the full payload as a new blob, returning its descriptor.
    async fn put(&self, data: &[u8]) -> Result<StoredBlob>;

    /// Open a lazy read stream over the blob's chunks.
    async fn open(&self, id: ObjectId) -> Result<BlobByteStream>;
}

/// Blob store layered on the document store: one descriptor document per
/// blob plus one document per fixed-size chunk. Reads fetch chunks on
/// demand rather than buffering the whole blob.
pub struct ChunkedBlobStore {
    store: Arc<dyn DocumentStore>,
    chunk_size: usize,
}

impl ChunkedBlobStore {
    pub fn new(store: Arc<dyn DocumentStore>, chunk_size: usize) -> Self {
        Self { store, chunk_size }
    }
}

#[async_trait]
impl BlobStore for ChunkedBlobStore {
    async fn put(&self, data: &[u8]) -> Result<StoredBlob> {
        let sha256 = hasher::compute_sha256(data);
        let chunks = chunker::split(data, self.chunk_size);
        let chunk_count = chunks.len() as u32;

        let id = self
            .store
            .insert_one(
                BLOBS,
                doc! {
                    "length": data.len() as i64,
                    "chunk_size": self.chunk_size as i64,
                    "chunk_count": chunk_count as i32,
                    "sha256": sha256.as_str(),
                    "created_at": bson::DateTime::from_chrono(Utc::now()),
                },
            )
            .await
            .context("Failed to insert blob descriptor")?;

        for chunk in chunks {
            self.store
                .insert_one(
                    CHUNKS,
                    doc! {
                        "blob_id": id,
                        "index": chunk.index as i32,
                        "data": Bson::Binary(Binary {
                            subtype: BinarySubtype::Generic,
                            bytes: chunk.data,
                        }),
                    },
                )
                .await
                .with_context(|| format!("Failed to insert chunk {} of blob {}", chunk.index, id.to_hex()))?;
        }

        tracing::debug!(
            "Blob {} stored: {} bytes, {} chunks",
            id.to_hex(),
            data.len(),
            chunk_count
        );

        Ok(StoredBlob {
            id,
            length: data.len() as u64,
            chunk_count,
            sha256,
        })
    }

    async fn open(&self, id: ObjectId) -> Result<BlobByteStream> {
        let descriptor = self
            .store
            .find_one(BLOBS, doc! { "_id": id })
            .await?
            .with_context(|| format!("Blob {} has no descriptor", id.to_hex()))?;
        let total = descriptor.get_i32("chunk_count").unwrap_or(0) as u32;

        let store = self.store.clone();
        let stream = futures::stream::try_unfold(0u32, move |index| {
            let store = store.clone();
            async move {
                if index >= total {
                    return Ok(None);
                }
                let chunk = store
                    .find_one(CHUNKS, doc! { "blob_id": id, "index": index as i32 })
                    .await?
                    .with_context(|| {
                        format!("Missing chunk {} of blob {}", index, id.to_hex())
                    })?;
                let data = match chunk.get("data") {
                    Some(Bson::Binary(bin)) => Bytes::from(bin.bytes.clone()),
                    _ => bail!("Chunk {} of blob {} has no data", index, id.to_hex()),
                };
                Ok(Some((data, index + 1)))
            }
        });

        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use futures::TryStreamExt;

    fn blob_store(chunk_size: usize) -> ChunkedBlobStore {
        ChunkedBlobStore::new(Arc::new(MemoryStore::new()), chunk_size)
    }

    #[tokio::test]
    async fn test_put_then_open_round_trip() {
        let store = blob_store(4);
        let data: Vec<u8> = (0u8..=9).collect();
        let blob = store.put(&data).await.unwrap();
        assert_eq!(blob.length, 10);
        assert_eq!(blob.chunk_count, 3); // 4+4+2

        let chunks: Vec<Bytes> = store.open(blob.id).await.unwrap().try_collect().await.unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 4);
        assert_eq!(chunks[2].len(), 2);
        let joined: Vec<u8> = chunks.concat();
        assert_eq!(joined, data);
    }

    #[tokio::test]
    async fn test_digest_matches_content() {
        let store = blob_store(1024);
        let blob = store.put(b"hello world").await.unwrap();
        assert_eq!(
            blob.sha256,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[tokio::test]
    async fn test_open_unknown_blob_fails() {
        let store = blob_store(1024);
        assert!(store.open(ObjectId::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_replaced_blob_remains_readable() {
        // Re-uploads never delete the prior blob; both stay addressable.
        let store = blob_store(1024);
        let first = store.put(b"first").await.unwrap();
        let second = store.put(b"second").await.unwrap();
        assert_ne!(first.id, second.id);

        let bytes: Vec<Bytes> = store.open(first.id).await.unwrap().try_collect().await.unwrap();
        assert_eq!(bytes.concat(), b"first");
    }
}
