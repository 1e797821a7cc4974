pub mod api;
pub mod config;
pub mod ids;
pub mod models;
pub mod refs;
pub mod repo;
pub mod serialize;
pub mod storage;
pub mod store;

use std::sync::Arc;

use config::AppConfig;
use repo::Repositories;
use storage::blobs::{BlobStore, ChunkedBlobStore};
use storage::media::MediaManager;
use store::DocumentStore;

/// Shared application state. All persistent state lives in the injected
/// stores; requests share nothing mutable in-process.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub repos: Repositories,
    pub media: MediaManager,
}

impl AppState {
    /// Wire repositories, the chunked blob store and the media manager onto
    /// an injected document store handle.
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        let repos = Repositories::new(store.clone());
        let blobs: Arc<dyn BlobStore> =
            Arc::new(ChunkedBlobStore::new(store.clone(), config.chunk_size_bytes()));
        let media = MediaManager::new(repos.clone(), store, blobs);
        Self {
            config,
            repos,
            media,
        }
    }
}
