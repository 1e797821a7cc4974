pub mod blobs;
pub mod chunker;
pub mod hasher;
pub mod media;
