//! Object storage for generated artifacts.
//!
//! [`ArtifactStore`] is the provider seam; [`S3ArtifactStore`] is the
//! production backend and [`MemoryArtifactStore`] backs tests and local
//! runs. [`ArtifactPublisher`] assigns keys and builds public URLs on top
//! of any store.

use async_trait::async_trait;

pub mod config;
pub mod memory;
pub mod publisher;
pub mod s3;

pub use config::StorageConfig;
pub use memory::MemoryArtifactStore;
pub use publisher::{ArtifactPublisher, PublishedArtifact};
pub use s3::S3ArtifactStore;

/// Errors from the upload stage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The provider rejected or failed the write.
    #[error("Failed to upload object '{key}': {message}")]
    Upload { key: String, message: String },
}

/// A bucket-like object store.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write `bytes` under `key`. Either the object exists afterwards or an
    /// error is returned.
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), StorageError>;

    /// Publicly addressable URL of `key`.
    fn public_url(&self, key: &str) -> String;
}

/// Virtual-hosted style S3 URL: `https://{bucket}.s3.{region}.amazonaws.com/{key}`.
pub fn s3_public_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com/{key}")
}
