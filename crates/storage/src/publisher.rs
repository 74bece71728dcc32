//! Key assignment and upload of generated images.

use std::sync::Arc;

use houme_core::image::{PNG_CONTENT_TYPE, PNG_EXTENSION};
use uuid::Uuid;

use crate::{ArtifactStore, StorageError};

/// Where an artifact landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedArtifact {
    /// Object key, `{prefix}/{uuid}.{ext}`.
    pub key: String,
    /// Key without the prefix, `{uuid}.{ext}`.
    pub original_filename: String,
    pub url: String,
    pub content_type: String,
}

/// Uploads images under freshly generated `.png` keys with content type
/// `image/png`.
///
/// Every call uses a new UUID, so retrying a failed publish never collides
/// with a previous attempt.
#[derive(Clone)]
pub struct ArtifactPublisher {
    store: Arc<dyn ArtifactStore>,
    key_prefix: String,
}

impl ArtifactPublisher {
    pub fn new(store: Arc<dyn ArtifactStore>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
        }
    }

    /// Upload `bytes` and return the key and public URL.
    pub async fn publish(&self, bytes: &[u8]) -> Result<PublishedArtifact, StorageError> {
        let original_filename = format!("{}.{PNG_EXTENSION}", Uuid::new_v4());
        let key = object_key(&self.key_prefix, &original_filename);

        self.store.put(&key, bytes, PNG_CONTENT_TYPE).await?;
        let url = self.store.public_url(&key);
        tracing::info!(%key, %url, bytes = bytes.len(), "Artifact uploaded");

        Ok(PublishedArtifact {
            key,
            original_filename,
            url,
            content_type: PNG_CONTENT_TYPE.to_string(),
        })
    }
}

/// Join prefix and file name; an empty prefix yields the bare name.
pub fn object_key(prefix: &str, filename: &str) -> String {
    if prefix.is_empty() {
        filename.to_string()
    } else {
        format!("{prefix}/{filename}")
    }
}
