use houme_storage::PublishedArtifact;
use serde::Serialize;

/// Result of a successful pipeline run, as returned to API callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageArtifact {
    /// Object key in the bucket.
    pub filename: String,
    pub original_filename: String,
    pub image_link: String,
    pub content_type: String,
    /// Image/prompt similarity. Omitted when no scorer is configured or
    /// scoring failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_score: Option<f64>,
    /// The exact prompt sent to the generator.
    pub pull_prompt: String,
}

impl ImageArtifact {
    pub fn new(published: PublishedArtifact, prompt: String, score: Option<f64>) -> Self {
        Self {
            filename: published.key,
            original_filename: published.original_filename,
            image_link: published.url,
            content_type: published.content_type,
            clip_score: score,
            pull_prompt: prompt,
        }
    }
}
