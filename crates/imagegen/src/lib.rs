//! Text-to-image generation client.
//!
//! Provides the [`ImageGenerator`] seam used by the pipeline and the
//! [`ImageGenApi`](api::ImageGenApi) implementation that talks to an
//! OpenAI-compatible images endpoint over HTTP.

use async_trait::async_trait;
use houme_core::image::ImageInfo;

pub mod api;
pub mod config;
pub mod messages;

pub use api::{ImageGenApi, ImageGenError};
pub use config::{ImageGenConfig, OutputFormat};

/// An encoded image fresh from the generator.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    /// Header details, or `None` when the payload is not a recognizable
    /// image. Unrecognized payloads are still passed on.
    pub info: Option<ImageInfo>,
}

/// Turns a prompt into image bytes.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageGenError>;
}
