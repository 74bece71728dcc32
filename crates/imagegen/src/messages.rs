//! Wire types for the image generation endpoint.

use serde::{Deserialize, Serialize};

use crate::config::{ImageBackground, ImageGenConfig, ImageQuality, ImageSize};

/// Body of `POST /v1/images/generations`.
#[derive(Debug, Serialize)]
pub struct GenerationRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub n: u32,
    pub size: ImageSize,
    pub quality: ImageQuality,
    pub background: ImageBackground,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(config: &'a ImageGenConfig, prompt: &'a str) -> Self {
        Self {
            model: &config.model,
            prompt,
            n: config.n,
            size: config.size,
            quality: config.quality,
            background: config.background,
        }
    }
}

/// Successful generation response. Only the first image is used.
#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub data: Vec<GeneratedImageData>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedImageData {
    pub b64_json: Option<String>,
    pub url: Option<String>,
}
