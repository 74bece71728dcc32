//! REST client for the text-to-image endpoint.
//!
//! One generation call per invocation, no retries. In URL output mode the
//! returned link is fetched exactly once with the same pooled client.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use houme_core::image::probe_image;

use crate::config::{ImageGenConfig, OutputFormat};
use crate::messages::{GenerationRequest, GenerationResponse};
use crate::{GeneratedImage, ImageGenerator};

/// Errors from the image generation stage.
#[derive(Debug, thiserror::Error)]
pub enum ImageGenError {
    /// The generation request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The generation API returned a non-2xx status code.
    #[error("Image generation API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body, verbatim.
        body: String,
    },

    /// The response parsed but did not carry the expected image field.
    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),

    /// `b64_json` was not valid base64.
    #[error("Invalid base64 image payload: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Downloading the image from a returned URL failed.
    #[error("Image fetch from {url} failed: {reason}")]
    Fetch {
        url: String,
        /// HTTP status when the server answered with a non-2xx code.
        status: Option<u16>,
        reason: String,
    },
}

impl ImageGenError {
    /// True for failures of the secondary URL fetch.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

/// HTTP client for the image generation API.
pub struct ImageGenApi {
    client: reqwest::Client,
    config: ImageGenConfig,
}

impl ImageGenApi {
    /// Build a client with the configured timeout.
    pub fn new(config: ImageGenConfig) -> Result<Self, ImageGenError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ImageGenError::Request)?;
        Ok(Self { client, config })
    }

    /// Generate one image for `prompt` and return its encoded bytes.
    pub async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ImageGenError> {
        tracing::info!(
            model = %self.config.model,
            size = %self.config.size,
            prompt_chars = prompt.chars().count(),
            "Requesting image generation",
        );

        let response = self
            .client
            .post(self.config.generations_url())
            .bearer_auth(&self.config.api_key)
            .json(&GenerationRequest::new(&self.config, prompt))
            .send()
            .await
            .map_err(ImageGenError::Request)?;

        let response = Self::ensure_success(response).await?;
        let body = response.bytes().await.map_err(ImageGenError::Request)?;
        let parsed: GenerationResponse = serde_json::from_slice(&body)
            .map_err(|e| ImageGenError::MalformedResponse(e.to_string()))?;

        let first = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ImageGenError::MalformedResponse("response has no images".into()))?;

        let bytes = match self.config.output_format {
            OutputFormat::B64Json => {
                let encoded = first.b64_json.ok_or_else(|| {
                    ImageGenError::MalformedResponse("data[0].b64_json is missing".into())
                })?;
                STANDARD.decode(encoded.trim())?
            }
            OutputFormat::Url => {
                let url = first.url.ok_or_else(|| {
                    ImageGenError::MalformedResponse("data[0].url is missing".into())
                })?;
                self.fetch_image(&url).await?
            }
        };

        let info = match probe_image(&bytes) {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!(error = %e, bytes = bytes.len(), "Could not read image header");
                None
            }
        };

        Ok(GeneratedImage { bytes, info })
    }

    // ---- private helpers ----

    /// Single GET of an image link returned in URL mode.
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ImageGenError> {
        tracing::debug!(%url, "Fetching generated image");

        let fetch_err = |status: Option<u16>, reason: String| ImageGenError::Fetch {
            url: url.to_string(),
            status,
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_err(None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(Some(status.as_u16()), format!("status {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| fetch_err(None, e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Ensure the response has a success status code, or turn it into
    /// [`ImageGenError::Api`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ImageGenError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "Image generation API returned an error");
            return Err(ImageGenError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ImageGenerator for ImageGenApi {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageGenError> {
        self.generate_image(prompt).await
    }
}
