//! Stage sequencing for one image request.
//!
//! Held in the API state as an `Arc<ImagePipeline>`. A run moves through
//! fragments, composition, generation, upload and (optionally) scoring.
//! The first failing stage ends the run; nothing is retried and objects
//! already uploaded are not removed.

use std::sync::Arc;

use houme_core::area::AreaLabelMode;
use houme_core::error::CoreError;
use houme_core::prompt::{compose_from_fragments, PromptSelection};
use houme_core::scoring::{round_score, QualityScorer};
use houme_imagegen::ImageGenerator;
use houme_storage::ArtifactPublisher;

use crate::artifact::ImageArtifact;
use crate::error::PipelineError;
use crate::fragments::{fetch_fragments, FragmentSource};

pub struct ImagePipeline {
    fragments: Arc<dyn FragmentSource>,
    generator: Arc<dyn ImageGenerator>,
    publisher: ArtifactPublisher,
    scorer: Option<Arc<dyn QualityScorer>>,
    label_mode: AreaLabelMode,
}

impl ImagePipeline {
    /// A pipeline without a scorer, rendering area categories by code.
    pub fn new(
        fragments: Arc<dyn FragmentSource>,
        generator: Arc<dyn ImageGenerator>,
        publisher: ArtifactPublisher,
    ) -> Self {
        Self {
            fragments,
            generator,
            publisher,
            scorer: None,
            label_mode: AreaLabelMode::default(),
        }
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn QualityScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn with_label_mode(mut self, mode: AreaLabelMode) -> Self {
        self.label_mode = mode;
        self
    }

    pub fn has_scorer(&self) -> bool {
        self.scorer.is_some()
    }

    /// Fetch fragments and compose the prompt without generating anything.
    pub async fn compose(&self, selection: &PromptSelection) -> Result<String, PipelineError> {
        let fragments = fetch_fragments(self.fragments.as_ref(), selection).await?;
        tracing::debug!(
            floor_plan = %fragments.floor_plan,
            tag = %fragments.tag,
            furniture = %fragments.furniture,
            "Fragments fetched"
        );

        let prompt = compose_from_fragments(&fragments, selection.area, self.label_mode);
        tracing::info!(
            area = %selection.area,
            prompt_chars = prompt.chars().count(),
            "Prompt composed"
        );
        Ok(prompt)
    }

    /// Full chain: compose, then generate, upload and score.
    pub async fn run(&self, selection: &PromptSelection) -> Result<ImageArtifact, PipelineError> {
        let prompt = self.compose(selection).await?;
        self.generate_from_prompt(&prompt).await
    }

    /// Generate, upload and score an image for a caller-supplied prompt.
    pub async fn generate_from_prompt(&self, prompt: &str) -> Result<ImageArtifact, PipelineError> {
        if prompt.trim().is_empty() {
            return Err(CoreError::Validation("Prompt must not be blank".into()).into());
        }

        // 1. Generate.
        let image = self.generator.generate(prompt).await.map_err(|e| {
            tracing::error!(error = %e, "Image generation failed");
            PipelineError::from(e)
        })?;
        tracing::info!(
            width = image.info.map(|i| i.width),
            height = image.info.map(|i| i.height),
            bytes = image.bytes.len(),
            "Image generated"
        );
        match image.info {
            Some(info) if !info.is_png() => {
                tracing::warn!(image_format = ?info.format, "Generator returned a non-PNG image");
            }
            None => tracing::warn!("Generator returned an unrecognized payload"),
            Some(_) => {}
        }

        // 2. Upload.
        let published = self
            .publisher
            .publish(&image.bytes)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Artifact upload failed");
                PipelineError::from(e)
            })?;

        // 3. Score (best-effort).
        let score = self.score(image.bytes, prompt.to_string()).await;

        Ok(ImageArtifact::new(published, prompt.to_string(), score))
    }

    async fn score(&self, bytes: Vec<u8>, prompt: String) -> Option<f64> {
        let scorer = Arc::clone(self.scorer.as_ref()?);

        match tokio::task::spawn_blocking(move || scorer.score(&bytes, &prompt)).await {
            Ok(Ok(raw)) if !raw.is_finite() => {
                tracing::warn!(raw, "Scorer returned a non-finite value, omitting score");
                None
            }
            Ok(Ok(raw)) => {
                let score = round_score(raw);
                tracing::info!(score, "Image scored");
                Some(score)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Scoring failed, omitting score");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Scoring task did not complete, omitting score");
                None
            }
        }
    }
}
