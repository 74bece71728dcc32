use std::fmt;

use houme_core::error::CoreError;
use houme_imagegen::ImageGenError;
use houme_storage::StorageError;
use serde::Serialize;

/// Named step of the pipeline a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Validation,
    Fragments,
    Generation,
    Fetch,
    Upload,
}

impl PipelineStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Fragments => "fragments",
            Self::Generation => "generation",
            Self::Fetch => "fetch",
            Self::Upload => "upload",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed pipeline run. Scoring never fails a run, so it has no variant.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("Fragment lookup failed: {0}")]
    Fragments(#[from] sqlx::Error),

    #[error("Image generation failed: {0}")]
    Generation(#[from] ImageGenError),

    #[error("Artifact upload failed: {0}")]
    Upload(#[from] StorageError),
}

impl PipelineError {
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Validation(_) => PipelineStage::Validation,
            Self::Fragments(_) => PipelineStage::Fragments,
            Self::Generation(e) if e.is_fetch() => PipelineStage::Fetch,
            Self::Generation(_) => PipelineStage::Generation,
            Self::Upload(_) => PipelineStage::Upload,
        }
    }
}
