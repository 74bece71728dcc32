//! Image pipeline: fragments, composition, generation, upload and scoring.
//!
//! [`ImagePipeline`] sequences the stages. Each external step sits behind a
//! trait ([`FragmentSource`], [`houme_imagegen::ImageGenerator`],
//! [`houme_storage::ArtifactStore`], [`houme_core::scoring::QualityScorer`])
//! so the chain can run against in-memory fakes.

pub mod artifact;
pub mod error;
pub mod fragments;
pub mod orchestrator;

pub use artifact::ImageArtifact;
pub use error::{PipelineError, PipelineStage};
pub use fragments::{fetch_fragments, FragmentSource, PgFragmentSource};
pub use orchestrator::ImagePipeline;
