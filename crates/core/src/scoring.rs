//! Image/prompt similarity scoring.
//!
//! The embedding model is an external capability behind [`ImageEmbedder`]
//! and [`TextEmbedder`]; this module owns the arithmetic that turns two
//! embeddings into a score in `[-1, 1]` rounded to four decimals.
//!
//! Scoring is CPU-bound and synchronous. Async callers must run it on a
//! blocking thread.

/// Decimal places kept in a reported score.
pub const SCORE_DECIMALS: i32 = 4;

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Embedding dimensions differ (image {image}, text {text})")]
    DimensionMismatch { image: usize, text: usize },

    #[error("Embedding has zero magnitude")]
    ZeroVector,

    #[error("Similarity is not a finite number")]
    NonFinite,
}

/// Scores how well an image matches the prompt it was generated from.
pub trait QualityScorer: Send + Sync {
    fn score(&self, image: &[u8], prompt: &str) -> Result<f64, ScoringError>;
}

/// Maps encoded image bytes to an embedding vector.
pub trait ImageEmbedder: Send + Sync {
    fn embed_image(&self, image: &[u8]) -> Result<Vec<f32>, ScoringError>;
}

/// Maps prompt text to an embedding vector in the same space as images.
pub trait TextEmbedder: Send + Sync {
    fn embed_text(&self, text: &str) -> Result<Vec<f32>, ScoringError>;
}

/// [`QualityScorer`] over a pair of embedders (e.g. a CLIP model).
///
/// Load the model once when constructing the embedders; `score` only runs
/// inference.
pub struct EmbeddingScorer<I, T> {
    image: I,
    text: T,
}

impl<I: ImageEmbedder, T: TextEmbedder> EmbeddingScorer<I, T> {
    pub fn new(image: I, text: T) -> Self {
        Self { image, text }
    }
}

impl<I: ImageEmbedder, T: TextEmbedder> QualityScorer for EmbeddingScorer<I, T> {
    fn score(&self, image: &[u8], prompt: &str) -> Result<f64, ScoringError> {
        let image_features = self.image.embed_image(image)?;
        let text_features = self.text.embed_text(prompt)?;
        cosine_similarity(&image_features, &text_features).map(round_score)
    }
}

/// Cosine similarity of two equal-length vectors. Embeddings containing NaN
/// or infinite components are rejected.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, ScoringError> {
    if a.len() != b.len() {
        return Err(ScoringError::DimensionMismatch {
            image: a.len(),
            text: b.len(),
        });
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(ScoringError::ZeroVector);
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !similarity.is_finite() {
        return Err(ScoringError::NonFinite);
    }
    Ok(similarity)
}

/// Clamp to `[-1, 1]` and round to [`SCORE_DECIMALS`] places.
pub fn round_score(raw: f64) -> f64 {
    let factor = 10_f64.powi(SCORE_DECIMALS);
    (raw.clamp(-1.0, 1.0) * factor).round() / factor
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
