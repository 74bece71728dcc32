//! Pipeline runs against in-memory fakes of every stage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use async_trait::async_trait;
use houme_core::area::{AreaCategory, AreaLabelMode};
use houme_core::image::ImageInfo;
use houme_core::prompt::{PromptSelection, FLOOR_PLAN_PLACEHOLDER, TAG_PLACEHOLDER};
use houme_core::scoring::{QualityScorer, ScoringError};
use houme_core::types::DbId;
use houme_imagegen::{GeneratedImage, ImageGenError, ImageGenerator};
use houme_pipeline::{FragmentSource, ImagePipeline, PipelineError, PipelineStage};
use houme_storage::{ArtifactPublisher, ArtifactStore, MemoryArtifactStore, StorageError};
use image::ImageFormat;

const BUCKET: &str = "houme-images";
const REGION: &str = "ap-northeast-2";

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeFragments {
    floor_plans: HashMap<DbId, String>,
    tags: HashMap<DbId, String>,
    furniture: HashMap<DbId, String>,
    unavailable: bool,
    reads: AtomicUsize,
}

impl FakeFragments {
    fn floor_plan(mut self, id: DbId, text: &str) -> Self {
        self.floor_plans.insert(id, text.into());
        self
    }

    fn tag(mut self, id: DbId, text: &str) -> Self {
        self.tags.insert(id, text.into());
        self
    }

    fn furniture(mut self, id: DbId, text: &str) -> Self {
        self.furniture.insert(id, text.into());
        self
    }

    fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    fn read(&self) -> Result<(), sqlx::Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FragmentSource for FakeFragments {
    async fn floor_plan_prompt(&self, id: DbId) -> Result<Option<String>, sqlx::Error> {
        self.read()?;
        Ok(self.floor_plans.get(&id).cloned())
    }

    async fn tag_prompt(&self, id: DbId) -> Result<Option<String>, sqlx::Error> {
        self.read()?;
        Ok(self.tags.get(&id).cloned())
    }

    async fn furniture_prompts(&self, ids: &[DbId]) -> Result<Vec<String>, sqlx::Error> {
        self.read()?;
        let mut sorted = ids.to_vec();
        sorted.sort_unstable();
        Ok(sorted
            .iter()
            .filter_map(|id| self.furniture.get(id).cloned())
            .collect())
    }
}

enum Outcome {
    Png,
    Unrecognized,
    Api(u16, &'static str),
    FetchFailed,
}

struct FakeGenerator {
    outcome: Outcome,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageGenError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.outcome {
            Outcome::Png => Ok(GeneratedImage {
                bytes: b"\x89PNG-fake".to_vec(),
                info: Some(ImageInfo {
                    format: ImageFormat::Png,
                    width: 1536,
                    height: 1024,
                }),
            }),
            Outcome::Unrecognized => Ok(GeneratedImage {
                bytes: b"not-an-image".to_vec(),
                info: None,
            }),
            Outcome::Api(status, body) => Err(ImageGenError::Api {
                status,
                body: body.to_string(),
            }),
            Outcome::FetchFailed => Err(ImageGenError::Fetch {
                url: "https://cdn.example/img.png".into(),
                status: Some(404),
                reason: "Not Found".into(),
            }),
        }
    }
}

struct RejectingStore;

#[async_trait]
impl ArtifactStore for RejectingStore {
    async fn put(&self, key: &str, _: &[u8], _: &str) -> Result<(), StorageError> {
        Err(StorageError::Upload {
            key: key.to_string(),
            message: "AccessDenied".into(),
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://unused/{key}")
    }
}

struct FixedScorer(f64);

impl QualityScorer for FixedScorer {
    fn score(&self, _: &[u8], _: &str) -> Result<f64, ScoringError> {
        Ok(self.0)
    }
}

struct FailingScorer;

impl QualityScorer for FailingScorer {
    fn score(&self, _: &[u8], _: &str) -> Result<f64, ScoringError> {
        Err(ScoringError::Embedding("model not loaded".into()))
    }
}

struct PanickingScorer;

impl QualityScorer for PanickingScorer {
    fn score(&self, _: &[u8], _: &str) -> Result<f64, ScoringError> {
        panic!("scorer crashed");
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Harness {
    fragments: Arc<FakeFragments>,
    generator: Arc<FakeGenerator>,
    store: Arc<MemoryArtifactStore>,
    pipeline: ImagePipeline,
}

fn harness(fragments: FakeFragments, outcome: Outcome) -> Harness {
    let fragments = Arc::new(fragments);
    let generator = Arc::new(FakeGenerator::new(outcome));
    let store = Arc::new(MemoryArtifactStore::new(BUCKET, REGION));
    let pipeline = ImagePipeline::new(
        fragments.clone(),
        generator.clone(),
        ArtifactPublisher::new(store.clone(), "generated"),
    );
    Harness {
        fragments,
        generator,
        store,
        pipeline,
    }
}

fn studio_fragments() -> FakeFragments {
    FakeFragments::default()
        .floor_plan(1, "Bright Studio")
        .tag(2, "Minimalist")
        .furniture(5, "Sofa")
        .furniture(6, "Lamp")
}

fn selection(items: Vec<DbId>) -> PromptSelection {
    PromptSelection::new(1, AreaCategory::Under5, 2, items).unwrap()
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

#[tokio::test]
async fn run_composes_generates_and_uploads() {
    let h = harness(studio_fragments(), Outcome::Png);

    let artifact = h.pipeline.run(&selection(vec![6, 5])).await.unwrap();

    let expected = "Bright Studio\nUNDER_5\nMinimalist\nSofa\nLamp";
    assert_eq!(artifact.pull_prompt, expected);
    assert_eq!(h.generator.prompts(), vec![expected.to_string()]);

    assert_eq!(artifact.content_type, "image/png");
    assert!(artifact.filename.starts_with("generated/"));
    assert_eq!(artifact.filename, format!("generated/{}", artifact.original_filename));
    assert!(artifact.image_link.contains(BUCKET));
    assert!(artifact.image_link.contains(REGION));
    assert_eq!(artifact.clip_score, None);

    let stored = h.store.get(&artifact.filename).unwrap();
    assert_eq!(stored.bytes, b"\x89PNG-fake");
    assert_eq!(stored.content_type, "image/png");
}

#[tokio::test]
async fn furniture_is_joined_in_ascending_id_order() {
    let fragments = FakeFragments::default()
        .floor_plan(1, "Plan")
        .tag(2, "Tag")
        .furniture(1, "A")
        .furniture(2, "B")
        .furniture(3, "C");
    let h = harness(fragments, Outcome::Png);

    let prompt = h.pipeline.compose(&selection(vec![3, 1, 2])).await.unwrap();

    assert_eq!(prompt, "Plan\nUNDER_5\nTag\nA\nB\nC");
}

#[tokio::test]
async fn missing_rows_fall_back_to_placeholders() {
    let h = harness(FakeFragments::default(), Outcome::Png);

    let prompt = h.pipeline.compose(&selection(vec![9])).await.unwrap();

    assert_eq!(
        prompt,
        format!("{FLOOR_PLAN_PLACEHOLDER}\nUNDER_5\n{TAG_PLACEHOLDER}\n")
    );
}

#[tokio::test]
async fn empty_texts_count_as_missing() {
    let fragments = FakeFragments::default()
        .floor_plan(1, "")
        .tag(2, "")
        .furniture(5, "Sofa");
    let h = harness(fragments, Outcome::Png);

    let prompt = h.pipeline.compose(&selection(vec![5])).await.unwrap();

    assert_eq!(
        prompt,
        format!("{FLOOR_PLAN_PLACEHOLDER}\nUNDER_5\n{TAG_PLACEHOLDER}\nSofa")
    );
}

#[tokio::test]
async fn description_label_mode_renders_area_description() {
    let mut h = harness(studio_fragments(), Outcome::Png);
    h.pipeline = h.pipeline.with_label_mode(AreaLabelMode::Description);

    let prompt = h.pipeline.compose(&selection(vec![5])).await.unwrap();

    assert_eq!(prompt, "Bright Studio\n5-pyeong (≈ 16.53 m²)\nMinimalist\nSofa");
}

#[tokio::test]
async fn compose_does_not_generate() {
    let h = harness(studio_fragments(), Outcome::Png);

    h.pipeline.compose(&selection(vec![5])).await.unwrap();

    assert!(h.generator.prompts().is_empty());
    assert!(h.store.is_empty());
}

// ---------------------------------------------------------------------------
// Stage failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fragment_failure_stops_before_generation() {
    let h = harness(FakeFragments::unavailable(), Outcome::Png);

    let err = h.pipeline.run(&selection(vec![5])).await.unwrap_err();

    assert_eq!(err.stage(), PipelineStage::Fragments);
    assert_matches!(err, PipelineError::Fragments(_));
    assert!(h.fragments.reads.load(Ordering::SeqCst) >= 1);
    assert!(h.generator.prompts().is_empty());
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn generation_failure_uploads_nothing() {
    let h = harness(studio_fragments(), Outcome::Api(429, "rate limited"));

    let err = h.pipeline.run(&selection(vec![5])).await.unwrap_err();

    assert_eq!(err.stage(), PipelineStage::Generation);
    assert_matches!(
        err,
        PipelineError::Generation(ImageGenError::Api { status: 429, ref body }) if body == "rate limited"
    );
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn fetch_failure_is_reported_as_fetch_stage() {
    let h = harness(studio_fragments(), Outcome::FetchFailed);

    let err = h.pipeline.run(&selection(vec![5])).await.unwrap_err();

    assert_eq!(err.stage(), PipelineStage::Fetch);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn upload_failure_is_reported_as_upload_stage() {
    let generator = Arc::new(FakeGenerator::new(Outcome::Png));
    let pipeline = ImagePipeline::new(
        Arc::new(studio_fragments()),
        generator.clone(),
        ArtifactPublisher::new(Arc::new(RejectingStore), "generated"),
    );

    let err = pipeline.run(&selection(vec![5])).await.unwrap_err();

    assert_eq!(err.stage(), PipelineStage::Upload);
    assert_eq!(generator.prompts().len(), 1);
}

#[tokio::test]
async fn blank_prompt_is_rejected_before_generation() {
    let h = harness(studio_fragments(), Outcome::Png);

    let err = h.pipeline.generate_from_prompt("  \n ").await.unwrap_err();

    assert_eq!(err.stage(), PipelineStage::Validation);
    assert!(h.generator.prompts().is_empty());
}

#[tokio::test]
async fn raw_prompt_is_sent_verbatim() {
    let h = harness(FakeFragments::default(), Outcome::Png);

    let artifact = h.pipeline.generate_from_prompt("a cozy loft").await.unwrap();

    assert_eq!(h.generator.prompts(), vec!["a cozy loft".to_string()]);
    assert_eq!(artifact.pull_prompt, "a cozy loft");
    assert_eq!(h.fragments.reads.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.len(), 1);
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scorer_result_is_rounded_to_four_decimals() {
    let mut h = harness(studio_fragments(), Outcome::Png);
    h.pipeline = h.pipeline.with_scorer(Arc::new(FixedScorer(0.31254)));

    let artifact = h.pipeline.run(&selection(vec![5])).await.unwrap();

    assert_eq!(artifact.clip_score, Some(0.3125));
}

#[tokio::test]
async fn out_of_range_score_is_clamped() {
    let mut h = harness(studio_fragments(), Outcome::Png);
    h.pipeline = h.pipeline.with_scorer(Arc::new(FixedScorer(1.7)));

    let artifact = h.pipeline.run(&selection(vec![5])).await.unwrap();

    assert_eq!(artifact.clip_score, Some(1.0));
}

#[tokio::test]
async fn non_finite_score_is_omitted() {
    let mut h = harness(studio_fragments(), Outcome::Png);
    h.pipeline = h.pipeline.with_scorer(Arc::new(FixedScorer(f64::NAN)));

    let artifact = h.pipeline.run(&selection(vec![5])).await.unwrap();

    assert_eq!(artifact.clip_score, None);
    let json = serde_json::to_value(&artifact).unwrap();
    assert!(json.get("clipScore").is_none());
}

#[tokio::test]
async fn scorer_error_omits_score_but_keeps_artifact() {
    let mut h = harness(studio_fragments(), Outcome::Png);
    h.pipeline = h.pipeline.with_scorer(Arc::new(FailingScorer));

    let artifact = h.pipeline.run(&selection(vec![5])).await.unwrap();

    assert_eq!(artifact.clip_score, None);
    assert_eq!(h.store.len(), 1);
}

#[tokio::test]
async fn panicking_scorer_omits_score() {
    let mut h = harness(studio_fragments(), Outcome::Png);
    h.pipeline = h.pipeline.with_scorer(Arc::new(PanickingScorer));
    assert!(h.pipeline.has_scorer());

    let artifact = h.pipeline.run(&selection(vec![5])).await.unwrap();

    assert_eq!(artifact.clip_score, None);
}

#[tokio::test]
async fn unrecognized_payload_is_still_stored_as_png() {
    let h = harness(studio_fragments(), Outcome::Unrecognized);

    let artifact = h.pipeline.run(&selection(vec![5])).await.unwrap();

    assert_eq!(artifact.content_type, "image/png");
    let stored = h.store.get(&artifact.filename).unwrap();
    assert_eq!(stored.bytes, b"not-an-image");
}
