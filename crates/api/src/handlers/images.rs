//! Handlers for image generation.
//!
//! Routes:
//! - `POST /images`: compose from fragment ids, generate, upload
//! - `POST /images/generate`: generate and upload from a caller prompt

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use houme_core::request::{ImageRequest, RawPromptRequest};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/images
///
/// Runs the full pipeline and returns the stored artifact.
pub async fn generate_image(
    State(state): State<AppState>,
    Json(input): Json<ImageRequest>,
) -> AppResult<impl IntoResponse> {
    let selection = input.into_selection()?;
    tracing::info!(
        floor_plan_id = selection.floor_plan_id,
        tag_id = selection.category_tag_id,
        furniture_ids = ?selection.item_tag_ids(),
        area = %selection.area,
        "Image generation requested"
    );

    let artifact = state.pipeline.run(&selection).await?;

    Ok(Json(DataResponse { data: artifact }))
}

/// POST /api/v1/images/generate
pub async fn generate_from_prompt(
    State(state): State<AppState>,
    Json(input): Json<RawPromptRequest>,
) -> AppResult<impl IntoResponse> {
    let prompt = input.into_prompt()?;
    let artifact = state.pipeline.generate_from_prompt(&prompt).await?;

    Ok(Json(DataResponse { data: artifact }))
}
