use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use houme_core::request::{ComposedPrompt, ImageRequest};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/prompts/compose
///
/// Returns the prompt `POST /images` would send, without generating.
pub async fn compose_prompt(
    State(state): State<AppState>,
    Json(input): Json<ImageRequest>,
) -> AppResult<impl IntoResponse> {
    let selection = input.into_selection()?;
    let prompt = state.pipeline.compose(&selection).await?;

    Ok(Json(DataResponse {
        data: ComposedPrompt { prompt },
    }))
}
