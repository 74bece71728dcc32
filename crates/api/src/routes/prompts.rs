use axum::routing::post;
use axum::Router;

use crate::handlers::prompts;
use crate::state::AppState;

/// Routes nested under `/prompts`.
pub fn router() -> Router<AppState> {
    Router::new().route("/compose", post(prompts::compose_prompt))
}
