pub mod health;
pub mod images;
pub mod prompts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /images                  generate from fragment ids (POST)
/// /images/generate         generate from a raw prompt (POST)
/// /prompts/compose         compose a prompt without generating (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/images", images::router())
        .nest("/prompts", prompts::router())
}
