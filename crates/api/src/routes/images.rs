//! ```text
//! POST /                generate_image
//! POST /generate        generate_from_prompt
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(images::generate_image))
        .route("/generate", post(images::generate_from_prompt))
}
