use std::sync::Arc;

use houme_pipeline::ImagePipeline;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: houme_db::DbPool,
    /// Fragment, generation, upload and scoring stages.
    pub pipeline: Arc<ImagePipeline>,
}
