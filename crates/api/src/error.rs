use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use houme_core::error::CoreError;
use houme_imagegen::ImageGenError;
use houme_pipeline::PipelineError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`PipelineError`]. Implements [`IntoResponse`]
/// to produce consistent JSON error responses of the form `{error, code}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `houme_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed pipeline run. The response names the failing stage.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Status, code, message and any extra body fields of an error response.
struct ErrorParts {
    status: StatusCode,
    code: &'static str,
    message: String,
    extra: Option<Value>,
}

impl ErrorParts {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            extra: None,
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (parts, stage) = match &self {
            AppError::Core(core) => (classify_core_error(core), None),
            AppError::Pipeline(err) => (classify_pipeline_error(err), Some(err.stage())),
        };

        let mut body = json!({
            "error": parts.message,
            "code": parts.code,
        });
        if let Some(stage) = stage {
            body["stage"] = json!(stage);
        }
        if let (Some(Value::Object(extra)), Some(obj)) = (parts.extra, body.as_object_mut()) {
            obj.extend(extra);
        }

        (parts.status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::Validation(msg) => {
            ErrorParts::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
    }
}

/// Everything from sqlx maps to 500 with a sanitized message; fragment
/// lookups never surface missing rows as errors.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    tracing::error!(error = %err, "Database error");
    ErrorParts::internal()
}

fn classify_pipeline_error(err: &PipelineError) -> ErrorParts {
    match err {
        PipelineError::Validation(core) => classify_core_error(core),
        PipelineError::Fragments(db) => classify_sqlx_error(db),
        PipelineError::Generation(gen) => classify_generation_error(gen),
        PipelineError::Upload(storage) => {
            tracing::error!(error = %storage, "Storage error");
            ErrorParts::new(
                StatusCode::BAD_GATEWAY,
                "STORAGE_ERROR",
                "Failed to store the generated image",
            )
        }
    }
}

/// Upstream failures map to 502. The generation API's status and body are
/// passed through so callers can see quota and moderation rejections.
fn classify_generation_error(err: &ImageGenError) -> ErrorParts {
    match err {
        ImageGenError::Api { status, body } => ErrorParts {
            extra: Some(json!({
                "upstream_status": status,
                "upstream_body": body,
            })),
            ..ErrorParts::new(
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_GENERATION_ERROR",
                format!("Image generation API returned status {status}"),
            )
        },
        ImageGenError::Fetch { .. } => {
            ErrorParts::new(StatusCode::BAD_GATEWAY, "UPSTREAM_FETCH_ERROR", err.to_string())
        }
        other => ErrorParts::new(
            StatusCode::BAD_GATEWAY,
            "UPSTREAM_GENERATION_ERROR",
            other.to_string(),
        ),
    }
}
