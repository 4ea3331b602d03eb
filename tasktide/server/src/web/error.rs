use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tasktide_core::{TaskError, ValidationError};
use utoipa::ToSchema;

const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong";

/// JSON body of every failed API response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Short description of what failed
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Every field-level violation, for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: None,
            details: None,
        }
    }
}

/// Custom error type for API handler operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body violated the task schema.
    #[error("Validation error")]
    Validation(#[from] ValidationError),
    #[error("Task not found")]
    TaskNotFound,
    /// The request was malformed in a way that is not a schema violation.
    #[error("{0}")]
    BadRequest(&'static str),
    /// Anything else. The cause is logged but never sent to the client.
    #[error("{context}")]
    Internal {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    /// Maps a service failure, naming the operation for unexpected errors.
    pub fn from_task_error(context: &'static str) -> impl FnOnce(TaskError) -> ApiError {
        move |error| match error {
            TaskError::NotFound(_) => ApiError::TaskNotFound,
            other => ApiError::Internal {
                context,
                source: other.into(),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ValidationError::new(vec![rejection.body_text()]))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, body) = match self {
            ApiError::Validation(error) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    details: Some(error.details),
                    ..ErrorResponse::new("Validation error")
                },
            ),
            ApiError::TaskNotFound => (StatusCode::NOT_FOUND, ErrorResponse::new("Task not found")),
            ApiError::BadRequest(error) => (StatusCode::BAD_REQUEST, ErrorResponse::new(error)),
            ApiError::Internal { context, source } => {
                tracing::error!("{}: {:#}", context, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        message: Some(INTERNAL_ERROR_MESSAGE.to_string()),
                        ..ErrorResponse::new(context)
                    },
                )
            }
        };

        (status_code, Json(body)).into_response()
    }
}
