use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use claude_client::ClaudeError;
use studio_core::error::StudioError;

use crate::capture::CaptureError;
use crate::stripe::StripeError;
use crate::webhook::WebhookError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 400 Bad Request errors
// ---------------------------------------------------------------------------

/// Carries an explicit HTTP 400 through the `anyhow::Error` chain for
/// request validation that has no `StudioError` counterpart.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<BadRequestError>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        if let Some(e) = self.0.downcast_ref::<JsonRejection>() {
            return e.status();
        }
        if let Some(e) = self.0.downcast_ref::<QueryRejection>() {
            return e.status();
        }
        if let Some(e) = self.0.downcast_ref::<StudioError>() {
            return match e {
                StudioError::NotInitialized => StatusCode::BAD_REQUEST,
                StudioError::PillarNotFound(_)
                | StudioError::ContentNotFound(_)
                | StudioError::TaskNotFound(_)
                | StudioError::GoalNotFound(_)
                | StudioError::ColumnNotFound(_)
                | StudioError::RowNotFound(_) => StatusCode::NOT_FOUND,
                StudioError::ContentExists(_) => StatusCode::CONFLICT,
                StudioError::InvalidId(_)
                | StudioError::InvalidName(_)
                | StudioError::InvalidDate(_)
                | StudioError::InvalidStatus(_)
                | StudioError::InvalidLink(_) => StatusCode::BAD_REQUEST,
                StudioError::PinLimit(_)
                | StudioError::LastStandardColumn
                | StudioError::LastRow => StatusCode::UNPROCESSABLE_ENTITY,
                StudioError::Io(_) | StudioError::Yaml(_) | StudioError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
        }
        if let Some(e) = self.0.downcast_ref::<StripeError>() {
            return match e {
                StripeError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                e if e.is_client_error() => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }
        if let Some(e) = self.0.downcast_ref::<CaptureError>() {
            return if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
        }
        if self.0.downcast_ref::<WebhookError>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        if let Some(ClaudeError::MissingApiKey) = self.0.downcast_ref::<ClaudeError>() {
            return StatusCode::SERVICE_UNAVAILABLE;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:#}", self.0);
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
