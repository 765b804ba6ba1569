//! Application-level errors and their HTTP rendering.

use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::routing::RoutingError;

/// A well-formed HTTP error. Returned by a handler, it becomes the response
/// unchanged.
#[derive(Debug, Clone, Error)]
#[error("{status}: {}", .detail.as_deref().unwrap_or(""))]
pub struct HttpError {
    pub status: StatusCode,
    pub detail: Option<String>,
    pub comment: Option<String>,
}

impl HttpError {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            detail: None,
            comment: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST).with_detail(detail)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND)
    }

    pub fn payload_too_large(limit: usize) -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE).with_detail(format!("Request body exceeds {limit} bytes"))
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY).with_detail(detail)
    }

    pub fn internal(detail: impl Into<String>, comment: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR)
            .with_detail(detail)
            .with_comment(comment)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: u16,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: self.status.as_u16(),
            title: self.status.canonical_reason().unwrap_or("Error"),
            detail: self.detail.as_deref(),
            comment: self.comment.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Failure returned by an operation handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Passed through to the client as is.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Link generation failed inside the handler.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// Anything else; reported as a server error.
    #[error(transparent)]
    Other(Box<dyn StdError + Send + Sync>),
}

impl HandlerError {
    pub fn other(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        HandlerError::Other(err.into())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::other(err)
    }
}

/// Render an error and its `source()` chain as a diagnostic trace.
pub fn error_trace(err: &(dyn StdError + 'static)) -> String {
    let mut lines = vec![format!("error: {err}")];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {cause}"));
        source = cause.source();
    }
    lines.join("\n")
}
