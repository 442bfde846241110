//! Errors surfaced to HTTP callers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    TranscriptFetch(String),

    #[error("{0}")]
    Summarization(String),

    /// Body missing, not JSON, or not shaped like a `VideoRequest`
    #[error("{1}")]
    InvalidBody(StatusCode, String),
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.status(), rejection.body_text())
    }
}

impl Error {
    pub fn transcript_fetch(err: impl std::fmt::Display) -> Self {
        Self::TranscriptFetch(err.to_string())
    }

    pub fn summarization(err: impl std::fmt::Display) -> Self {
        Self::Summarization(err.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::TranscriptFetch(_) => StatusCode::BAD_REQUEST,
            // A bad URL is reported the same way as an LLM failure
            Error::InvalidInput(_) | Error::Summarization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::InvalidBody(status, _) => *status,
        }
    }

    /// Human-readable message placed in the `detail` field
    pub fn detail(&self) -> String {
        match self {
            Error::TranscriptFetch(msg) => format!("Error fetching transcript: {msg}"),
            Error::InvalidInput(msg) | Error::Summarization(msg) => format!("Error summarizing video: {msg}"),
            Error::InvalidBody(_, msg) => msg.clone(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = ErrorResponse { detail: self.detail() };
        (self.status_code(), Json(body)).into_response()
    }
}
