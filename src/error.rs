//! Pipeline error taxonomy and its HTTP mapping.
//!
//! Only two failure classes abort a job: missing input and transcoding
//! failure. Remote-storage failures are retried, then logged and swallowed
//! by the uploader; they never reach this type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// File, subject or lesson absent from the request. The job never starts.
    #[error("missing required fields")]
    MissingInput,

    /// Multipart decode failure or per-file size limit exceeded.
    #[error("file upload failed: {0}")]
    Upload(String),

    /// The transcoding engine reported a terminal error. The working
    /// directory is left in place for inspection.
    #[error("conversion failed: {0}")]
    Transcode(String),

    /// Anything unexpected (filesystem, serialization).
    #[error("internal server error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Internal(err.to_string())
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            PipelineError::MissingInput => (
                StatusCode::BAD_REQUEST,
                "Missing required fields",
                None,
            ),
            PipelineError::Upload(details) => {
                (StatusCode::BAD_REQUEST, "File upload failed", Some(details))
            }
            PipelineError::Transcode(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Conversion failed",
                Some(details),
            ),
            PipelineError::Internal(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                Some(details),
            ),
        };

        let body = match details {
            Some(details) => json!({ "error": error, "details": details }),
            None => json!({ "error": error }),
        };
        (status, Json(body)).into_response()
    }
}
