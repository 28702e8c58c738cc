// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request (credential validation, malformed bank data)
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 404 Not Found (no active quiz session)
    NotFound(String),

    // 409 Conflict (duplicate username)
    Conflict(String),

    /// The question bank holds fewer entries than one session samples.
    /// Data-integrity error, not recoverable by retry.
    InsufficientQuestions { available: usize, required: usize },

    /// A session operation was called after every question was submitted.
    SessionFinalized,

    /// Result compilation was requested while questions are still open.
    SessionNotFinalized,

    /// Writing the certificate artifact failed. The compiled result and
    /// the recorded score stay valid.
    ArtifactWrite(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InsufficientQuestions {
                available,
                required,
            } => write!(
                f,
                "question bank holds {} entries, at least {} required",
                available, required
            ),
            AppError::SessionFinalized => write!(f, "quiz session is already finalized"),
            AppError::SessionNotFinalized => write!(f, "quiz session is not finalized yet"),
            AppError::ArtifactWrite(msg) => write!(f, "failed to write certificate: {}", msg),
            other => write!(f, "{:?}", other),
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::InsufficientQuestions { .. } => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            // Caller misuse of the session state machine. The session itself
            // is untouched, so the client can fall back to a safe screen.
            AppError::SessionFinalized | AppError::SessionNotFinalized => {
                let msg = self.to_string();
                (StatusCode::CONFLICT, msg)
            }
            AppError::ArtifactWrite(msg) => {
                tracing::error!("Certificate write failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to save certificate: {}", msg),
                )
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
