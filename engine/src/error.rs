use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Brand file error: {0}")]
    BrandFile(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            _ => {
                tracing::error!("Internal server error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

/// Failure of the redirect probe. Never a phishing signal on its own.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("redirect probe timed out after {0:?}")]
    Timeout(Duration),

    #[error("redirect probe failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unusable Location header: {0}")]
    InvalidLocation(String),

    #[error("cannot probe {0}")]
    InvalidUrl(String),
}

/// A scheme-prefixed destination that does not parse, or whose host is not DNS-shaped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid destination {input:?}: {reason}")]
pub struct MalformedDestination {
    pub input: String,
    pub reason: String,
}

impl MalformedDestination {
    pub fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

// Helper function for creating validation errors
pub fn validation_error(msg: &str) -> AppError {
    AppError::InvalidInput(msg.to_string())
}
