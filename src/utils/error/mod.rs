//! Error types for the relay

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Result type alias for the relay
pub type Result<T> = std::result::Result<T, RelayError>;

/// Main error type for the relay
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// No credential resolvable from the request or the environment
    #[error("API key not configured")]
    MissingApiKey,

    /// Upstream rejected the request; status and body are relayed verbatim
    #[error("API Error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// Upstream answered success but carried no body to stream
    #[error("Empty API response")]
    EmptyUpstreamBody,

    /// Transport failure while reading the upstream stream
    #[error("Upstream read error: {0}")]
    UpstreamRead(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Plain-text bodies: the chat client renders them directly. The
        // upstream body passes through verbatim; everything else maps to a
        // fixed message with no internal detail.
        let body = match self {
            RelayError::Upstream { body, .. } => body.clone(),
            RelayError::MissingApiKey => "API key not configured".to_string(),
            RelayError::EmptyUpstreamBody => "Empty API response".to_string(),
            _ => "Internal Server Error".to_string(),
        };

        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(body)
    }
}
