//! Error types for the ProjectionGateway

use projection_engine::ProjectionError;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while starting or running the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid server address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("Config file parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config file encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),

    #[error("Server error: {0}")]
    Server(#[from] warp::Error),

    #[error("Metrics exporter error: {0}")]
    Metrics(String),
}

/// Result type for ProjectionGateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub timestamp: String,
}

/// Error detail
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            error: ErrorDetail { code: code.to_string(), message: message.into(), details },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Engine rejected the request inputs
#[derive(Debug)]
pub struct InvalidInputRejection(pub ProjectionError);

impl warp::reject::Reject for InvalidInputRejection {}
