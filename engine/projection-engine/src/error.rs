//! Error types for the projection engine

use thiserror::Error;

/// Result type for projection engine operations
pub type Result<T> = std::result::Result<T, ProjectionError>;

/// Errors that can occur while projecting receptions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ProjectionError {
    /// Build an `InvalidInput` error for a named field
    pub fn invalid_field(field: &str, value: f64, reason: &str) -> Self {
        ProjectionError::InvalidInput(format!("{} {} (got {})", field, reason, value))
    }
}
