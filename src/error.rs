//! Error types for Focus Flux

use thiserror::Error;

/// Errors that can occur during feature extraction
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Failed to parse {field} timestamp {value:?}: {reason}")]
    ParseError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid feature configuration: {0}")]
    InvalidConfig(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl ComputeError {
    /// Short machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            ComputeError::ParseError { .. } => "PARSE_ERROR",
            ComputeError::JsonError(_) => "JSON_ERROR",
            ComputeError::MissingField(_) => "MISSING_FIELD",
            ComputeError::InvalidConfig(_) => "INVALID_CONFIG",
            ComputeError::EncodingError(_) => "ENCODING_ERROR",
        }
    }
}
