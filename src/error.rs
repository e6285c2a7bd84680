//! Error types for the stress predictor

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, StressError>;

/// Main error type for training and inference
#[derive(Error, Debug)]
pub enum StressError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Unknown category '{value}' for feature {feature}")]
    UnknownCategory { feature: String, value: String },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<polars::error::PolarsError> for StressError {
    fn from(err: polars::error::PolarsError) -> Self {
        StressError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for StressError {
    fn from(err: serde_json::Error) -> Self {
        StressError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for StressError {
    fn from(err: ndarray::ShapeError) -> Self {
        StressError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
