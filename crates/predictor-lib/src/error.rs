//! Error types for the prediction library

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a model or serving a prediction
#[derive(Debug, Error)]
pub enum PredictError {
    /// The model artifact path does not exist or is not readable
    #[error("model artifact not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The artifact bytes could not be decoded into a valid model
    #[error("failed to decode model artifact: {reason}")]
    Deserialization { reason: String },

    /// A query record's arity disagrees with the model's expected input width
    #[error("query has {actual} fields, model expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A query field is outside its declared range
    #[error("invalid query: {field} = {value} ({constraint})")]
    InvalidQuery {
        field: &'static str,
        value: i64,
        constraint: &'static str,
    },

    /// The underlying model failed during evaluation
    #[error("inference failed: {0}")]
    Inference(String),
}

impl PredictError {
    /// True for errors caused by the caller's input rather than the model
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PredictError::ShapeMismatch { .. } | PredictError::InvalidQuery { .. }
        )
    }
}
