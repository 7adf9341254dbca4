//! Core library for store-item demand prediction
//!
//! This crate provides:
//! - Model artifact loading and validation
//! - Nearest-neighbors regression inference
//! - The prediction invoker contract (arity and range validation)
//! - Query acquisition sources
//! - Health checks and observability

pub mod error;
pub mod health;
pub mod invoker;
pub mod knn;
pub mod loader;
pub mod observability;
pub mod query;
pub mod records;

pub use error::PredictError;
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use invoker::{InferenceStats, PredictionInvoker, Predictor};
pub use knn::{KnnRegressor, Weighting};
pub use loader::{LoadedModel, LoaderConfig, ModelArtifact, DEFAULT_WRAP_DEPTH};
pub use observability::{PredictorMetrics, StructuredLogger};
pub use query::{FixedQuery, PromptSource, QuerySource, DEFAULT_QUERY};
pub use records::{Prediction, QueryRecord, NUM_FEATURES};
