//! Prediction invoker
//!
//! Stateless request/response boundary in front of the model handle: validates
//! a query's shape and ranges, runs inference, and stamps the result with the
//! model's provenance.

use crate::error::PredictError;
use crate::loader::LoadedModel;
use crate::records::{Prediction, QueryRecord};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

/// Maximum inference latency before warning
const MAX_INFERENCE_MS: u128 = 5;

/// Trait for prediction implementations
pub trait Predictor: Send + Sync {
    /// Generate a prediction for one query record
    fn predict(&self, record: &QueryRecord) -> Result<Prediction, PredictError>;

    /// Version string of the model behind this predictor
    fn model_version(&self) -> &str;
}

/// Predictor backed by a loaded model handle
///
/// The handle is immutable after load, so the invoker needs no locking and
/// can be shared between concurrent callers behind an `Arc`.
pub struct PredictionInvoker {
    model: LoadedModel,
    inference_count: AtomicU64,
    slow_inference_count: AtomicU64,
}

impl PredictionInvoker {
    pub fn new(model: LoadedModel) -> Self {
        Self {
            model,
            inference_count: AtomicU64::new(0),
            slow_inference_count: AtomicU64::new(0),
        }
    }

    /// Predict from an ordered field sequence, checking arity first
    pub fn predict_raw(&self, fields: &[i64]) -> Result<Prediction, PredictError> {
        let record = QueryRecord::from_slice(fields)?;
        Predictor::predict(self, &record)
    }

    /// Checksum of the artifact behind this predictor
    pub fn model_checksum(&self) -> &str {
        &self.model.checksum
    }

    /// The loaded handle, for callers needing model metadata
    pub fn model(&self) -> &LoadedModel {
        &self.model
    }

    /// Get inference statistics
    pub fn stats(&self) -> InferenceStats {
        InferenceStats {
            total_inferences: self.inference_count.load(Ordering::Relaxed),
            slow_inferences: self.slow_inference_count.load(Ordering::Relaxed),
        }
    }
}

impl Predictor for PredictionInvoker {
    fn predict(&self, record: &QueryRecord) -> Result<Prediction, PredictError> {
        record.validate()?;

        let features = record.to_features();
        let expected = self.model.model.n_features();
        if features.len() != expected {
            return Err(PredictError::ShapeMismatch {
                expected,
                actual: features.len(),
            });
        }

        let start = Instant::now();
        let value = self.model.model.predict(&features)?;
        let elapsed = start.elapsed();

        self.inference_count.fetch_add(1, Ordering::Relaxed);
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            self.slow_inference_count.fetch_add(1, Ordering::Relaxed);
            warn!(
                elapsed_ms = elapsed.as_millis(),
                "Inference exceeded {}ms target", MAX_INFERENCE_MS
            );
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }

        Ok(Prediction {
            value,
            model_version: self.model.version.clone(),
            generated_at: chrono::Utc::now().timestamp(),
        })
    }

    fn model_version(&self) -> &str {
        &self.model.version
    }
}

/// Inference statistics
#[derive(Debug, Clone)]
pub struct InferenceStats {
    pub total_inferences: u64,
    pub slow_inferences: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knn::{KnnRegressor, Weighting};
    use crate::loader::compute_checksum;

    fn loaded_model() -> LoadedModel {
        let model = KnnRegressor {
            reference_points: vec![
                vec![2013.0, 1.0, 1.0, 25.0, 103665.0],
                vec![2013.0, 1.0, 2.0, 25.0, 103665.0],
                vec![2013.0, 2.0, 1.0, 25.0, 103665.0],
            ],
            targets: vec![10.0, 12.0, 20.0],
            k: 2,
            weighting: Weighting::Uniform,
        };
        LoadedModel {
            model,
            version: "v1.0.0".to_string(),
            created_at: 1_700_000_000,
            checksum: compute_checksum(b"fixture"),
            size_bytes: 0,
        }
    }

    #[test]
    fn test_predict_returns_stamped_result() {
        let invoker = PredictionInvoker::new(loaded_model());
        let record = QueryRecord::new(2013, 1, 1, 25, 103665);

        let prediction = Predictor::predict(&invoker, &record).unwrap();
        assert!(prediction.value.is_finite());
        assert_eq!(prediction.model_version, "v1.0.0");
    }

    #[test]
    fn test_predict_deterministic_for_same_record() {
        let invoker = PredictionInvoker::new(loaded_model());
        let record = QueryRecord::new(2013, 1, 1, 25, 103665);

        let first = Predictor::predict(&invoker, &record).unwrap().value;
        for _ in 0..5 {
            assert_eq!(Predictor::predict(&invoker, &record).unwrap().value, first);
        }
    }

    #[test]
    fn test_predict_raw_wrong_arity() {
        let invoker = PredictionInvoker::new(loaded_model());
        let err = invoker.predict_raw(&[2013, 1, 1, 25]).unwrap_err();
        assert!(matches!(
            err,
            PredictError::ShapeMismatch {
                expected: 5,
                actual: 4
            }
        ));
    }

    #[test]
    fn test_predict_rejects_out_of_range_record() {
        let invoker = PredictionInvoker::new(loaded_model());
        let record = QueryRecord::new(2013, 0, 1, 25, 103665);
        let err = Predictor::predict(&invoker, &record).unwrap_err();
        assert!(matches!(err, PredictError::InvalidQuery { field: "month", .. }));
    }

    #[test]
    fn test_stats_count_inferences() {
        let invoker = PredictionInvoker::new(loaded_model());
        let record = QueryRecord::new(2013, 1, 1, 25, 103665);

        for _ in 0..3 {
            Predictor::predict(&invoker, &record).unwrap();
        }
        assert_eq!(invoker.stats().total_inferences, 3);
    }

    #[test]
    fn test_arity_checked_before_model_call() {
        // Model trained on 4 features cannot serve 5-field records
        let mut loaded = loaded_model();
        loaded.model.reference_points = vec![vec![1.0, 2.0, 3.0, 4.0]];
        loaded.model.targets = vec![1.0];
        loaded.model.k = 1;

        let invoker = PredictionInvoker::new(loaded);
        let record = QueryRecord::new(2013, 1, 1, 25, 103665);
        let err = Predictor::predict(&invoker, &record).unwrap_err();
        assert!(matches!(
            err,
            PredictError::ShapeMismatch {
                expected: 4,
                actual: 5
            }
        ));
    }
}
