//! K-nearest-neighbors regression
//!
//! The model handle is a fitted KNN regressor: stored reference points with
//! one target value each. Prediction scans for the k closest points by
//! squared Euclidean distance and aggregates their targets.

use crate::error::PredictError;
use serde::{Deserialize, Serialize};

/// How neighbor targets are aggregated into a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// Plain mean of the k neighbor targets
    Uniform,
    /// Neighbors weighted by inverse distance
    Distance,
}

/// A fitted nearest-neighbors regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnRegressor {
    /// Stored training samples, one row per reference point
    pub reference_points: Vec<Vec<f32>>,
    /// Target value for each reference point
    pub targets: Vec<f32>,
    /// Number of neighbors consulted per query
    pub k: usize,
    pub weighting: Weighting,
}

impl KnnRegressor {
    /// Number of features each query must carry
    pub fn n_features(&self) -> usize {
        self.reference_points.first().map_or(0, Vec::len)
    }

    /// Number of stored reference points
    pub fn n_samples(&self) -> usize {
        self.reference_points.len()
    }

    /// Check structural integrity of a freshly decoded model
    pub fn validate(&self) -> Result<(), PredictError> {
        if self.reference_points.is_empty() {
            return Err(PredictError::Deserialization {
                reason: "model has no reference points".to_string(),
            });
        }
        if self.reference_points.len() != self.targets.len() {
            return Err(PredictError::Deserialization {
                reason: format!(
                    "model has {} reference points but {} targets",
                    self.reference_points.len(),
                    self.targets.len()
                ),
            });
        }
        let n_features = self.reference_points[0].len();
        if n_features == 0 {
            return Err(PredictError::Deserialization {
                reason: "model reference points have no features".to_string(),
            });
        }
        for (i, point) in self.reference_points.iter().enumerate() {
            if point.len() != n_features {
                return Err(PredictError::Deserialization {
                    reason: format!(
                        "reference point {i} has {} features, expected {n_features}",
                        point.len()
                    ),
                });
            }
            if point.iter().any(|v| !v.is_finite()) {
                return Err(PredictError::Deserialization {
                    reason: format!("reference point {i} contains a non-finite value"),
                });
            }
        }
        if self.targets.iter().any(|v| !v.is_finite()) {
            return Err(PredictError::Deserialization {
                reason: "model targets contain a non-finite value".to_string(),
            });
        }
        if self.k == 0 || self.k > self.reference_points.len() {
            return Err(PredictError::Deserialization {
                reason: format!(
                    "k = {} is invalid for {} reference points",
                    self.k,
                    self.reference_points.len()
                ),
            });
        }
        Ok(())
    }

    /// Predict the target value for one feature vector
    pub fn predict(&self, features: &[f32]) -> Result<f32, PredictError> {
        let n_features = self.n_features();
        if features.len() != n_features {
            return Err(PredictError::ShapeMismatch {
                expected: n_features,
                actual: features.len(),
            });
        }

        let mut distances: Vec<(usize, f32)> = Vec::with_capacity(self.reference_points.len());
        for (idx, point) in self.reference_points.iter().enumerate() {
            let dist: f32 = point
                .iter()
                .zip(features.iter())
                .map(|(p, x)| (p - x).powi(2))
                .sum();
            if !dist.is_finite() {
                return Err(PredictError::Inference(format!(
                    "non-finite distance to reference point {idx}"
                )));
            }
            distances.push((idx, dist));
        }

        // Tie-break on index so repeated queries see the same neighbor set
        distances.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        let neighbors = &distances[..self.k];

        let value = match self.weighting {
            Weighting::Uniform => {
                let sum: f32 = neighbors.iter().map(|(idx, _)| self.targets[*idx]).sum();
                sum / self.k as f32
            }
            Weighting::Distance => {
                // An exact hit dominates: average only zero-distance neighbors
                let exact: Vec<usize> = neighbors
                    .iter()
                    .filter(|(_, d)| *d == 0.0)
                    .map(|(idx, _)| *idx)
                    .collect();
                if !exact.is_empty() {
                    exact.iter().map(|idx| self.targets[*idx]).sum::<f32>() / exact.len() as f32
                } else {
                    let mut weighted_sum = 0.0f32;
                    let mut weight_total = 0.0f32;
                    for (idx, dist) in neighbors {
                        let w = 1.0 / dist.sqrt();
                        weighted_sum += w * self.targets[*idx];
                        weight_total += w;
                    }
                    weighted_sum / weight_total
                }
            }
        };

        if !value.is_finite() {
            return Err(PredictError::Inference(
                "prediction is non-finite".to_string(),
            ));
        }
        Ok(value)
    }
}
