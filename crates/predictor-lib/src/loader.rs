//! Model artifact loading
//!
//! Resolves a filesystem path to an in-memory, ready-to-query model handle.
//! Artifacts are JSON envelopes carrying the fitted regressor plus provenance
//! metadata. The training pipeline currently emits artifacts wrapped one extra
//! layer deep (a JSON string whose content is the envelope JSON); the unwrap
//! depth is configurable rather than assumed.

use crate::error::PredictError;
use crate::knn::KnnRegressor;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Default number of wrap layers removed before decoding the envelope
pub const DEFAULT_WRAP_DEPTH: usize = 1;

/// Loader configuration
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of outer JSON-string layers around the envelope
    pub wrap_depth: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            wrap_depth: DEFAULT_WRAP_DEPTH,
        }
    }
}

/// On-disk artifact envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: String,
    pub created_at: i64,
    pub model: KnnRegressor,
}

impl ModelArtifact {
    /// Encode the envelope, applying `wrap_depth` outer string layers
    ///
    /// Counterpart of [`load`]; used by the training-pipeline export and by
    /// test fixtures.
    pub fn to_bytes(&self, wrap_depth: usize) -> Result<Vec<u8>, PredictError> {
        let mut bytes = serde_json::to_vec(self).map_err(|e| PredictError::Deserialization {
            reason: format!("failed to encode artifact: {e}"),
        })?;
        for _ in 0..wrap_depth {
            let wrapped = String::from_utf8(bytes).map_err(|e| PredictError::Deserialization {
                reason: format!("artifact layer is not valid UTF-8: {e}"),
            })?;
            bytes =
                serde_json::to_vec(&wrapped).map_err(|e| PredictError::Deserialization {
                    reason: format!("failed to encode artifact wrapper: {e}"),
                })?;
        }
        Ok(bytes)
    }
}

/// A loaded, validated model handle with its provenance
///
/// Immutable after load; share between callers with `Arc`.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub model: KnnRegressor,
    pub version: String,
    pub created_at: i64,
    /// SHA256 of the raw artifact bytes
    pub checksum: String,
    pub size_bytes: usize,
}

/// Load a model artifact from disk
pub fn load(path: &Path, config: &LoaderConfig) -> Result<LoadedModel, PredictError> {
    if !path.exists() {
        return Err(PredictError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PredictError::NotFound {
            path: path.to_path_buf(),
        },
        _ => PredictError::Deserialization {
            reason: format!("failed to read {}: {e}", path.display()),
        },
    })?;

    let checksum = compute_checksum(&bytes);
    let artifact = decode_artifact(&bytes, config.wrap_depth)?;
    artifact.model.validate()?;

    info!(
        path = %path.display(),
        version = %artifact.version,
        checksum = %checksum,
        size_bytes = bytes.len(),
        samples = artifact.model.n_samples(),
        features = artifact.model.n_features(),
        "Model loaded"
    );

    Ok(LoadedModel {
        model: artifact.model,
        version: artifact.version,
        created_at: artifact.created_at,
        checksum,
        size_bytes: bytes.len(),
    })
}

/// Decode the envelope after stripping `wrap_depth` outer string layers
fn decode_artifact(bytes: &[u8], wrap_depth: usize) -> Result<ModelArtifact, PredictError> {
    let mut current: Cow<'_, [u8]> = Cow::Borrowed(bytes);
    for layer in 0..wrap_depth {
        let inner: String =
            serde_json::from_slice(&current).map_err(|e| PredictError::Deserialization {
                reason: format!("failed to unwrap artifact layer {layer}: {e}"),
            })?;
        current = Cow::Owned(inner.into_bytes());
    }
    serde_json::from_slice(&current).map_err(|e| PredictError::Deserialization {
        reason: format!("failed to decode artifact envelope: {e}"),
    })
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
