//! Service configuration

use anyhow::Result;
use serde::Deserialize;

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Path to the serialized model artifact
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Number of wrap layers around the artifact envelope
    #[serde(default = "default_wrap_depth")]
    pub wrap_depth: usize,

    /// API server port for predict/health/metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

fn default_model_path() -> String {
    "model_dump.json".to_string()
}

fn default_wrap_depth() -> usize {
    predictor_lib::DEFAULT_WRAP_DEPTH
}

fn default_api_port() -> u16 {
    8080
}

impl ServiceConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PREDICTOR"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServiceConfig {
            model_path: default_model_path(),
            wrap_depth: default_wrap_depth(),
            api_port: default_api_port(),
        }))
    }
}
