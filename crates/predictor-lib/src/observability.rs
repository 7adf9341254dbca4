//! Observability infrastructure for the prediction service
//!
//! Provides:
//! - Prometheus metrics (prediction latency, prediction counts, model info)
//! - Structured JSON logging with tracing

use prometheus::{register_gauge_vec, register_histogram, register_int_gauge, GaugeVec, Histogram, IntGauge};
use std::sync::OnceLock;
use tracing::{error, info};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PredictorMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct PredictorMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_generated: IntGauge,
    prediction_errors: IntGauge,
    model_info: GaugeVec,
}

impl PredictorMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "demand_predictor_prediction_latency_seconds",
                "Time spent serving one prediction",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_generated: register_int_gauge!(
                "demand_predictor_predictions_generated_total",
                "Total number of predictions generated"
            )
            .expect("Failed to register predictions_generated"),

            prediction_errors: register_int_gauge!(
                "demand_predictor_prediction_errors_total",
                "Total number of failed prediction requests"
            )
            .expect("Failed to register prediction_errors"),

            model_info: register_gauge_vec!(
                "demand_predictor_model_info",
                "Information about the currently loaded model",
                &["version", "checksum"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Predictor metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the same
/// underlying metrics.
#[derive(Clone)]
pub struct PredictorMetrics {
    _private: (),
}

impl Default for PredictorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictorMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PredictorMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record a prediction latency observation
    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    /// Increment predictions generated counter
    pub fn inc_predictions_generated(&self) {
        self.inner().predictions_generated.inc();
    }

    /// Increment prediction errors counter
    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors.inc();
    }

    /// Record the loaded model's version and checksum
    pub fn set_model_info(&self, version: &str, checksum: &str) {
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[version, checksum])
            .set(1.0);
    }
}

/// Structured logger for service events
#[derive(Clone)]
pub struct StructuredLogger {
    service_name: String,
}

impl StructuredLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, model_version: &str) {
        info!(
            event = "service_started",
            service = %self.service_name,
            service_version = %version,
            model_version = %model_version,
            "Prediction service started"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service_name,
            reason = %reason,
            "Prediction service shutting down"
        );
    }

    /// Log a served prediction
    pub fn log_prediction(
        &self,
        year: i64,
        month: i64,
        day: i64,
        store_id: i64,
        item_id: i64,
        value: f32,
        model_version: &str,
    ) {
        info!(
            event = "prediction_generated",
            service = %self.service_name,
            year = year,
            month = month,
            day = day,
            store_id = store_id,
            item_id = item_id,
            value = f64::from(value),
            model_version = %model_version,
            "Generated demand prediction"
        );
    }

    /// Log a failed prediction request
    pub fn log_prediction_error(&self, reason: &str) {
        error!(
            event = "prediction_failed",
            service = %self.service_name,
            reason = %reason,
            "Prediction request failed"
        );
    }
}
