//! HTTP API for predictions, health checks and Prometheus metrics
//!
//! The predict endpoint is a thin boundary over the prediction invoker: the
//! request schema maps field-for-field onto a query record and the response
//! wraps the prediction result. No prediction logic lives here.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use predictor_lib::{
    health::{ComponentStatus, HealthRegistry},
    observability::{PredictorMetrics, StructuredLogger},
    PredictError, PredictionInvoker, Predictor, QueryRecord,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub invoker: Arc<PredictionInvoker>,
    pub health_registry: HealthRegistry,
    pub metrics: PredictorMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        invoker: Arc<PredictionInvoker>,
        health_registry: HealthRegistry,
        metrics: PredictorMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            invoker,
            health_registry,
            metrics,
            logger,
        }
    }
}

/// Predict request body, mapping directly onto a query record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub store_id: i64,
    pub item_id: i64,
}

/// Predict response wrapping the prediction result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: f32,
    pub model_version: String,
    pub generated_at: i64,
}

/// JSON error body for failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wrapper mapping prediction errors onto HTTP statuses
struct ApiError(PredictError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Serve one prediction request
async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let record = QueryRecord::new(
        request.year,
        request.month,
        request.day,
        request.store_id,
        request.item_id,
    );

    let start = Instant::now();
    let result = state.invoker.predict(&record);
    state
        .metrics
        .observe_prediction_latency(start.elapsed().as_secs_f64());

    match result {
        Ok(prediction) => {
            state.metrics.inc_predictions_generated();
            state.logger.log_prediction(
                record.year,
                record.month,
                record.day,
                record.store_id,
                record.item_id,
                prediction.value,
                &prediction.model_version,
            );
            Ok(Json(PredictResponse {
                prediction: prediction.value,
                model_version: prediction.model_version,
                generated_at: prediction.generated_at,
            }))
        }
        Err(e) => {
            state.metrics.inc_prediction_errors();
            state.logger.log_prediction_error(&e.to_string());
            Err(ApiError(e))
        }
    }
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still operational
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
