//! Demand prediction daemon
//!
//! Loads the model artifact once at startup and serves predictions over HTTP
//! until shut down.

use anyhow::{Context, Result};
use predictor_lib::{
    health::{components, HealthRegistry},
    loader::{self, LoaderConfig},
    observability::{PredictorMetrics, StructuredLogger},
    PredictionInvoker,
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting predictord");

    // Load configuration
    let config = config::ServiceConfig::load()?;
    info!(model_path = %config.model_path, "Service configured");

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::LOADER).await;
    health_registry.register(components::PREDICTOR).await;

    // Load the model; a missing or corrupt artifact is fatal at startup
    let loader_config = LoaderConfig {
        wrap_depth: config.wrap_depth,
    };
    let loaded = loader::load(Path::new(&config.model_path), &loader_config)
        .with_context(|| format!("failed to load model from {}", config.model_path))?;

    // Initialize metrics
    let metrics = PredictorMetrics::new();
    metrics.set_model_info(&loaded.version, &loaded.checksum);

    // Initialize structured logger
    let logger = StructuredLogger::new("predictord");
    logger.log_startup(SERVICE_VERSION, &loaded.version);

    let invoker = Arc::new(PredictionInvoker::new(loaded));

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(
        invoker,
        health_registry.clone(),
        metrics.clone(),
        logger.clone(),
    ));

    // Mark service as ready after the model is loaded
    health_registry.set_ready(true).await;

    // Start the API server
    let _api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    Ok(())
}
