//! Expense Server - REST front-end for the student expense predictor
//!
//! Loads the trained model once at startup and serves predictions,
//! health checks and Prometheus metrics.

use anyhow::{Context, Result};
use expense_core::{
    observability::StructuredLogger,
    predictor::{LoadedModel, OutputConfig, OutputFormatter, PredictorAdapter},
    HealthRegistry,
};
use expense_server::{api, config::ServerConfig};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting expense-server");

    let config = ServerConfig::load()?;
    info!(model_path = %config.model_path.display(), port = config.port, "Server configured");

    let logger = StructuredLogger::new("server");

    // No route is served until the model is in memory
    let model = match LoadedModel::load(&config.model_path) {
        Ok(model) => Arc::new(model),
        Err(e) => {
            error!(error = %e, kind = e.kind(), "Model unavailable, refusing to start");
            return Err(e).context("Failed to load model artifact");
        }
    };
    logger.log_model_loaded(
        &config.model_path.display().to_string(),
        model.version(),
        model.schema().name(),
        model.kind(),
    );

    let formatter = OutputFormatter::with_config(OutputConfig {
        currency_symbol: config.currency.clone(),
    });
    let adapter = PredictorAdapter::with_formatter(model.clone(), formatter)
        .with_logger(logger.clone());

    let health_registry = HealthRegistry::new();
    api::init_health(&health_registry).await;

    logger.log_startup(SERVER_VERSION, model.version());

    let app_state = Arc::new(api::AppState::new(adapter, health_registry));

    tokio::select! {
        result = api::serve(config.port, app_state) => {
            result?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            logger.log_shutdown("SIGINT received");
            info!("Shutting down");
        }
    }

    Ok(())
}
