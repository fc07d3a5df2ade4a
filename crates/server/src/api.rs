//! HTTP API for predictions, health checks and Prometheus metrics

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use expense_core::{
    health::{components, ComponentStatus, HealthRegistry},
    predictor::PredictorAdapter,
    PredictionOutcome, PredictorError, RawAnswers,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Consecutive inference failures before the predictor is reported unhealthy
pub const UNHEALTHY_AFTER_FAILURES: u32 = 5;

/// Shared application state
pub struct AppState {
    pub adapter: PredictorAdapter,
    pub health_registry: HealthRegistry,
    inference_failures: AtomicU32,
}

impl AppState {
    pub fn new(adapter: PredictorAdapter, health_registry: HealthRegistry) -> Self {
        Self {
            adapter,
            health_registry,
            inference_failures: AtomicU32::new(0),
        }
    }

    async fn record_success(&self) {
        if self.inference_failures.swap(0, Ordering::Relaxed) > 0 {
            info!("Predictor recovered");
        }
        self.health_registry.set_healthy(components::PREDICTOR).await;
    }

    /// One failure degrades the predictor; a run of them makes it unhealthy
    async fn record_inference_failure(&self, message: &str) {
        let streak = self.inference_failures.fetch_add(1, Ordering::Relaxed) + 1;
        if streak >= UNHEALTHY_AFTER_FAILURES {
            warn!(streak, error = message, "Predictor failing repeatedly");
            self.health_registry
                .set_unhealthy(
                    components::PREDICTOR,
                    format!("{} consecutive inference failures: {}", streak, message),
                )
                .await;
        } else {
            self.health_registry
                .set_degraded(components::PREDICTOR, message)
                .await;
        }
    }
}

/// Declared feature layout of the loaded model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub schema: String,
    pub model_version: String,
    pub model_kind: String,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

/// Maps request failures onto HTTP responses
pub enum ApiError {
    Predictor(PredictorError),
    /// Body was not JSON, or not shaped like survey answers
    Request(JsonRejection),
}

impl From<PredictorError> for ApiError {
    fn from(err: PredictorError) -> Self {
        Self::Predictor(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Request(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Predictor(err) => {
                let status = match &err {
                    PredictorError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    PredictorError::MissingModel { .. } => StatusCode::SERVICE_UNAVAILABLE,
                    PredictorError::ModelLoad(_)
                    | PredictorError::FeatureSchema(_)
                    | PredictorError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let body = ErrorBody {
                    error: err.to_string(),
                    kind: err.kind().to_string(),
                };
                (status, body)
            }
            ApiError::Request(rejection) => {
                let body = ErrorBody {
                    error: rejection.body_text(),
                    kind: "invalid_request".to_string(),
                };
                (rejection.status(), body)
            }
        };
        (status, Json(body)).into_response()
    }
}

async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawAnswers>, JsonRejection>,
) -> Result<Json<PredictionOutcome>, ApiError> {
    let Json(answers) = payload?;
    match state.adapter.predict(&answers) {
        Ok(outcome) => {
            state.record_success().await;
            Ok(Json(outcome))
        }
        Err(err) => {
            if let PredictorError::Inference(message) = &err {
                state.record_inference_failure(message).await;
            }
            Err(err.into())
        }
    }
}

async fn schema(State(state): State<Arc<AppState>>) -> Json<SchemaResponse> {
    let model = state.adapter.model();
    Json(SchemaResponse {
        schema: model.schema().name().to_string(),
        model_version: model.version().to_string(),
        model_kind: model.kind().to_string(),
        features: model.feature_names().to_vec(),
    })
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
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
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/predict", post(predict))
        .route("/api/v1/schema", get(schema))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Register components and mark the service ready for a loaded model
pub async fn init_health(registry: &HealthRegistry) {
    registry.register(components::PREDICTOR).await;
    registry.set_ready(true).await;
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
