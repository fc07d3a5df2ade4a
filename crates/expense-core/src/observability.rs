//! Observability infrastructure for the expense predictor
//!
//! Provides:
//! - Prometheus metrics (prediction latency, prediction counts, model info)
//! - Structured logging with tracing

use crate::error::PredictorError;
use crate::models::PredictionOutcome;
use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    GaugeVec, Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ExpenseMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct ExpenseMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_generated: IntCounter,
    prediction_errors: IntCounterVec,
    model_info: GaugeVec,
}

impl ExpenseMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "expense_predictor_prediction_latency_seconds",
                "Time spent encoding answers and running inference",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_generated: register_int_counter!(
                "expense_predictor_predictions_total",
                "Total number of predictions generated"
            )
            .expect("Failed to register predictions_total"),

            prediction_errors: register_int_counter_vec!(
                "expense_predictor_prediction_errors_total",
                "Total number of failed predictions by error kind",
                &["kind"]
            )
            .expect("Failed to register prediction_errors_total"),

            model_info: register_gauge_vec!(
                "expense_predictor_model_info",
                "Information about the currently loaded model",
                &["version", "schema"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Predictor metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ExpenseMetrics {
    _private: (),
}

impl Default for ExpenseMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ExpenseMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ExpenseMetricsInner {
        GLOBAL_METRICS.get_or_init(ExpenseMetricsInner::new)
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions_generated(&self) {
        self.inner().predictions_generated.inc();
    }

    pub fn inc_prediction_errors(&self, kind: &str) {
        self.inner()
            .prediction_errors
            .with_label_values(&[kind])
            .inc();
    }

    /// Update model info, replacing any previously loaded model
    pub fn set_model_info(&self, version: &str, schema: &str) {
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[version, schema])
            .set(1.0);
    }
}

/// Structured logger for predictor events
///
/// Provides consistent event names and fields for model loading,
/// predictions and the lifecycle of each front-end.
#[derive(Clone)]
pub struct StructuredLogger {
    source: String,
}

impl StructuredLogger {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn log_model_loaded(&self, path: &str, version: &str, schema: &str, kind: &str) {
        info!(
            event = "model_loaded",
            source = %self.source,
            path = %path,
            model_version = %version,
            schema = %schema,
            model_kind = %kind,
            "Expense model loaded"
        );
    }

    pub fn log_prediction(&self, outcome: &PredictionOutcome) {
        info!(
            event = "prediction_generated",
            source = %self.source,
            prediction = outcome.prediction,
            schema = %outcome.schema,
            model_version = %outcome.model_version,
            deficit = outcome.insight.as_ref().map(|i| i.is_deficit()),
            "Generated expense prediction"
        );
    }

    pub fn log_prediction_failure(&self, error: &PredictorError) {
        warn!(
            event = "prediction_failed",
            source = %self.source,
            kind = error.kind(),
            error = %error,
            "Expense prediction failed"
        );
    }

    pub fn log_startup(&self, version: &str, model_version: &str) {
        info!(
            event = "server_started",
            source = %self.source,
            server_version = %version,
            model_version = %model_version,
            "Expense predictor started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "server_shutdown",
            source = %self.source,
            reason = %reason,
            "Expense predictor shutting down"
        );
    }
}
