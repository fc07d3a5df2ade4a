//! Prediction request handling
//!
//! Encodes answers, builds the record for the loaded model's schema, checks it
//! against the declared feature names, runs inference and formats the result.

use super::inference::ModelHandle;
use super::output::OutputFormatter;
use crate::collector::InputCollector;
use crate::error::{PredictorError, Result};
use crate::models::{EncodedAnswers, PredictionOutcome, RawAnswers};
use crate::observability::{ExpenseMetrics, StructuredLogger};
use std::time::Instant;

/// Turns survey answers into a formatted prediction using a shared model
#[derive(Clone)]
pub struct PredictorAdapter {
    model: ModelHandle,
    collector: InputCollector,
    formatter: OutputFormatter,
    metrics: ExpenseMetrics,
    logger: StructuredLogger,
}

impl PredictorAdapter {
    pub fn new(model: ModelHandle) -> Self {
        Self::with_formatter(model, OutputFormatter::new())
    }

    pub fn with_formatter(model: ModelHandle, formatter: OutputFormatter) -> Self {
        let metrics = ExpenseMetrics::new();
        metrics.set_model_info(model.version(), model.schema().name());
        Self {
            model,
            collector: InputCollector::new(),
            formatter,
            metrics,
            logger: StructuredLogger::new("core"),
        }
    }

    /// Tag emitted events with the front-end serving them
    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// Handle one submission of raw answers
    pub fn predict(&self, raw: &RawAnswers) -> Result<PredictionOutcome> {
        let start = Instant::now();
        let result = self
            .collector
            .encode(raw)
            .and_then(|answers| self.predict_encoded(&answers));

        match &result {
            Ok(outcome) => {
                self.metrics
                    .observe_prediction_latency(start.elapsed().as_secs_f64());
                self.metrics.inc_predictions_generated();
                self.logger.log_prediction(outcome);
            }
            Err(err) => {
                self.metrics.inc_prediction_errors(err.kind());
                self.logger.log_prediction_failure(err);
            }
        }
        result
    }

    /// Predict from answers that are already encoded
    pub fn predict_encoded(&self, answers: &EncodedAnswers) -> Result<PredictionOutcome> {
        let schema = self.model.schema();
        let record = schema.build_record(answers);
        let row = record.reindex(self.model.feature_names())?;

        let outputs = self.model.predict(&row)?;
        let prediction = *outputs
            .first()
            .ok_or_else(|| PredictorError::Inference("model returned no output".to_string()))?;
        if !prediction.is_finite() {
            return Err(PredictorError::Inference(format!(
                "model returned non-finite prediction {}",
                prediction
            )));
        }

        Ok(PredictionOutcome {
            prediction,
            prediction_display: self.formatter.format_prediction(prediction),
            insight: schema.insight(prediction, answers, &self.formatter),
            schema: schema.name().to_string(),
            model_version: self.model.version().to_string(),
            encoded: row,
            generated_at: chrono::Utc::now().timestamp(),
        })
    }
}
