//! Error taxonomy for the prediction pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the collector, the model loader and the adapter.
///
/// Every variant is fatal for the unit of work that produced it: the process
/// at startup for `MissingModel`/`ModelLoad`, the single request otherwise.
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("Model file not found at {}. Please train the model first!", path.display())]
    MissingModel { path: PathBuf },

    #[error("Failed to load model artifact: {0}")]
    ModelLoad(String),

    #[error("Feature schema mismatch: {0}")]
    FeatureSchema(String),

    #[error("Invalid value {value:?} for {field}")]
    InvalidInput { field: &'static str, value: String },

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl PredictorError {
    pub fn invalid_input(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            value: value.into(),
        }
    }

    /// Stable short name used for metric labels and API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingModel { .. } => "missing_model",
            Self::ModelLoad(_) => "model_load",
            Self::FeatureSchema(_) => "feature_schema",
            Self::InvalidInput { .. } => "invalid_input",
            Self::Inference(_) => "inference",
        }
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;
