//! Expense prediction engine

mod adapter;
mod features;
mod inference;
mod output;
mod session;

#[cfg(test)]
mod tests;

pub use adapter::PredictorAdapter;
pub use features::{
    select_schema, FeatureRecord, FeatureSchema, HousingSchema, IncomeSchema, HOUSING_SCHEMA,
    INCOME_SCHEMA, KNOWN_SCHEMAS, PART_TIME_INCOME,
};
pub use inference::{
    compute_checksum, LinearRegressor, LoadedModel, ModelHandle, ModelManifest,
    ModelSpec, OnnxRegressor, DEFAULT_MODEL_PATH,
};
pub use output::{format_grouped, OutputConfig, OutputFormatter, DEFAULT_CURRENCY};
pub use session::{PredictionSession, SessionState};

use crate::models::FeatureRow;
use anyhow::Result;

/// Trait for regression model implementations
pub trait Regressor: Send + Sync {
    /// Predict from a single row ordered as the model declares its features.
    ///
    /// Returns the model's raw output sequence; a scalar regressor yields
    /// exactly one value.
    fn predict(&self, row: &FeatureRow) -> Result<Vec<f64>>;

    /// Short implementation name for logs and metrics
    fn kind(&self) -> &'static str;
}
