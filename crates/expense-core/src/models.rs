//! Core data models for the expense predictor

use crate::collector::LivingArrangement;
use serde::{Deserialize, Serialize};

/// Survey answers exactly as the presentation layer collected them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAnswers {
    /// Monthly allowance from parents/guardians
    pub allowance: i64,
    /// Monthly part-time income
    #[serde(default)]
    pub part_time_income: i64,
    pub living: String,
    pub shop_frequency: String,
    pub eat_out: String,
    pub laptop: String,
    pub track_expenses: String,
    /// Financial discipline on a 1-5 scale
    pub discipline: i64,
}

impl Default for RawAnswers {
    /// Starting values of the survey form
    fn default() -> Self {
        Self {
            allowance: 300,
            part_time_income: 0,
            living: "With Family".to_string(),
            shop_frequency: "Rarely".to_string(),
            eat_out: "Rarely".to_string(),
            laptop: "No".to_string(),
            track_expenses: "No".to_string(),
            discipline: 3,
        }
    }
}

/// Survey answers after normalization into model encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedAnswers {
    pub allowance: u64,
    pub part_time_income: u64,
    pub living: LivingArrangement,
    pub shop_non_essential: u8,
    pub eat_out: u8,
    pub laptop: u8,
    pub track_expenses: u8,
    pub conscious: u8,
}

impl EncodedAnswers {
    pub fn total_income(&self) -> u64 {
        self.allowance.saturating_add(self.part_time_income)
    }
}

/// A single-row feature record ordered as the model declares it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub names: Vec<String>,
    pub values: Vec<f64>,
}

impl FeatureRow {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.values.get(i).copied())
    }

    /// Pairs of (name, value) in model order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Affordability comparison against the student's stated income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    Deficit { shortfall: i64, total_income: u64, message: String },
    Surplus { surplus: i64, total_income: u64, message: String },
}

impl Insight {
    pub fn message(&self) -> &str {
        match self {
            Insight::Deficit { message, .. } | Insight::Surplus { message, .. } => message,
        }
    }

    pub fn is_deficit(&self) -> bool {
        matches!(self, Insight::Deficit { .. })
    }
}

/// Display payload produced for one submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub prediction: f64,
    pub prediction_display: String,
    pub insight: Option<Insight>,
    pub schema: String,
    pub model_version: String,
    pub encoded: FeatureRow,
    pub generated_at: i64,
}
