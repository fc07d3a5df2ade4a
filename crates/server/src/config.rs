//! Server configuration

use anyhow::{Context, Result};
use expense_core::predictor::{DEFAULT_CURRENCY, DEFAULT_MODEL_PATH};
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration, read from `EXPENSE_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Port for the predict/health/metrics API
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the model artifact manifest
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Currency symbol shown in formatted amounts
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_port() -> u16 {
    8080
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_PATH)
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            model_path: default_model_path(),
            currency: default_currency(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix("EXPENSE"))
    }

    fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid EXPENSE_* configuration")
    }
}
