//! Model artifact loading and inference
//!
//! An artifact is a JSON manifest naming the model's ordered feature list and
//! either inline linear coefficients or an ONNX graph exported next to it.
//! ONNX graphs run through tract.

use super::features::{select_schema, FeatureSchema};
use super::Regressor;
use crate::error::{PredictorError, Result};
use crate::models::FeatureRow;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, info, warn};

/// Default artifact file name, looked up in the working directory
pub const DEFAULT_MODEL_PATH: &str = "student_spending_model.json";

/// Maximum inference latency before warning
const MAX_INFERENCE_MS: u128 = 5;

/// Length of the checksum prefix used as a fallback model version
const VERSION_CHECKSUM_CHARS: usize = 12;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// On-disk description of a trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelManifest {
    #[serde(default)]
    pub version: Option<String>,
    /// Feature names in the order the model consumes them
    pub features: Vec<String>,
    pub model: ModelSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    Onnx {
        /// Relative paths resolve against the manifest's directory
        path: PathBuf,
        #[serde(default)]
        sha256: Option<String>,
    },
}

/// Ordinary least squares style model: `intercept + Σ wᵢxᵢ`
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearRegressor {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, row: &FeatureRow) -> anyhow::Result<Vec<f64>> {
        if row.len() != self.coefficients.len() {
            anyhow::bail!(
                "row has {} values, model has {} coefficients",
                row.len(),
                self.coefficients.len()
            );
        }
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(&row.values)
            .map(|(w, x)| w * x)
            .sum();
        Ok(vec![self.intercept + dot])
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

/// ONNX regressor executed with tract
pub struct OnnxRegressor {
    model: TractModel,
    num_features: usize,
}

impl OnnxRegressor {
    /// Parse and optimize an ONNX graph taking a `[1, num_features]` input
    pub fn from_bytes(model_bytes: &[u8], num_features: usize) -> anyhow::Result<Self> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, num_features]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;
        Ok(Self {
            model,
            num_features,
        })
    }
}

impl Regressor for OnnxRegressor {
    fn predict(&self, row: &FeatureRow) -> anyhow::Result<Vec<f64>> {
        let data: Vec<f32> = row.values.iter().map(|v| *v as f32).collect();
        let input: Tensor =
            tract_ndarray::Array2::from_shape_vec((1, self.num_features), data)
                .context("Feature row does not fit the model input shape")?
                .into();

        let result = self.model.run(tvec!(input.into()))?;
        let output = result.first().context("No output from model")?;
        let output = output.cast_to::<f32>()?;
        let view = output.to_array_view::<f32>()?;
        Ok(view.iter().map(|v| *v as f64).collect())
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}

/// A loaded model together with its declared feature order.
///
/// Immutable once built; share it across requests behind an `Arc`.
pub struct LoadedModel {
    feature_names: Vec<String>,
    regressor: Box<dyn Regressor>,
    schema: &'static dyn FeatureSchema,
    version: String,
}

/// Shared read-only model handle
pub type ModelHandle = Arc<LoadedModel>;

impl LoadedModel {
    /// Wrap a regressor, selecting the schema its feature names describe
    pub fn new(
        feature_names: Vec<String>,
        regressor: Box<dyn Regressor>,
        version: impl Into<String>,
    ) -> Result<Self> {
        let schema = select_schema(&feature_names)?;
        Ok(Self {
            feature_names,
            regressor,
            schema,
            version: version.into(),
        })
    }

    /// Load a model artifact from disk.
    ///
    /// A missing manifest is reported as `MissingModel` so callers can tell
    /// the user to train first; anything else wrong with the artifact is a
    /// `ModelLoad` or `FeatureSchema` error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PredictorError::MissingModel {
                path: path.to_path_buf(),
            });
        }

        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))
            .map_err(load_error)?;
        let manifest: ModelManifest = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))
            .map_err(load_error)?;

        let version = manifest
            .version
            .clone()
            .unwrap_or_else(|| compute_checksum(&bytes)[..VERSION_CHECKSUM_CHARS].to_string());
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let regressor = build_regressor(&manifest, base_dir)?;
        let model = Self::new(manifest.features, regressor, version)?;

        info!(
            path = %path.display(),
            version = %model.version,
            schema = model.schema.name(),
            kind = model.regressor.kind(),
            features = model.feature_names.len(),
            "Model artifact loaded"
        );
        Ok(model)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn schema(&self) -> &'static dyn FeatureSchema {
        self.schema
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn kind(&self) -> &'static str {
        self.regressor.kind()
    }

    /// Run the model on one row and return the raw output sequence
    pub fn predict(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        let start = Instant::now();
        let outputs = self
            .regressor
            .predict(row)
            .map_err(|e| PredictorError::Inference(format!("{:#}", e)))?;

        let elapsed = start.elapsed();
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms target", MAX_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }
        Ok(outputs)
    }
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("feature_names", &self.feature_names)
            .field("schema", &self.schema.name())
            .field("kind", &self.regressor.kind())
            .field("version", &self.version)
            .finish()
    }
}

fn build_regressor(manifest: &ModelManifest, base_dir: &Path) -> Result<Box<dyn Regressor>> {
    match &manifest.model {
        ModelSpec::Linear {
            intercept,
            coefficients,
        } => {
            if coefficients.len() != manifest.features.len() {
                return Err(PredictorError::FeatureSchema(format!(
                    "{} coefficients for {} declared features",
                    coefficients.len(),
                    manifest.features.len()
                )));
            }
            Ok(Box::new(LinearRegressor::new(*intercept, coefficients.clone())))
        }
        ModelSpec::Onnx { path, sha256 } => {
            let onnx_path = base_dir.join(path);
            let bytes = std::fs::read(&onnx_path)
                .with_context(|| format!("Failed to read ONNX graph {}", onnx_path.display()))
                .map_err(load_error)?;

            if let Some(expected) = sha256 {
                let computed = compute_checksum(&bytes);
                if !computed.eq_ignore_ascii_case(expected) {
                    return Err(PredictorError::ModelLoad(format!(
                        "Checksum mismatch: expected {}, got {}",
                        expected, computed
                    )));
                }
                debug!(checksum = %computed, "ONNX checksum validated");
            }

            let regressor =
                OnnxRegressor::from_bytes(&bytes, manifest.features.len()).map_err(load_error)?;
            Ok(Box::new(regressor))
        }
    }
}

fn load_error(err: anyhow::Error) -> PredictorError {
    PredictorError::ModelLoad(format!("{:#}", err))
}

/// Compute SHA256 checksum of artifact bytes
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
