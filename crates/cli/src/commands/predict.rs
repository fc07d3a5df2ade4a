//! One-shot prediction commands

use anyhow::Result;
use expense_core::predictor::PredictorAdapter;
use expense_core::RawAnswers;

use crate::client::ApiClient;
use crate::output::{write_outcome, OutputFormat};

/// Predict with the locally loaded model
pub fn predict_local(
    adapter: &PredictorAdapter,
    answers: &RawAnswers,
    format: OutputFormat,
) -> Result<()> {
    let outcome = adapter.predict(answers)?;
    write_outcome(&mut std::io::stdout().lock(), &outcome, format)?;
    Ok(())
}

/// Predict through a running expense-server
pub async fn predict_remote(
    client: &ApiClient,
    answers: &RawAnswers,
    format: OutputFormat,
) -> Result<()> {
    let outcome = client.predict(answers).await?;
    write_outcome(&mut std::io::stdout().lock(), &outcome, format)?;
    Ok(())
}
