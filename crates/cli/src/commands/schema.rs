//! Model schema inspection

use anyhow::Result;
use expense_core::predictor::PredictorAdapter;
use serde::Serialize;
use tabled::Tabled;

use crate::client::{ApiClient, SchemaResponse};
use crate::output::{print_info, render_table, OutputFormat};

/// Row for the feature layout table
#[derive(Tabled, Serialize)]
struct FeatureColumn {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Feature")]
    name: String,
}

/// Show the layout of the locally loaded model
pub fn show_schema(adapter: &PredictorAdapter, format: OutputFormat) -> Result<()> {
    let model = adapter.model();
    let schema = SchemaResponse {
        schema: model.schema().name().to_string(),
        model_version: model.version().to_string(),
        model_kind: model.kind().to_string(),
        features: model.feature_names().to_vec(),
    };
    print_schema(&schema, format)
}

/// Show the layout of the model served by expense-server
pub async fn show_remote_schema(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let schema = client.schema().await?;
    print_schema(&schema, format)
}

fn print_schema(schema: &SchemaResponse, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(schema)?),
        OutputFormat::Table => {
            print_info(&format!(
                "{} schema, {} model {}",
                schema.schema, schema.model_kind, schema.model_version
            ));
            println!("{}", render_table(&feature_columns(schema), format));
        }
    }
    Ok(())
}

fn feature_columns(schema: &SchemaResponse) -> Vec<FeatureColumn> {
    schema
        .features
        .iter()
        .enumerate()
        .map(|(i, name)| FeatureColumn {
            position: i + 1,
            name: name.clone(),
        })
        .collect()
}
