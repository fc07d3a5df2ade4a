//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use expense_core::{Insight, PredictionOutcome};
use serde::Serialize;
use std::io::Write;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Row for the encoded features table
#[derive(Tabled, Serialize)]
struct FeatureLine {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Feature")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Render a table of items, or pretty JSON
pub fn render_table<T: Tabled + Serialize>(items: &[T], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                return "No items found".yellow().to_string();
            }
            Table::new(items).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(&items).unwrap_or_default(),
    }
}

/// Write a prediction result for a person reading the terminal
pub fn write_outcome<W: Write>(
    out: &mut W,
    outcome: &PredictionOutcome,
    format: OutputFormat,
) -> std::io::Result<()> {
    if let OutputFormat::Json = format {
        let json = serde_json::to_string_pretty(outcome).map_err(std::io::Error::other)?;
        return writeln!(out, "{}", json);
    }

    writeln!(out)?;
    writeln!(
        out,
        "Predicted Monthly Expenses: {}",
        outcome.prediction_display.green().bold()
    )?;

    match &outcome.insight {
        Some(insight @ Insight::Deficit { .. }) => {
            writeln!(out, "{} {}", "⚠".yellow().bold(), insight.message().yellow())?
        }
        Some(insight @ Insight::Surplus { .. }) => {
            writeln!(out, "{} {}", "✓".green().bold(), insight.message())?
        }
        None => {}
    }
    writeln!(out)?;

    let rows: Vec<FeatureLine> = outcome
        .encoded
        .iter()
        .enumerate()
        .map(|(i, (name, value))| FeatureLine {
            position: i + 1,
            name: name.to_string(),
            value: format_feature_value(value),
        })
        .collect();
    writeln!(out, "{}", render_table(&rows, format))?;

    writeln!(
        out,
        "{}",
        format!(
            "Model {} ({} schema), generated {}",
            outcome.model_version,
            outcome.schema,
            format_timestamp(outcome.generated_at)
        )
        .dimmed()
    )
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Encoded values are whole numbers; show them without a trailing `.0`
pub fn format_feature_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Format a unix timestamp for display
pub fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
