//! Student Expense Predictor CLI
//!
//! A command-line front-end for predicting a student's monthly expenses
//! from a short survey, either against a local model artifact or a running
//! expense-server.

mod client;
mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use commands::{canonical_label, interactive, predict, schema};
use expense_core::collector::{EatOutFrequency, LivingArrangement, ShopFrequency, YesNo};
use expense_core::predictor::{
    LoadedModel, OutputConfig, OutputFormatter, PredictorAdapter, DEFAULT_CURRENCY,
    DEFAULT_MODEL_PATH,
};
use expense_core::{PredictorError, RawAnswers, StructuredLogger};
use std::path::PathBuf;
use std::sync::Arc;

/// Student Expense Predictor CLI
#[derive(Parser)]
#[command(name = "expense")]
#[command(author, version, about = "CLI for the Student Expense Predictor", long_about = None)]
pub struct Cli {
    /// Path to the model artifact (can also be set via EXPENSE_MODEL env var)
    #[arg(long, env = "EXPENSE_MODEL")]
    pub model: Option<PathBuf>,

    /// expense-server URL; when set, predictions are requested over HTTP
    #[arg(long, env = "EXPENSE_API_URL")]
    pub api_url: Option<String>,

    /// Currency symbol for locally formatted amounts
    #[arg(long)]
    pub currency: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict monthly expenses from survey answers
    Predict(SurveyArgs),

    /// Show the feature layout the model declares
    Schema,

    /// Answer the survey on the terminal, one submission after another
    Interactive,
}

/// Survey answers; defaults match the starting values of the form
#[derive(Args, Debug, Clone)]
pub struct SurveyArgs {
    /// Monthly allowance from parents/guardians
    #[arg(long, default_value_t = 300, allow_negative_numbers = true)]
    pub allowance: i64,

    /// Monthly part-time income
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub part_time_income: i64,

    /// Living arrangement: "With Family", "On-Campus Hostel" or "Off-Campus Rental"
    #[arg(long, default_value = "With Family")]
    pub living: String,

    /// Shopping frequency for non-essentials: Rarely, Occasionally or Frequently
    #[arg(long = "shop", default_value = "Rarely")]
    pub shop_frequency: String,

    /// Eating out frequency: Rarely, Sometimes or "Often (daily)"
    #[arg(long, default_value = "Rarely")]
    pub eat_out: String,

    /// Do you own a laptop? Yes or No
    #[arg(long, default_value = "No")]
    pub laptop: String,

    /// Do you track expenses? Yes or No
    #[arg(long = "track", default_value = "No")]
    pub track_expenses: String,

    /// Financial discipline (1-5)
    #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
    pub discipline: i64,
}

impl SurveyArgs {
    /// Resolve aliases to the labels the predictor accepts
    fn into_answers(self) -> Result<RawAnswers, PredictorError> {
        Ok(RawAnswers {
            allowance: self.allowance,
            part_time_income: self.part_time_income,
            living: canonical_label::<LivingArrangement>("living", &self.living)?,
            shop_frequency: canonical_label::<ShopFrequency>("shop_frequency", &self.shop_frequency)?,
            eat_out: canonical_label::<EatOutFrequency>("eat_out", &self.eat_out)?,
            laptop: canonical_label::<YesNo>("laptop", &self.laptop)?,
            track_expenses: canonical_label::<YesNo>("track_expenses", &self.track_expenses)?,
            discipline: self.discipline,
        })
    }
}

/// Flag values merged over the config file
struct Settings {
    model_path: PathBuf,
    api_url: Option<String>,
    currency: String,
}

impl Settings {
    fn resolve(cli: &Cli, file: config::Config) -> Self {
        Self {
            model_path: cli
                .model
                .clone()
                .or(file.model_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            api_url: cli.api_url.clone().or(file.api_url),
            currency: cli
                .currency
                .clone()
                .or(file.currency)
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        }
    }

    /// Load the model before any answer is accepted
    fn load_adapter(&self) -> Result<PredictorAdapter> {
        let model = LoadedModel::load(&self.model_path)?;
        let formatter = OutputFormatter::with_config(OutputConfig {
            currency_symbol: self.currency.clone(),
        });
        Ok(PredictorAdapter::with_formatter(Arc::new(model), formatter)
            .with_logger(StructuredLogger::new("cli")))
    }

    fn client(&self) -> Result<Option<client::ApiClient>> {
        self.api_url
            .as_deref()
            .map(client::ApiClient::new)
            .transpose()
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let file_config = config::Config::load().context("Failed to load CLI configuration")?;
    let settings = Settings::resolve(&cli, file_config);

    match cli.command {
        Commands::Predict(args) => {
            let answers = args.into_answers()?;
            match settings.client()? {
                Some(client) => predict::predict_remote(&client, &answers, cli.format).await?,
                None => {
                    let adapter = settings.load_adapter()?;
                    predict::predict_local(&adapter, &answers, cli.format)?;
                }
            }
        }
        Commands::Schema => match settings.client()? {
            Some(client) => schema::show_remote_schema(&client, cli.format).await?,
            None => {
                let adapter = settings.load_adapter()?;
                schema::show_schema(&adapter, cli.format)?;
            }
        },
        Commands::Interactive => {
            let adapter = settings.load_adapter()?;
            let stdin = std::io::stdin();
            interactive::run(&adapter, stdin.lock(), std::io::stdout())?;
        }
    }

    Ok(())
}
