//! Volatility model trainer
//!
//! Reads a JSON array of candles from stdin, trains the volatility model,
//! saves it, and prints the training metrics as JSON on stdout.
//!
//! # Usage
//! ```sh
//! cat candles.json | cargo run --bin train_volatility -- --model-path ./saved-models/volatility-model.json
//! ```
//!
//! # Environment Variables
//! - `VOLATILITY_MODEL_PATH` - Metadata path; the model binary goes to `<path>.bin`
//! - `VOLATILITY_HORIZON` - Candles averaged into each target (default: 5)
//! - `VOLATILITY_MIN_SAMPLES` - Minimum valid samples to train (default: 300)
//! - `VOLATILITY_SEED` - Seed for row/column subsampling (default: 42)
//! - `RUST_LOG` - Log filter; logs go to stderr (default: warn)

use anyhow::Result;
use clap::Parser;
use rustvol::config::ForecastEnvConfig;
use rustvol::infrastructure::model_store::ModelStore;
use rustvol::interfaces::json_bridge::{TrainingReport, error_payload, read_stdin, run_training};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the model metadata file (binary is written next to it with a .bin suffix)
    #[arg(long)]
    model_path: Option<PathBuf>,
}

fn run(args: Args) -> Result<TrainingReport> {
    let config = ForecastEnvConfig::from_env()?;
    let store = ModelStore::new(args.model_path.unwrap_or_else(|| config.model_path.clone()));

    let raw = read_stdin()?;
    run_training(&raw, config.training_config(), &store)
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // stdout carries the JSON answer, so logs go to stderr
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let args = Args::parse();

    match run(args) {
        Ok(report) => match serde_json::to_string(&report) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                let err = anyhow::Error::from(e).context("Failed to serialize training report");
                println!("{}", error_payload(&err));
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            error!("Training failed: {:#}", err);
            println!("{}", error_payload(&err));
            ExitCode::FAILURE
        }
    }
}
