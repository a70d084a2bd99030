//! Volatility forecaster
//!
//! Reads one candle object, or an array of candles whose last element is
//! forecast, from stdin and prints the prediction as JSON on stdout.
//! Any failure prints `{"error": ...}` and exits with status 1.
//!
//! # Usage
//! ```sh
//! echo '[{"close":1.1,"high":1.2,"low":1.0,"atr":0.01,"rsi":55,"adx":25}]' \
//!   | cargo run --bin predict_volatility
//! cargo run --bin predict_volatility -- --info
//! ```
//!
//! # Environment Variables
//! - `VOLATILITY_MODEL_PATH` - Metadata path of a trained model
//! - `RUST_LOG` - Log filter; logs go to stderr (default: warn)

use anyhow::Result;
use clap::Parser;
use rustvol::config::ForecastEnvConfig;
use rustvol::infrastructure::model_store::ModelStore;
use rustvol::interfaces::json_bridge::{error_payload, read_stdin, run_prediction};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the model metadata file (binary is read from the same path with a .bin suffix)
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Print the stored training metadata instead of predicting
    #[arg(long)]
    info: bool,
}

fn run(args: Args) -> Result<Value> {
    let config = ForecastEnvConfig::from_env()?;
    let store = ModelStore::new(args.model_path.unwrap_or(config.model_path));

    if args.info {
        return Ok(serde_json::to_value(store.read_metadata()?)?);
    }

    let raw = read_stdin()?;
    Ok(serde_json::to_value(run_prediction(&raw, &store)?)?)
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
        Ok(payload) => {
            println!("{}", payload);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Prediction failed: {:#}", err);
            println!("{}", error_payload(&err));
            ExitCode::FAILURE
        }
    }
}
