//! JSON transport for the stdin/stdout process bridge.
//!
//! Each invocation reads one JSON document, runs a single train or predict
//! pass, and answers with one JSON object: the result on success or
//! `{"error": "<message>"}` on failure.

use crate::application::ml::gradient_boosting::GradientBoostedTrees;
use crate::application::ml::volatility_predictor::VolatilityModel;
use crate::domain::market::candle::Candle;
use crate::domain::ml::prediction::{PredictionInput, PredictionResult};
use crate::domain::ml::training_config::TrainingConfig;
use crate::domain::ml::training_metrics::TrainingMetrics;
use crate::infrastructure::model_store::ModelStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io::Read;

/// Training metrics plus where the model was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingReport {
    #[serde(flatten)]
    pub metrics: TrainingMetrics,
    pub model_path: String,
}

pub fn read_stdin() -> Result<String> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("Failed to read standard input")?;
    Ok(raw)
}

pub fn parse_training_candles(raw: &str) -> Result<Vec<Candle>> {
    if raw.trim().is_empty() {
        anyhow::bail!("Empty input: expected a JSON array of candles");
    }
    serde_json::from_str(raw).context("Failed to parse candle array")
}

pub fn parse_prediction_input(raw: &str) -> Result<PredictionInput> {
    if raw.trim().is_empty() {
        anyhow::bail!("Empty input: expected a candle object or array");
    }
    serde_json::from_str(raw).context("Failed to parse prediction input")
}

/// Trains on the candles in `raw` and persists the model through `store`.
pub fn run_training(raw: &str, config: TrainingConfig, store: &ModelStore) -> Result<TrainingReport> {
    let candles = parse_training_candles(raw)?;
    let model = VolatilityModel::<GradientBoostedTrees>::train(&candles, config)?;
    store.save(&model).context("Failed to save model")?;

    let metrics = model
        .training_metrics()
        .cloned()
        .context("Trained model has no metrics")?;

    Ok(TrainingReport {
        metrics,
        model_path: store.metadata_path().display().to_string(),
    })
}

/// Loads the model behind `store` and forecasts for the input in `raw`.
pub fn run_prediction(raw: &str, store: &ModelStore) -> Result<PredictionResult> {
    let input = parse_prediction_input(raw)?;
    let model = store.load::<GradientBoostedTrees>()?;
    Ok(model.predict(&input)?)
}

pub fn error_payload(err: &anyhow::Error) -> Value {
    json!({ "error": format!("{:#}", err) })
}
