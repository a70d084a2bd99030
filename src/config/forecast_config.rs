//! Forecaster configuration parsing from environment variables.
//!
//! This module handles the model location and the dataset knobs that may
//! differ between deployments. Boosting settings are fixed.

use crate::domain::ml::labels::DEFAULT_HORIZON;
use crate::domain::ml::training_config::{BoostingParams, DEFAULT_MIN_SAMPLES, TrainingConfig};
use crate::infrastructure::model_store::DEFAULT_MODEL_PATH;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Forecaster environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEnvConfig {
    pub model_path: PathBuf,
    pub horizon: usize,
    pub min_samples: usize,
    pub seed: u64,
}

impl Default for ForecastEnvConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            horizon: DEFAULT_HORIZON,
            min_samples: DEFAULT_MIN_SAMPLES,
            seed: BoostingParams::default().seed,
        }
    }
}

impl ForecastEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let horizon = Self::parse_usize("VOLATILITY_HORIZON", defaults.horizon)?;
        if horizon == 0 {
            anyhow::bail!("VOLATILITY_HORIZON must be at least 1");
        }

        Ok(Self {
            model_path: env::var("VOLATILITY_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            horizon,
            min_samples: Self::parse_usize("VOLATILITY_MIN_SAMPLES", defaults.min_samples)?,
            seed: Self::parse_u64("VOLATILITY_SEED", defaults.seed)?,
        })
    }

    /// Dataset and boosting settings for a training run.
    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            horizon: self.horizon,
            min_samples: self.min_samples,
            boosting: BoostingParams {
                seed: self.seed,
                ..BoostingParams::default()
            },
            ..TrainingConfig::default()
        }
    }

    fn parse_usize(key: &str, default: usize) -> Result<usize> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<usize>()
            .context(format!("Failed to parse {}", key))
    }

    fn parse_u64(key: &str, default: u64) -> Result<u64> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<u64>()
            .context(format!("Failed to parse {}", key))
    }
}
