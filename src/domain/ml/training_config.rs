use super::labels::DEFAULT_HORIZON;
use serde::{Deserialize, Serialize};

/// Minimum number of valid samples before a model may be trained.
pub const DEFAULT_MIN_SAMPLES: usize = 300;

/// Leading candles skipped so every feature window is warmed up.
pub const WARMUP_PERIODS: usize = 20;

/// Share of samples (by position) used for fitting; the rest is held out.
pub const TRAIN_RATIO: f64 = 0.8;

/// Gradient boosting settings. The defaults are the fixed production
/// configuration and are not tuned per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostingParams {
    pub n_rounds: usize,
    pub max_depth: u16,
    pub learning_rate: f64,
    /// Fraction of training rows drawn (without replacement) per round.
    pub row_subsample: f64,
    /// Fraction of feature columns drawn (without replacement) per round.
    pub column_subsample: f64,
    pub seed: u64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_rounds: 200,
            max_depth: 6,
            learning_rate: 0.1,
            row_subsample: 0.8,
            column_subsample: 0.8,
            seed: 42,
        }
    }
}

/// Everything a training run needs besides the candles.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub horizon: usize,
    pub warmup: usize,
    pub min_samples: usize,
    pub train_ratio: f64,
    pub boosting: BoostingParams,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            warmup: WARMUP_PERIODS,
            min_samples: DEFAULT_MIN_SAMPLES,
            train_ratio: TRAIN_RATIO,
            boosting: BoostingParams::default(),
        }
    }
}
