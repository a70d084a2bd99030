use super::feature_registry::{FeatureVector, extract_features};
use super::labels::future_volatility;
use super::training_config::TrainingConfig;
use crate::domain::errors::{SampleRejection, TrainError};
use crate::domain::market::candle::Candle;
use tracing::{debug, info};

/// A feature row paired with its forward volatility target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub index: usize,
    pub features: FeatureVector,
    pub target: f64,
}

/// Tally of why candidate indices were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RejectionStats {
    pub missing_core_field: usize,
    pub non_finite_feature: usize,
    pub out_of_range: usize,
    pub empty_future_window: usize,
    pub missing_future_atr: usize,
    pub non_positive_target: usize,
}

impl RejectionStats {
    pub fn record(&mut self, rejection: &SampleRejection) {
        match rejection {
            SampleRejection::MissingOrZeroCoreField { .. } => self.missing_core_field += 1,
            SampleRejection::NonFiniteFeature { .. } => self.non_finite_feature += 1,
            SampleRejection::IndexOutOfRange { .. } => self.out_of_range += 1,
            SampleRejection::EmptyFutureWindow { .. } => self.empty_future_window += 1,
            SampleRejection::MissingFutureAtr { .. } => self.missing_future_atr += 1,
            SampleRejection::NonPositiveTarget { .. } => self.non_positive_target += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.missing_core_field
            + self.non_finite_feature
            + self.out_of_range
            + self.empty_future_window
            + self.missing_future_atr
            + self.non_positive_target
    }
}

/// Chronologically ordered training samples.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub samples: Vec<Sample>,
    pub rejections: RejectionStats,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Positional split: the first `floor(len * ratio)` samples, then the rest.
    pub fn split(&self, ratio: f64) -> (&[Sample], &[Sample]) {
        let split = ((self.samples.len() as f64 * ratio).floor() as usize).min(self.samples.len());
        self.samples.split_at(split)
    }
}

/// Builds a training set by pairing features with forward targets at every
/// index that has both a warmed-up history and a full horizon ahead.
pub struct DatasetAssembler {
    horizon: usize,
    warmup: usize,
    min_samples: usize,
}

impl DatasetAssembler {
    pub fn new(config: &TrainingConfig) -> Self {
        Self {
            horizon: config.horizon,
            warmup: config.warmup,
            min_samples: config.min_samples,
        }
    }

    fn build_sample(&self, series: &[Candle], index: usize) -> Result<Sample, SampleRejection> {
        let features = extract_features(series, index)?;
        let target = future_volatility(series, index, self.horizon)?;

        // NaN fails this check too
        if !(target > 0.0) {
            return Err(SampleRejection::NonPositiveTarget { index, target });
        }

        Ok(Sample {
            index,
            features,
            target,
        })
    }

    /// Scans the series without enforcing the minimum sample count.
    pub fn collect(&self, series: &[Candle]) -> Dataset {
        let mut dataset = Dataset::default();
        let end = series.len().saturating_sub(self.horizon);

        for index in self.warmup..end {
            match self.build_sample(series, index) {
                Ok(sample) => dataset.samples.push(sample),
                Err(rejection) => {
                    debug!("Skipped sample: {}", rejection);
                    dataset.rejections.record(&rejection);
                }
            }
        }

        dataset
    }

    /// Scans the series and fails when too few samples survive.
    pub fn assemble(&self, series: &[Candle]) -> Result<Dataset, TrainError> {
        info!("Preparing training dataset from {} candles", series.len());

        let dataset = self.collect(series);

        info!(
            "Prepared {} samples ({} skipped)",
            dataset.len(),
            dataset.rejections.total()
        );

        if dataset.len() < self.min_samples {
            return Err(TrainError::InsufficientSamples {
                got: dataset.len(),
                required: self.min_samples,
            });
        }

        Ok(dataset)
    }
}
