use crate::domain::errors::SampleRejection;
use crate::domain::market::candle::Candle;
use serde::{Deserialize, Serialize};

/// Ordered list of feature names.
/// Training and prediction both build vectors through `extract_features`,
/// so this order is the model's input schema. Any change here is a breaking
/// change for saved models.
pub const FEATURE_NAMES: &[&str] = &[
    "atr",
    "atr_change",
    "intraday_range",
    "rsi_velocity",
    "vol_ratio",
    "swings",
    "adx",
];

pub const FEATURE_COUNT: usize = 7;

/// Trailing window used by the swing counter.
pub const SWING_LOOKBACK: usize = 10;

/// Minimum absolute close-to-close change counted as a swing.
pub const SWING_THRESHOLD: f64 = 0.005;

const DEFAULT_ADX: f64 = 20.0;

/// Feature row for one series index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub atr: f64,
    pub atr_change: f64,
    pub intraday_range: f64,
    pub rsi_velocity: f64,
    pub vol_ratio: f64,
    pub swings: f64,
    pub adx: f64,
}

impl FeatureVector {
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.atr,
            self.atr_change,
            self.intraday_range,
            self.rsi_velocity,
            self.vol_ratio,
            self.swings,
            self.adx,
        ]
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.to_array().to_vec()
    }

    /// Name of the first non-finite component, if any.
    fn first_non_finite(&self) -> Option<&'static str> {
        self.to_array()
            .iter()
            .zip(FEATURE_NAMES.iter())
            .find(|(value, _)| !value.is_finite())
            .map(|(_, name)| *name)
    }
}

/// Relative change against a previous value, zero when the previous value
/// cannot be divided by.
fn relative_change(current: f64, previous: Option<f64>) -> f64 {
    match previous {
        Some(prev) if prev > 0.0 => (current - prev) / prev,
        _ => 0.0,
    }
}

/// Counts close-to-close moves above `SWING_THRESHOLD` for pairs ending in
/// `[max(1, index - lookback), index)`.
pub fn count_recent_swings(series: &[Candle], index: usize, lookback: usize) -> usize {
    let start = index.saturating_sub(lookback).max(1);
    let end = index.min(series.len());

    (start..end)
        .filter(|&j| match (series[j - 1].close, series[j].close) {
            (Some(prev), Some(curr)) if prev != 0.0 => {
                (curr - prev).abs() / prev > SWING_THRESHOLD
            }
            _ => false,
        })
        .count()
}

/// Builds the feature vector for `series[index]`.
///
/// The previous candle is `series[index - 1]`, or the current candle itself
/// at index 0, which makes both velocity features zero.
pub fn extract_features(
    series: &[Candle],
    index: usize,
) -> Result<FeatureVector, SampleRejection> {
    let current = series.get(index).ok_or(SampleRejection::IndexOutOfRange {
        index,
        len: series.len(),
    })?;
    let prev = if index > 0 { &series[index - 1] } else { current };

    if let Some(field) = current.missing_core_field() {
        return Err(SampleRejection::MissingOrZeroCoreField { index, field });
    }

    // Gate above guarantees presence
    let close = current.close.unwrap_or(1.0);
    let high = current.high.unwrap_or(0.0);
    let low = current.low.unwrap_or(0.0);
    let atr = current.atr.unwrap_or(0.0);
    let rsi = current.rsi.unwrap_or(0.0);

    let avg_volume = current.avg_volume_or_default();
    let vol_ratio = if avg_volume > 0.0 {
        current.volume_or_default() / avg_volume
    } else {
        1.0
    };

    let features = FeatureVector {
        atr,
        atr_change: relative_change(atr, prev.atr),
        intraday_range: (high - low) / close,
        rsi_velocity: relative_change(rsi, prev.rsi),
        vol_ratio,
        swings: count_recent_swings(series, index, SWING_LOOKBACK) as f64,
        adx: current.adx.unwrap_or(DEFAULT_ADX),
    };

    match features.first_non_finite() {
        Some(feature) => Err(SampleRejection::NonFiniteFeature { index, feature }),
        None => Ok(features),
    }
}
