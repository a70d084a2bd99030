use crate::domain::market::candle::Candle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Volatility relative to price below which a forecast is considered calm.
pub const LOW_VOLATILITY_RATIO: f64 = 0.005;
/// Volatility relative to price from which a forecast is considered high.
pub const HIGH_VOLATILITY_RATIO: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolatilityLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for VolatilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatilityLevel::Low => write!(f, "LOW"),
            VolatilityLevel::Medium => write!(f, "MEDIUM"),
            VolatilityLevel::High => write!(f, "HIGH"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    ReducePosition,
    NormalPosition,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::ReducePosition => write!(f, "REDUCE_POSITION"),
            Recommendation::NormalPosition => write!(f, "NORMAL_POSITION"),
        }
    }
}

/// What a caller may ask a forecast for: the latest candle alone, or a
/// series whose last element is forecast with the rest as trailing context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionInput {
    Series(Vec<Candle>),
    Single(Candle),
}

impl PredictionInput {
    pub fn candles(&self) -> &[Candle] {
        match self {
            PredictionInput::Series(candles) => candles,
            PredictionInput::Single(candle) => std::slice::from_ref(candle),
        }
    }
}

/// Payload handed to the trading process for one forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub predicted_volatility: f64,
    pub volatility_level: VolatilityLevel,
    pub risk_adjustment: f64,
    pub confidence: f64,
    pub current_volatility: f64,
    pub percent_change: f64,
    pub recommendation: Recommendation,
}

impl PredictionResult {
    /// Derives the full payload from the model output and the latest candle's
    /// ATR and close.
    pub fn from_forecast(predicted_vol: f64, current_vol: f64, last_close: f64) -> Self {
        let percent_change = percent_change(predicted_vol, current_vol);

        Self {
            predicted_volatility: predicted_vol,
            volatility_level: categorize_volatility(predicted_vol, last_close),
            risk_adjustment: risk_adjustment(predicted_vol),
            confidence: confidence(percent_change),
            current_volatility: current_vol,
            percent_change,
            recommendation: recommend(predicted_vol, current_vol),
        }
    }
}

pub fn percent_change(predicted_vol: f64, current_vol: f64) -> f64 {
    if current_vol > 0.0 {
        (predicted_vol - current_vol) / current_vol * 100.0
    } else {
        0.0
    }
}

/// Buckets the forecast by its size relative to the last close. Lower
/// bounds are inclusive: a ratio of exactly 0.005 is MEDIUM.
pub fn categorize_volatility(predicted_vol: f64, last_close: f64) -> VolatilityLevel {
    let ratio = predicted_vol / last_close;
    if ratio < LOW_VOLATILITY_RATIO {
        VolatilityLevel::Low
    } else if ratio < HIGH_VOLATILITY_RATIO {
        VolatilityLevel::Medium
    } else {
        VolatilityLevel::High
    }
}

/// Position size multiplier for an absolute volatility forecast.
pub fn risk_adjustment(predicted_vol: f64) -> f64 {
    if predicted_vol <= 0.0 {
        1.0
    } else if predicted_vol < LOW_VOLATILITY_RATIO {
        2.0
    } else if predicted_vol < HIGH_VOLATILITY_RATIO {
        1.2
    } else {
        0.5
    }
}

pub fn confidence(percent_change: f64) -> f64 {
    (1.0 - (percent_change.abs() / 100.0).min(1.0)).clamp(0.0, 1.0)
}

pub fn recommend(predicted_vol: f64, current_vol: f64) -> Recommendation {
    if predicted_vol > current_vol {
        Recommendation::ReducePosition
    } else {
        Recommendation::NormalPosition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_boundaries() {
        assert_eq!(categorize_volatility(0.4, 100.0), VolatilityLevel::Low);
        assert_eq!(categorize_volatility(0.005, 1.0), VolatilityLevel::Medium);
        assert_eq!(categorize_volatility(0.009, 1.0), VolatilityLevel::Medium);
        assert_eq!(categorize_volatility(0.01, 1.0), VolatilityLevel::High);
        assert_eq!(categorize_volatility(5.0, 100.0), VolatilityLevel::High);
    }

    #[test]
    fn test_risk_adjustment_table() {
        assert_eq!(risk_adjustment(0.0), 1.0);
        assert_eq!(risk_adjustment(-0.1), 1.0);
        assert_eq!(risk_adjustment(0.003), 2.0);
        assert_eq!(risk_adjustment(0.007), 1.2);
        assert_eq!(risk_adjustment(0.02), 0.5);
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(confidence(0.0), 1.0);
        assert!((confidence(-25.0) - 0.75).abs() < 1e-12);
        assert_eq!(confidence(100.0), 0.0);
        assert_eq!(confidence(350.0), 0.0);
        assert_eq!(confidence(-1e9), 0.0);
    }

    #[test]
    fn test_zero_current_volatility() {
        let result = PredictionResult::from_forecast(1.5, 0.0, 100.0);
        assert_eq!(result.percent_change, 0.0);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.recommendation, Recommendation::ReducePosition);
    }

    #[test]
    fn test_from_forecast_derivations() {
        let result = PredictionResult::from_forecast(0.75, 1.0, 100.0);

        assert!((result.percent_change + 25.0).abs() < 1e-9);
        assert!((result.confidence - 0.75).abs() < 1e-9);
        assert_eq!(result.volatility_level, VolatilityLevel::Medium);
        assert_eq!(result.risk_adjustment, 0.5);
        assert_eq!(result.recommendation, Recommendation::NormalPosition);
    }

    #[test]
    fn test_prediction_input_accepts_object_or_array() {
        let single: PredictionInput =
            serde_json::from_str(r#"{"close": 1.1, "atr": 0.002}"#).unwrap();
        assert!(matches!(single, PredictionInput::Single(_)));
        assert_eq!(single.candles().len(), 1);

        let series: PredictionInput =
            serde_json::from_str(r#"[{"close": 1.1}, {"close": 1.2}]"#).unwrap();
        assert_eq!(series.candles().len(), 2);
        assert_eq!(series.candles()[1].close, Some(1.2));

        let empty: PredictionInput = serde_json::from_str("[]").unwrap();
        assert!(empty.candles().is_empty());
    }

    #[test]
    fn test_serialized_payload_shape() {
        let result = PredictionResult::from_forecast(0.003, 0.002, 1.1);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["volatilityLevel"], "LOW");
        assert_eq!(json["recommendation"], "REDUCE_POSITION");
        assert_eq!(json["riskAdjustment"], 2.0);
        assert!(json.get("predictedVolatility").is_some());
        assert!(json.get("currentVolatility").is_some());
    }
}
