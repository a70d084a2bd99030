use super::regressor::Regressor;
use super::trainer::ModelTrainer;
use crate::domain::errors::{PredictError, TrainError};
use crate::domain::market::candle::Candle;
use crate::domain::ml::feature_registry::extract_features;
use crate::domain::ml::prediction::{PredictionInput, PredictionResult};
use crate::domain::ml::training_config::TrainingConfig;
use crate::domain::ml::training_metrics::{ModelMetadata, TrainingMetrics};
use tracing::debug;

/// Volatility forecaster handle.
///
/// Built once, by training or by loading from a `ModelStore`, and never
/// mutated afterwards. An `Untrained` handle refuses to predict.
#[derive(Debug)]
pub enum VolatilityModel<R> {
    Untrained,
    Trained { regressor: R, metadata: ModelMetadata },
}

impl<R: Regressor> VolatilityModel<R> {
    /// Trains a fresh model on the series, stamping the metadata with the
    /// current time.
    pub fn train(series: &[Candle], config: TrainingConfig) -> Result<Self, TrainError> {
        let outcome = ModelTrainer::new(config).train::<R>(series)?;
        Ok(Self::Trained {
            regressor: outcome.regressor,
            metadata: ModelMetadata::new(outcome.metrics),
        })
    }

    pub fn is_trained(&self) -> bool {
        matches!(self, Self::Trained { .. })
    }

    pub fn metadata(&self) -> Option<&ModelMetadata> {
        match self {
            Self::Trained { metadata, .. } => Some(metadata),
            Self::Untrained => None,
        }
    }

    pub fn training_metrics(&self) -> Option<&TrainingMetrics> {
        self.metadata().and_then(|m| m.training_metrics.as_ref())
    }

    pub fn regressor(&self) -> Option<&R> {
        match self {
            Self::Trained { regressor, .. } => Some(regressor),
            Self::Untrained => None,
        }
    }

    /// Forecasts volatility for the last candle of the input.
    pub fn predict(&self, input: &PredictionInput) -> Result<PredictionResult, PredictError> {
        let regressor = self.regressor().ok_or(PredictError::ModelNotLoaded)?;

        let candles = input.candles();
        let last_index = candles.len().checked_sub(1).ok_or(PredictError::EmptyInput)?;
        let features = extract_features(candles, last_index).map_err(PredictError::InvalidInput)?;

        let predicted_vol = regressor.predict_one(&features)?;
        let last = &candles[last_index];
        let current_vol = last.atr.unwrap_or(0.0);
        let last_close = last.close.unwrap_or(1.0);

        debug!(
            "{} forecast {:.6} (current {:.6})",
            regressor.name(),
            predicted_vol,
            current_vol
        );

        Ok(PredictionResult::from_forecast(
            predicted_vol,
            current_vol,
            last_close,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{ModelError, SampleRejection};
    use crate::domain::ml::feature_registry::FeatureVector;
    use crate::domain::ml::prediction::{Recommendation, VolatilityLevel};
    use crate::domain::ml::training_config::BoostingParams;
    use std::path::Path;

    /// Predicts a fixed value regardless of input.
    struct FixedRegressor(f64);

    impl Regressor for FixedRegressor {
        fn fit(_: &[FeatureVector], _: &[f64], _: &BoostingParams) -> Result<Self, ModelError> {
            Ok(Self(0.0))
        }

        fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>, ModelError> {
            Ok(vec![self.0; features.len()])
        }

        fn save(&self, _: &Path) -> Result<(), ModelError> {
            Ok(())
        }

        fn load(_: &Path) -> Result<Self, ModelError> {
            Ok(Self(0.0))
        }

        fn name(&self) -> &str {
            "Fixed"
        }
    }

    fn trained(value: f64) -> VolatilityModel<FixedRegressor> {
        VolatilityModel::Trained {
            regressor: FixedRegressor(value),
            metadata: ModelMetadata::new(TrainingMetrics {
                samples: 300,
                train_size: 240,
                test_size: 60,
                mean_absolute_error: 0.01,
            }),
        }
    }

    fn candle() -> Candle {
        Candle::new(105.0, 110.0, 100.0, 2.0, 55.0, 25.0)
    }

    #[test]
    fn test_untrained_refuses_to_predict() {
        let model: VolatilityModel<FixedRegressor> = VolatilityModel::Untrained;
        assert!(!model.is_trained());
        assert!(model.training_metrics().is_none());
        assert!(matches!(
            model.predict(&PredictionInput::Single(candle())),
            Err(PredictError::ModelNotLoaded)
        ));
    }

    #[test]
    fn test_empty_series_is_rejected() {
        assert!(matches!(
            trained(1.0).predict(&PredictionInput::Series(vec![])),
            Err(PredictError::EmptyInput)
        ));
    }

    #[test]
    fn test_invalid_last_candle_is_rejected() {
        let broken = Candle {
            atr: None,
            ..candle()
        };
        let result = trained(1.0).predict(&PredictionInput::Series(vec![candle(), broken]));

        assert!(matches!(
            result,
            Err(PredictError::InvalidInput(
                SampleRejection::MissingOrZeroCoreField {
                    index: 1,
                    field: "atr"
                }
            ))
        ));
    }

    #[test]
    fn test_single_candle_prediction() {
        let result = trained(3.0)
            .predict(&PredictionInput::Single(candle()))
            .unwrap();

        assert_eq!(result.predicted_volatility, 3.0);
        assert_eq!(result.current_volatility, 2.0);
        assert!((result.percent_change - 50.0).abs() < 1e-9);
        assert!((result.confidence - 0.5).abs() < 1e-9);
        // 3 / 105 is above 1%
        assert_eq!(result.volatility_level, VolatilityLevel::High);
        assert_eq!(result.risk_adjustment, 0.5);
        assert_eq!(result.recommendation, Recommendation::ReducePosition);
    }

    #[test]
    fn test_series_uses_last_candle() {
        let calm = Candle::new(200.0, 201.0, 199.0, 4.0, 50.0, 20.0);
        let result = trained(0.6)
            .predict(&PredictionInput::Series(vec![candle(), calm]))
            .unwrap();

        assert_eq!(result.current_volatility, 4.0);
        assert_eq!(result.volatility_level, VolatilityLevel::Low);
        assert_eq!(result.recommendation, Recommendation::NormalPosition);
        assert!((result.percent_change + 85.0).abs() < 1e-9);
    }
}
