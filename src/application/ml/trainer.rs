use super::regressor::Regressor;
use crate::domain::errors::{ModelError, TrainError};
use crate::domain::market::candle::Candle;
use crate::domain::ml::dataset::{Dataset, DatasetAssembler, Sample};
use crate::domain::ml::feature_registry::FeatureVector;
use crate::domain::ml::training_config::TrainingConfig;
use crate::domain::ml::training_metrics::TrainingMetrics;
use statrs::statistics::{Data, Distribution};
use tracing::{info, warn};

/// Result of a training run: the fitted regressor and its held-out metrics.
#[derive(Debug)]
pub struct TrainingOutcome<R> {
    pub regressor: R,
    pub metrics: TrainingMetrics,
}

/// Assembles a dataset, splits it chronologically and fits the regressor on
/// the older part, scoring it on the newer part.
pub struct ModelTrainer {
    config: TrainingConfig,
}

fn unzip(samples: &[Sample]) -> (Vec<FeatureVector>, Vec<f64>) {
    samples.iter().map(|s| (s.features, s.target)).unzip()
}

pub fn mean_absolute_error(predictions: &[f64], actuals: &[f64]) -> Option<f64> {
    let errors: Vec<f64> = predictions
        .iter()
        .zip(actuals.iter())
        .map(|(p, t)| (p - t).abs())
        .collect();

    if errors.is_empty() {
        return None;
    }
    Data::new(errors).mean()
}

impl ModelTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Full training pass over a candle series.
    pub fn train<R: Regressor>(&self, series: &[Candle]) -> Result<TrainingOutcome<R>, TrainError> {
        let dataset = DatasetAssembler::new(&self.config).assemble(series)?;
        self.fit_dataset(&dataset)
    }

    /// Fits on an already assembled dataset.
    pub fn fit_dataset<R: Regressor>(
        &self,
        dataset: &Dataset,
    ) -> Result<TrainingOutcome<R>, TrainError> {
        let (train, test) = dataset.split(self.config.train_ratio);
        let (x_train, y_train) = unzip(train);
        let (x_test, y_test) = unzip(test);

        let params = &self.config.boosting;
        info!(
            "Training on {} samples (Rounds: {}, Depth: {}, Eta: {})...",
            x_train.len(),
            params.n_rounds,
            params.max_depth,
            params.learning_rate
        );

        let regressor = R::fit(&x_train, &y_train, params)?;

        let mae = if x_test.is_empty() {
            warn!("Empty test split, reporting zero MAE");
            0.0
        } else {
            let predictions = regressor.predict(&x_test)?;
            mean_absolute_error(&predictions, &y_test).ok_or_else(|| {
                ModelError::Predict("No predictions for the test split".to_string())
            })?
        };

        let metrics = TrainingMetrics {
            samples: dataset.len(),
            train_size: x_train.len(),
            test_size: x_test.len(),
            mean_absolute_error: mae,
        };

        info!(
            "Training completed: samples={}, train={}, test={}, MAE={:.6}",
            metrics.samples, metrics.train_size, metrics.test_size, metrics.mean_absolute_error
        );

        Ok(TrainingOutcome { regressor, metrics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::dataset::RejectionStats;
    use crate::domain::ml::training_config::BoostingParams;
    use std::path::Path;

    /// Predicts the mean training target and remembers what it was fitted on.
    struct MeanRegressor {
        mean: f64,
        fitted_rows: usize,
        first_target: f64,
    }

    impl Regressor for MeanRegressor {
        fn fit(
            features: &[FeatureVector],
            targets: &[f64],
            _params: &BoostingParams,
        ) -> Result<Self, ModelError> {
            Ok(Self {
                mean: targets.iter().sum::<f64>() / targets.len() as f64,
                fitted_rows: features.len(),
                first_target: targets[0],
            })
        }

        fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>, ModelError> {
            Ok(vec![self.mean; features.len()])
        }

        fn save(&self, _path: &Path) -> Result<(), ModelError> {
            Ok(())
        }

        fn load(_path: &Path) -> Result<Self, ModelError> {
            Err(ModelError::Predict("not persisted".to_string()))
        }

        fn name(&self) -> &str {
            "Mean"
        }
    }

    fn dataset(n: usize) -> Dataset {
        let features = FeatureVector {
            atr: 1.0,
            atr_change: 0.0,
            intraday_range: 0.01,
            rsi_velocity: 0.0,
            vol_ratio: 1.0,
            swings: 0.0,
            adx: 20.0,
        };
        Dataset {
            samples: (0..n)
                .map(|index| Sample {
                    index,
                    features,
                    target: index as f64,
                })
                .collect(),
            rejections: RejectionStats::default(),
        }
    }

    #[test]
    fn test_chronological_split_and_metrics() {
        let trainer = ModelTrainer::new(TrainingConfig::default());
        let outcome: TrainingOutcome<MeanRegressor> = trainer.fit_dataset(&dataset(1000)).unwrap();

        assert_eq!(outcome.metrics.samples, 1000);
        assert_eq!(outcome.metrics.train_size, 800);
        assert_eq!(outcome.metrics.test_size, 200);

        // Trained on targets 0..800 in order
        assert_eq!(outcome.regressor.fitted_rows, 800);
        assert_eq!(outcome.regressor.first_target, 0.0);
        assert!((outcome.regressor.mean - 399.5).abs() < 1e-9);

        // Test targets 800..1000 against a constant 399.5 -> mean error 500
        assert!((outcome.metrics.mean_absolute_error - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_floors_the_train_size() {
        let trainer = ModelTrainer::new(TrainingConfig::default());
        let outcome: TrainingOutcome<MeanRegressor> = trainer.fit_dataset(&dataset(303)).unwrap();

        assert_eq!(outcome.metrics.train_size, 242);
        assert_eq!(outcome.metrics.test_size, 61);
    }

    #[test]
    fn test_insufficient_samples_stops_before_fit() {
        let series: Vec<Candle> = (0..100)
            .map(|_| Candle::new(100.0, 101.0, 99.0, 1.0, 50.0, 20.0))
            .collect();

        let result = ModelTrainer::new(TrainingConfig::default()).train::<MeanRegressor>(&series);
        assert!(matches!(
            result,
            Err(TrainError::InsufficientSamples { got: 75, required: 300 })
        ));
    }

    #[test]
    fn test_mean_absolute_error() {
        assert_eq!(mean_absolute_error(&[], &[]), None);
        let mae = mean_absolute_error(&[1.0, 2.0, 4.0], &[2.0, 2.0, 1.0]).unwrap();
        assert!((mae - 4.0 / 3.0).abs() < 1e-12);
    }
}
