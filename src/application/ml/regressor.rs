use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::FeatureVector;
use crate::domain::ml::training_config::BoostingParams;
use std::path::Path;

/// Interface for the regression backend behind the volatility forecaster.
///
/// The pipeline only ever fits, predicts and round-trips a model through a
/// file; everything else about the backend is opaque.
pub trait Regressor: Sized {
    /// Fit a model on feature rows and their targets.
    fn fit(
        features: &[FeatureVector],
        targets: &[f64],
        params: &BoostingParams,
    ) -> Result<Self, ModelError>;

    /// Predict one value per feature row.
    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>, ModelError>;

    /// Write the model's native serialized form to `path`.
    fn save(&self, path: &Path) -> Result<(), ModelError>;

    /// Restore a model previously written by `save`.
    fn load(path: &Path) -> Result<Self, ModelError>;

    /// Short backend name used in log lines.
    fn name(&self) -> &str;

    fn predict_one(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        self.predict(std::slice::from_ref(features))?
            .first()
            .copied()
            .ok_or_else(|| ModelError::Predict("No prediction returned".to_string()))
    }
}
