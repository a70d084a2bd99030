use thiserror::Error;

/// Reasons a single series index is dropped from a dataset or refused for
/// prediction. These never abort dataset assembly on their own.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleRejection {
    #[error("Missing or zero core field '{field}' at index {index}")]
    MissingOrZeroCoreField { index: usize, field: &'static str },

    #[error("Non-finite feature '{feature}' at index {index}")]
    NonFiniteFeature { index: usize, feature: &'static str },

    #[error("Index {index} is outside a series of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No future candles after index {index}")]
    EmptyFutureWindow { index: usize },

    #[error("No future ATR values after index {index}")]
    MissingFutureAtr { index: usize },

    #[error("Non-positive target {target} at index {index}")]
    NonPositiveTarget { index: usize, target: f64 },
}

/// Errors raised by the regression model backend.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Cannot fit a model on an empty training set")]
    EmptyTrainingSet,

    #[error("Feature matrix has {rows} rows but {targets} targets")]
    ShapeMismatch { rows: usize, targets: usize },

    #[error("Matrix creation failed: {0}")]
    Matrix(String),

    #[error("Training failed: {0}")]
    Fit(String),

    #[error("Prediction failed: {0}")]
    Predict(String),

    #[error("Model I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Pipeline-level errors for a training run.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("Not enough valid samples (need {required}+, got {got})")]
    InsufficientSamples { got: usize, required: usize },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Pipeline-level errors for a prediction call.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Model not trained or loaded")]
    ModelNotLoaded,

    #[error("No candles supplied for prediction")]
    EmptyInput,

    #[error("Invalid input for prediction: {0}")]
    InvalidInput(SampleRejection),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors reading or writing persisted models.
#[derive(Debug, Error)]
pub enum ModelStoreError {
    #[error("Saved model not found at {path}")]
    ModelFileNotFound { path: String },

    #[error("Model metadata I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Model metadata at {path} is malformed: {source}")]
    Metadata {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot save an untrained model")]
    NothingToSave,

    #[error(transparent)]
    Model(#[from] ModelError),
}
