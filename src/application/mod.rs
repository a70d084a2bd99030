// Model training and prediction
pub mod ml;
