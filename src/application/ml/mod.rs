pub mod gradient_boosting;
pub mod regressor;
pub mod trainer;
pub mod volatility_predictor;
