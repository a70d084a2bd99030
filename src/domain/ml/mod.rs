// Volatility model domain: features, labels, datasets and forecast payloads
pub mod dataset;
pub mod feature_registry;
pub mod labels;
pub mod prediction;
pub mod training_config;
pub mod training_metrics;
