// Model persistence
pub mod model_store;
