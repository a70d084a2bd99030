// Market data domain
pub mod market;

// Volatility model domain
pub mod ml;

// Domain-specific error types
pub mod errors;
