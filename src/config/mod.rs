//! Configuration module for Rustvol.
//!
//! Settings are loaded from environment variables (optionally seeded from a
//! `.env` file by the binaries). Command-line flags override them.

mod forecast_config;

pub use forecast_config::ForecastEnvConfig;
