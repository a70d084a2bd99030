// Market data domain
pub mod candle;
