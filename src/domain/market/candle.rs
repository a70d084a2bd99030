use serde::{Deserialize, Serialize};

/// One period of market data, enriched with the indicators the volatility
/// model consumes.
///
/// Indicator fields are optional because upstream feeds omit them during
/// warm-up. `null` in JSON is treated the same as a missing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Candle {
    pub close: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub atr: Option<f64>,
    pub rsi: Option<f64>,
    pub adx: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_volume: Option<f64>,
}

impl Candle {
    /// Builds a candle with every core field present.
    pub fn new(close: f64, high: f64, low: f64, atr: f64, rsi: f64, adx: f64) -> Self {
        Self {
            close: Some(close),
            high: Some(high),
            low: Some(low),
            atr: Some(atr),
            rsi: Some(rsi),
            adx: Some(adx),
            volume: None,
            avg_volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64, avg_volume: f64) -> Self {
        self.volume = Some(volume);
        self.avg_volume = Some(avg_volume);
        self
    }

    pub fn volume_or_default(&self) -> f64 {
        self.volume.unwrap_or(1.0)
    }

    pub fn avg_volume_or_default(&self) -> f64 {
        self.avg_volume.unwrap_or(1.0)
    }

    /// Returns the name of the first core field that is absent or exactly zero.
    pub fn missing_core_field(&self) -> Option<&'static str> {
        let core = [
            ("close", self.close),
            ("high", self.high),
            ("low", self.low),
            ("atr", self.atr),
            ("rsi", self.rsi),
            ("adx", self.adx),
        ];

        core.into_iter()
            .find(|(_, value)| value.is_none_or(|v| v == 0.0))
            .map(|(name, _)| name)
    }
}
