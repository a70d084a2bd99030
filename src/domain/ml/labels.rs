use crate::domain::errors::SampleRejection;
use crate::domain::market::candle::Candle;
use statrs::statistics::{Data, Distribution};

/// Default number of future candles averaged into a target.
pub const DEFAULT_HORIZON: usize = 5;

/// Mean ATR over the `horizon` candles following `index`.
///
/// The window is clipped at the end of the series. Candles without an ATR
/// are ignored rather than counted as zero.
pub fn future_volatility(
    series: &[Candle],
    index: usize,
    horizon: usize,
) -> Result<f64, SampleRejection> {
    let start = (index + 1).min(series.len());
    let end = (index + 1 + horizon).min(series.len());
    let window = &series[start..end];

    if window.is_empty() {
        return Err(SampleRejection::EmptyFutureWindow { index });
    }

    let atr_values: Vec<f64> = window.iter().filter_map(|c| c.atr).collect();
    if atr_values.is_empty() {
        return Err(SampleRejection::MissingFutureAtr { index });
    }

    Data::new(atr_values)
        .mean()
        .ok_or(SampleRejection::MissingFutureAtr { index })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_atr(atr: Option<f64>) -> Candle {
        Candle {
            atr,
            ..Candle::new(100.0, 101.0, 99.0, 1.0, 50.0, 20.0)
        }
    }

    #[test]
    fn test_mean_over_horizon() {
        let series: Vec<Candle> = [1.0, 2.0, 4.0, 6.0, 8.0, 10.0, 100.0]
            .into_iter()
            .map(|atr| with_atr(Some(atr)))
            .collect();

        // Candles 1..=5 -> (2 + 4 + 6 + 8 + 10) / 5
        let target = future_volatility(&series, 0, DEFAULT_HORIZON).unwrap();
        assert!((target - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_skips_absent_atr() {
        let series = vec![
            with_atr(Some(1.0)),
            with_atr(None),
            with_atr(Some(3.0)),
            with_atr(None),
        ];

        let target = future_volatility(&series, 0, 3).unwrap();
        assert!((target - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_clipped_at_series_end() {
        let series = vec![with_atr(Some(1.0)), with_atr(Some(2.0)), with_atr(Some(4.0))];
        let target = future_volatility(&series, 1, DEFAULT_HORIZON).unwrap();
        assert!((target - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_future_window() {
        let series = vec![with_atr(Some(1.0)), with_atr(Some(2.0))];
        assert_eq!(
            future_volatility(&series, 1, DEFAULT_HORIZON),
            Err(SampleRejection::EmptyFutureWindow { index: 1 })
        );
    }

    #[test]
    fn test_missing_future_atr() {
        let series = vec![with_atr(Some(1.0)), with_atr(None), with_atr(None)];
        assert_eq!(
            future_volatility(&series, 0, DEFAULT_HORIZON),
            Err(SampleRejection::MissingFutureAtr { index: 0 })
        );
    }
}
