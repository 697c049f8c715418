//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! ATR is the simple moving average of TR over the trailing `period` candles,
//! evaluated at the last candle. Needs period+1 candles so every TR in the
//! window has a previous close.

use crate::domain::Candle;

/// ATR at the last candle, or `None` when fewer than period+1 candles exist.
pub fn atr(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }
    let start = candles.len() - period;
    let mut sum = 0.0;
    for i in start..candles.len() {
        let c = &candles[i];
        let prev_close = candles[i - 1].close;
        let tr = (c.high - c.low)
            .max((c.high - prev_close).abs())
            .max((c.low - prev_close).abs());
        sum += tr;
    }
    Some(sum / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};
    use chrono::TimeZone;

    fn make_ohlc_candles(data: &[(f64, f64, f64, f64)]) -> Vec<Candle> {
        let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        data.iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| Candle {
                open_time: base + chrono::Duration::hours(4 * i as i64),
                open,
                high,
                low,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn atr_period_3_known_values() {
        let candles = make_ohlc_candles(&[
            (100.0, 105.0, 95.0, 102.0),  // seed candle, supplies prev close
            (102.0, 108.0, 100.0, 106.0), // TR = max(8, 6, 2) = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = max(9, 1, 8) = 9
            (99.0, 103.0, 97.0, 101.0),   // TR = max(6, 4, 2) = 6
        ]);
        let result = atr(&candles, 3).unwrap();
        assert_approx(result, (8.0 + 9.0 + 6.0) / 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_gap_up_uses_prev_close() {
        // Prev close 100, current candle 108-115: TR = |115 - 100| = 15
        let candles = make_ohlc_candles(&[
            (98.0, 102.0, 97.0, 100.0),
            (110.0, 115.0, 108.0, 112.0),
        ]);
        let result = atr(&candles, 1).unwrap();
        assert_approx(result, 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_unavailable_without_period_plus_one() {
        let candles = make_ohlc_candles(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0),
            (106.0, 107.0, 98.0, 99.0),
        ]);
        assert!(atr(&candles, 3).is_none());
        assert!(atr(&candles, 2).is_some());
    }

    #[test]
    fn atr_zero_period_unavailable() {
        let candles = make_ohlc_candles(&[(100.0, 105.0, 95.0, 102.0)]);
        assert!(atr(&candles, 0).is_none());
    }
}
