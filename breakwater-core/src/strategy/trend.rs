//! Trend filter — EMA regime classification gating trade direction.
//!
//! Fail-open: when either EMA is unavailable the filter returns NEUTRAL with
//! both directions allowed, so missing history blocks trading only through
//! insufficient signal, never through a crash.

use crate::domain::{Candle, TrendState};
use crate::indicators::ema_last;
use crate::params::StrategyParams;

/// Classify the market regime from the short/long EMA comparison.
///
/// Equality routes to the bearish branch: the comparison is a strict `>`.
pub fn classify(candles: &[Candle], params: &StrategyParams) -> TrendState {
    if candles.len() < params.ema_long {
        return TrendState::neutral();
    }
    match (
        ema_last(candles, params.ema_short),
        ema_last(candles, params.ema_long),
    ) {
        (Some(short), Some(long)) if short > long => TrendState::bullish(),
        (Some(_), Some(_)) => TrendState::bearish(),
        _ => TrendState::neutral(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TrendClass;
    use crate::indicators::make_candles;

    fn params() -> StrategyParams {
        StrategyParams {
            ema_short: 3,
            ema_long: 5,
            ..StrategyParams::default()
        }
    }

    #[test]
    fn rising_closes_classify_bullish() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let trend = classify(&make_candles(&closes), &params());
        assert_eq!(trend.classification, TrendClass::Bullish);
        assert!(trend.long_allowed);
        assert!(!trend.short_allowed);
    }

    #[test]
    fn falling_closes_classify_bearish() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
        let trend = classify(&make_candles(&closes), &params());
        assert_eq!(trend.classification, TrendClass::Bearish);
        assert!(!trend.long_allowed);
        assert!(trend.short_allowed);
    }

    #[test]
    fn insufficient_history_fails_open() {
        let trend = classify(&make_candles(&[100.0, 101.0]), &params());
        assert_eq!(trend.classification, TrendClass::Neutral);
        assert!(trend.long_allowed);
        assert!(trend.short_allowed);
    }

    #[test]
    fn equal_emas_route_bearish() {
        // Constant closes: both EMAs equal; strict > sends this bearish.
        let trend = classify(&make_candles(&[100.0; 10]), &params());
        assert_eq!(trend.classification, TrendClass::Bearish);
    }

    #[test]
    fn exactly_one_direction_blocked_when_emas_available() {
        for closes in [
            (0..10).map(|i| 100.0 + i as f64).collect::<Vec<_>>(),
            (0..10).map(|i| 100.0 - i as f64).collect::<Vec<_>>(),
        ] {
            let trend = classify(&make_candles(&closes), &params());
            assert!(trend.long_allowed != trend.short_allowed);
        }
    }
}
