//! Volume confirmation — breakout volume against the trailing average.
//!
//! Advisory only: the result is recorded on the signal but never gates
//! emission.

use crate::domain::Candle;
use crate::params::StrategyParams;

/// Whether the candle at `idx` printed volume above the trailing-average
/// threshold. The average excludes the candle itself. False when fewer than
/// `volume_lookback` prior candles exist.
pub fn confirmed_at(candles: &[Candle], idx: usize, params: &StrategyParams) -> bool {
    if idx < params.volume_lookback || idx >= candles.len() {
        return false;
    }
    let window = &candles[idx - params.volume_lookback..idx];
    let avg = window.iter().map(|c| c.volume).sum::<f64>() / window.len() as f64;
    candles[idx].volume > avg * params.volume_confirmation_multiplier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_candles;

    fn params() -> StrategyParams {
        StrategyParams::default()
    }

    #[test]
    fn spike_above_threshold_confirms() {
        let mut candles = make_candles(&[100.0; 25]);
        candles[24].volume = 1300.0; // baseline is 1000, threshold 1200
        assert!(confirmed_at(&candles, 24, &params()));
    }

    #[test]
    fn at_threshold_does_not_confirm() {
        let mut candles = make_candles(&[100.0; 25]);
        candles[24].volume = 1200.0;
        assert!(!confirmed_at(&candles, 24, &params()));
    }

    #[test]
    fn average_excludes_current_candle() {
        let mut candles = make_candles(&[100.0; 25]);
        // A huge current candle must not inflate its own baseline.
        candles[24].volume = 100_000.0;
        assert!(confirmed_at(&candles, 24, &params()));
    }

    #[test]
    fn insufficient_history_is_unconfirmed() {
        let mut candles = make_candles(&[100.0; 15]);
        candles[14].volume = 100_000.0;
        assert!(!confirmed_at(&candles, 14, &params()));
    }
}
