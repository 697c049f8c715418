//! Leverage selector — realized volatility mapped to a bounded leverage.
//!
//! ATR as a percent of price drives the mapping: high volatility pins the
//! minimum, low volatility the maximum, and the band in between interpolates
//! around the base. Base leverage is used unmodified when ATR is unavailable.

use crate::domain::Candle;
use crate::indicators::atr;
use crate::params::StrategyParams;

/// Select leverage for the current volatility regime, rounded to one decimal.
pub fn select(candles: &[Candle], current_price: f64, params: &StrategyParams) -> f64 {
    let atr_value = match atr(candles, params.atr_period) {
        Some(v) => v,
        None => return params.base_leverage,
    };
    let normalized_atr = atr_value / current_price * 100.0;

    let leverage = if normalized_atr > params.high_volatility_atr_pct {
        params.min_leverage
    } else if normalized_atr < params.low_volatility_atr_pct {
        params.max_leverage
    } else {
        (params.base_leverage * (1.0 + (0.5 - normalized_atr / 2.0)))
            .clamp(params.min_leverage, params.max_leverage)
    };

    (leverage * 10.0).round() / 10.0
}
