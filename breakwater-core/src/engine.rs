//! Evaluation engine — one synchronous pass over a series snapshot.
//!
//! Components run in dependency order: level engine, trend filter, leverage
//! selector, breakout detector. At most one candidate signal comes out of a
//! pass. Sizing is separate (it needs capital and funding context); the
//! drawdown gate is the caller's responsibility and is checked before a pass
//! is even requested.

use crate::domain::{Candle, Level, Signal, TrendState};
use crate::params::StrategyParams;
use crate::series::{Series, SeriesError};
use crate::strategy::{breakout, level, leverage, trend};

/// Everything one evaluation pass observed, whether or not it found a signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The session level, absent when none exists or it expired unretested.
    pub level: Option<Level>,
    pub trend: TrendState,
    /// Volatility-selected leverage for any trade sized off this pass.
    pub leverage: f64,
    pub signal: Option<Signal>,
}

impl Evaluation {
    /// Why no signal was emitted, for cycle reporting. `None` when a signal
    /// exists.
    pub fn no_signal_reason(&self) -> Option<&'static str> {
        if self.signal.is_some() {
            return None;
        }
        match &self.level {
            None => Some("no level"),
            Some(level) if !level.valid => Some("level too young"),
            Some(_) => Some("no confirmed breakout"),
        }
    }
}

/// Evaluate a full series snapshot, enforcing the decision minimum.
pub fn evaluate(series: &Series, params: &StrategyParams) -> Result<Evaluation, SeriesError> {
    series.require_min(params.min_history)?;
    Ok(evaluate_slice(series.candles(), params))
}

/// Evaluate a candle prefix directly. Backtests replay growing prefixes of
/// one series through this entry point; `candles` must be non-empty.
pub fn evaluate_slice(candles: &[Candle], params: &StrategyParams) -> Evaluation {
    assert!(!candles.is_empty(), "evaluation requires at least one candle");
    let idx = candles.len() - 1;
    let current_price = candles[idx].close;

    let level = level::compute(candles, idx, params);
    let trend = trend::classify(candles, params);
    let leverage = leverage::select(candles, current_price, params);
    let signal = level
        .as_ref()
        .and_then(|l| breakout::detect(candles, l, &trend, params));

    Evaluation {
        level,
        trend,
        leverage,
        signal,
    }
}
