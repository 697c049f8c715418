//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * value[t] + (1 - alpha) * EMA[t-1], with
//! alpha = 2/(period+1). Seeded from the first value — no SMA warm-up — so
//! every index has an output once the availability threshold is met.
//! Unavailable when fewer than `period` values exist.

use crate::domain::Candle;

/// EMA over an f64 series. Returns the full output series, or `None` when the
/// input is shorter than `period`.
pub fn ema(values: &[f64], period: usize) -> Option<Vec<f64>> {
    if period == 0 || values.len() < period {
        return None;
    }
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = values[0];
    out.push(prev);
    for &v in &values[1..] {
        prev = alpha * v + (1.0 - alpha) * prev;
        out.push(prev);
    }
    Some(out)
}

/// Latest EMA of candle closes, or `None` when unavailable.
pub fn ema_last(candles: &[Candle], period: usize) -> Option<f64> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    ema(&closes, period).and_then(|series| series.last().copied())
}
