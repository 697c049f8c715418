//! Derived indicators, computed on demand over a candle slice.
//!
//! Nothing here is cached across calls: each evaluation cycle recomputes from
//! its series snapshot, keeping every component a pure function of its input.

pub mod atr;
pub mod ema;

pub use atr::atr;
pub use ema::{ema, ema_last};

/// Create synthetic candles from close prices for testing.
///
/// Generates plausible OHLCV: open = prev close (or close for the first
/// candle), high/low bracket open and close by 1.0, volume = 1000. Candles are
/// spaced 4 hours apart starting at midnight UTC.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<crate::domain::Candle> {
    use crate::domain::Candle;
    use chrono::TimeZone as _;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                open_time: base + chrono::Duration::hours(4 * i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
