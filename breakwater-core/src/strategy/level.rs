//! Level engine — session-close level discovery with time-based decay.
//!
//! The reference level is the close of the most recent candle whose open-time
//! hour-of-day (UTC) matches the configured session-close hour. Decay policy:
//!
//! - age < min age: visible but not tradable (`valid = false`)
//! - min age..=onset: full weight (decay 1.0)
//! - onset..=expiry: decay 0.75 (stops tighten on stale levels)
//! - past expiry: absent, unless the current candle retests the level (close
//!   within the proximity band AND volume above 1.2x the trailing average), in
//!   which case the level trades at full weight.

use chrono::Timelike;

use crate::domain::{Candle, Level};
use crate::params::StrategyParams;

/// Compute the level as of `idx`, or `None` when no session-close candle
/// exists or the level has expired without a retest.
///
/// Pure function of its inputs: repeated calls over the same slice return
/// identical output.
pub fn compute(candles: &[Candle], idx: usize, params: &StrategyParams) -> Option<Level> {
    let historical = &candles[..=idx];
    let anchor = historical
        .iter()
        .rev()
        .find(|c| c.open_time.hour() == params.session_close_hour_utc)?;

    let price = anchor.close;
    let eval_time = historical[idx].open_time;
    let age_hours = (eval_time - anchor.open_time).num_milliseconds() as f64 / 3_600_000.0;

    let mut decay_factor = 1.0;
    if age_hours > params.expiry_hours {
        if !retested(historical, price, params) {
            return None;
        }
        // Retest re-anchors interest at the level: full weight.
    } else if age_hours > params.decay_onset_hours {
        decay_factor = 1.0 - params.stale_level_decay;
    }

    Some(Level {
        price,
        anchor_time: anchor.open_time,
        age_hours,
        decay_factor,
        valid: age_hours >= params.min_level_age_hours,
    })
}

/// Retest condition for an expired level: the current candle closed within
/// the proximity band of the level on above-average volume.
fn retested(historical: &[Candle], level_price: f64, params: &StrategyParams) -> bool {
    let current = match historical.last() {
        Some(c) => c,
        None => return false,
    };
    let tail_start = historical.len().saturating_sub(params.volume_lookback);
    let tail = &historical[tail_start..];
    let avg_volume = tail.iter().map(|c| c.volume).sum::<f64>() / tail.len() as f64;

    (current.close - level_price).abs() / level_price < params.retest_proximity_pct
        && current.volume > avg_volume * params.volume_confirmation_multiplier
}
