//! Signal — a candidate trade produced by the breakout detector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long => "LONG",
            Side::Short => "SHORT",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate trade: entry/stop/target prices plus the filter observations
/// that produced it.
///
/// Created at most once per evaluation cycle and never mutated — it is either
/// consumed into a `Position` or discarded. `volume_confirmed` is advisory
/// metadata: it is recorded on the signal but does not gate emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub side: Side,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Stop distance as a percentage of entry.
    pub risk_pct: f64,
    /// Target distance as a percentage of entry.
    pub reward_pct: f64,
    pub level_price: f64,
    /// Magnitude of the breakout candle's close beyond the level, in percent.
    pub breakout_magnitude_pct: f64,
    pub volume_confirmed: bool,
    pub trend_aligned: bool,
    pub decay_applied: bool,
    pub signal_time: DateTime<Utc>,
}
