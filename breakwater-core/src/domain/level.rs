//! Level — reference price derived from the most recent session-close candle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A session-close reference level with its decay state.
///
/// Value object: recomputed from the series on every evaluation, never mutated
/// in place. `valid` is false while the level is younger than the configured
/// minimum age; levels older than the hard expiry are not represented at all
/// (the level engine returns `None` for them unless a retest holds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub price: f64,
    pub anchor_time: DateTime<Utc>,
    pub age_hours: f64,
    pub decay_factor: f64,
    pub valid: bool,
}

impl Level {
    /// Whether the stale-level stop tightening is in effect.
    pub fn decay_applied(&self) -> bool {
        self.decay_factor < 1.0
    }
}
