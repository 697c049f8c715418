//! Position and sizing output types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Side, Signal};

/// Output of the position sizer: how many units to trade and what they cost.
///
/// Pure function output — see `strategy::sizing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    pub units: f64,
    pub notional_value: f64,
    pub margin_required: f64,
    pub risk_amount: f64,
}

/// An open position. At most one exists per strategy instance.
///
/// Created by accepting a Signal + SizingResult; mutated only by closing
/// (exits are all-or-nothing at stop or target).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub side: Side,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub units: f64,
    pub leverage: f64,
    pub margin_required: f64,
    pub level_price: f64,
    pub opened_at: DateTime<Utc>,
}

impl Position {
    /// Open a position from a signal, applying adverse entry slippage:
    /// a long fills above the intended entry, a short below. Stop and target
    /// stay at the signal's prices.
    pub fn open(
        signal: &Signal,
        sizing: &SizingResult,
        leverage: f64,
        entry_slippage_pct: f64,
        opened_at: DateTime<Utc>,
    ) -> Self {
        let entry_price = match signal.side {
            Side::Long => signal.entry * (1.0 + entry_slippage_pct),
            Side::Short => signal.entry * (1.0 - entry_slippage_pct),
        };
        Self {
            side: signal.side,
            entry_price,
            stop_loss: signal.stop_loss,
            take_profit: signal.take_profit,
            units: sizing.units,
            leverage,
            margin_required: sizing.margin_required,
            level_price: signal.level_price,
            opened_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_signal(side: Side) -> Signal {
        Signal {
            side,
            entry: 50_000.0,
            stop_loss: 49_800.0,
            take_profit: 50_700.0,
            risk_pct: 0.4,
            reward_pct: 1.4,
            level_price: 49_975.0,
            breakout_magnitude_pct: 0.12,
            volume_confirmed: false,
            trend_aligned: true,
            decay_applied: false,
            signal_time: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    fn sample_sizing() -> SizingResult {
        SizingResult {
            units: 0.015,
            notional_value: 750.0,
            margin_required: 214.29,
            risk_amount: 3.0,
        }
    }

    #[test]
    fn long_entry_slips_up() {
        let opened_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let position = Position::open(
            &sample_signal(Side::Long),
            &sample_sizing(),
            3.5,
            0.0025,
            opened_at,
        );
        assert!((position.entry_price - 50_000.0 * 1.0025).abs() < 1e-9);
        assert_eq!(position.stop_loss, 49_800.0);
        assert_eq!(position.take_profit, 50_700.0);
    }

    #[test]
    fn short_entry_slips_down() {
        let opened_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let position = Position::open(
            &sample_signal(Side::Short),
            &sample_sizing(),
            3.5,
            0.0025,
            opened_at,
        );
        assert!((position.entry_price - 50_000.0 * 0.9975).abs() < 1e-9);
    }
}
