//! ClosedTrade — a completed round-trip trade record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Side;

/// Whether the trade closed at its target or its stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeResult {
    Win,
    Loss,
}

/// Which exit condition fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
}

/// A complete round-trip trade: position snapshot plus exit accounting.
///
/// Append-only, immutable once created. `exit_price` is the slippage-adjusted
/// fill; `net_pnl` is after round-trip fees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub side: Side,
    pub entry_price: f64,
    pub exit_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub units: f64,
    pub leverage: f64,
    pub level_price: f64,
    pub result: TradeResult,
    pub reason: ExitReason,
    pub net_pnl: f64,
    /// Net P&L as a percentage of capital after the trade settled.
    pub pnl_pct: f64,
    pub capital_after: f64,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
}

impl ClosedTrade {
    pub fn is_winner(&self) -> bool {
        self.result == TradeResult::Win
    }
}
