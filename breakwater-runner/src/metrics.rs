//! Performance metrics — pure functions over the equity curve and trade list.
//!
//! No dependencies on the execution loops: equity curve and/or trades in,
//! scalars out.

use breakwater_core::domain::ClosedTrade;
use serde::{Deserialize, Serialize};

/// Aggregate performance metrics for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub avg_win_loss_ratio: f64,
    pub trade_count: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
}

impl PerformanceMetrics {
    pub fn compute(equity_curve: &[f64], trades: &[ClosedTrade]) -> Self {
        let winning_trades = trades.iter().filter(|t| t.is_winner()).count();
        Self {
            total_return: total_return(equity_curve),
            max_drawdown: max_drawdown(equity_curve),
            win_rate: win_rate(trades),
            profit_factor: profit_factor(trades),
            avg_win_loss_ratio: avg_win_loss_ratio(trades),
            trade_count: trades.len(),
            winning_trades,
            losing_trades: trades.len() - winning_trades,
        }
    }
}

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let initial = equity_curve[0];
    if initial <= 0.0 {
        return 0.0;
    }
    (equity_curve[equity_curve.len() - 1] - initial) / initial
}

/// Deepest peak-to-trough decline as a fraction (<= 0).
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst = 0.0f64;
    for &equity in equity_curve {
        if equity > peak {
            peak = equity;
        }
        if peak > 0.0 {
            worst = worst.min((equity - peak) / peak);
        }
    }
    worst
}

/// Fraction of trades closed at their target.
pub fn win_rate(trades: &[ClosedTrade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    trades.iter().filter(|t| t.is_winner()).count() as f64 / trades.len() as f64
}

/// Gross wins over gross losses. Infinite with wins and no losses; 0 with no
/// trades.
pub fn profit_factor(trades: &[ClosedTrade]) -> f64 {
    let wins: f64 = trades.iter().filter(|t| t.is_winner()).map(|t| t.net_pnl).sum();
    let losses: f64 = trades
        .iter()
        .filter(|t| !t.is_winner())
        .map(|t| t.net_pnl.abs())
        .sum();
    if losses > 0.0 {
        wins / losses
    } else if wins > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Average winning trade over average losing trade (realized R:R). Zero when
/// either side is empty.
pub fn avg_win_loss_ratio(trades: &[ClosedTrade]) -> f64 {
    let wins: Vec<f64> = trades.iter().filter(|t| t.is_winner()).map(|t| t.net_pnl).collect();
    let losses: Vec<f64> = trades
        .iter()
        .filter(|t| !t.is_winner())
        .map(|t| t.net_pnl.abs())
        .collect();
    if wins.is_empty() || losses.is_empty() {
        return 0.0;
    }
    let avg_win = wins.iter().sum::<f64>() / wins.len() as f64;
    let avg_loss = losses.iter().sum::<f64>() / losses.len() as f64;
    if avg_loss > 0.0 {
        avg_win / avg_loss
    } else {
        0.0
    }
}
