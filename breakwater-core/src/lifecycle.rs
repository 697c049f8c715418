//! Position lifecycle — exit evaluation, slippage, fees, realized P&L.
//!
//! State machine per position: OPEN -> CLOSED_WIN | CLOSED_LOSS, evaluated
//! once per price observation. Exits are all-or-nothing at the stop or the
//! target; when one observation satisfies both, the stop is checked first
//! (stop precedence on ambiguous bars).

use chrono::{DateTime, Utc};

use crate::domain::{ClosedTrade, ExitReason, Position, Side, TradeResult};
use crate::params::StrategyParams;

/// Which exit condition, if any, the observed price triggers.
///
/// Stop precedence: the stop is tested before the target for both sides.
pub fn exit_trigger(position: &Position, price: f64) -> Option<ExitReason> {
    match position.side {
        Side::Long => {
            if price <= position.stop_loss {
                Some(ExitReason::StopLoss)
            } else if price >= position.take_profit {
                Some(ExitReason::TakeProfit)
            } else {
                None
            }
        }
        Side::Short => {
            if price >= position.stop_loss {
                Some(ExitReason::StopLoss)
            } else if price <= position.take_profit {
                Some(ExitReason::TakeProfit)
            } else {
                None
            }
        }
    }
}

/// Close a position at its stop or target, applying adverse exit slippage and
/// round-trip fees. Returns the trade record; `capital_after` reflects the
/// settled balance.
pub fn close(
    position: &Position,
    reason: ExitReason,
    capital: f64,
    params: &StrategyParams,
    closed_at: DateTime<Utc>,
) -> ClosedTrade {
    let intended_exit = match reason {
        ExitReason::StopLoss => position.stop_loss,
        ExitReason::TakeProfit => position.take_profit,
    };
    // Slippage is adverse: it reduces a long's exit and raises a short's.
    let exit_price = match position.side {
        Side::Long => intended_exit * (1.0 - params.slippage_pct),
        Side::Short => intended_exit * (1.0 + params.slippage_pct),
    };

    let gross_pnl = match position.side {
        Side::Long => position.units * (exit_price - position.entry_price) * position.leverage,
        Side::Short => position.units * (position.entry_price - exit_price) * position.leverage,
    };
    let fees =
        (position.units * position.entry_price + position.units * exit_price) * params.fee_pct;
    let net_pnl = gross_pnl - fees;
    let capital_after = capital + net_pnl;

    ClosedTrade {
        side: position.side,
        entry_price: position.entry_price,
        exit_price,
        stop_loss: position.stop_loss,
        take_profit: position.take_profit,
        units: position.units,
        leverage: position.leverage,
        level_price: position.level_price,
        result: match reason {
            ExitReason::StopLoss => TradeResult::Loss,
            ExitReason::TakeProfit => TradeResult::Win,
        },
        reason,
        net_pnl,
        pnl_pct: if capital_after > 0.0 {
            net_pnl / capital_after * 100.0
        } else {
            0.0
        },
        capital_after,
        opened_at: position.opened_at,
        closed_at,
    }
}

/// Evaluate one price observation: close the position if its stop or target
/// is hit, otherwise leave it open.
pub fn evaluate(
    position: &Position,
    price: f64,
    capital: f64,
    params: &StrategyParams,
    observed_at: DateTime<Utc>,
) -> Option<ClosedTrade> {
    exit_trigger(position, price).map(|reason| close(position, reason, capital, params, observed_at))
}
