//! Position sizer — risk budget to units, with margin cap, funding-rate and
//! liquidation-distance adjustments.
//!
//! Pure function of its inputs. Steps, in order:
//! 1. risk budget = capital x risk-per-trade
//! 2. units = budget / price risk (absent when price risk <= 0)
//! 3. margin cap: capital is a hard ceiling on achievable margin
//! 4. funding adjustment (one branch per side at most)
//! 5. liquidation protection (independent of the funding adjustment; both can
//!    apply in one call)

use crate::domain::{Side, SizingResult};
use crate::params::StrategyParams;

/// Inputs that arrive from boundary collaborators rather than the signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketContext {
    /// Latest traded price, for the liquidation proximity check.
    pub current_price: Option<f64>,
    /// Funding rate per 8h, for the sizing adjustment.
    pub funding_rate: Option<f64>,
}

/// Size a position. Returns `None` when the stop is on the wrong side of the
/// entry (non-positive price risk).
pub fn size(
    capital: f64,
    entry: f64,
    stop_loss: f64,
    side: Side,
    leverage: f64,
    context: MarketContext,
    params: &StrategyParams,
) -> Option<SizingResult> {
    let mut risk_amount = capital * params.risk_per_trade_pct;

    let price_risk = match side {
        Side::Long => entry - stop_loss,
        Side::Short => stop_loss - entry,
    };
    if price_risk <= 0.0 {
        return None;
    }

    let mut units = risk_amount / price_risk;
    let mut notional = units * entry;
    let mut margin = notional / leverage;

    if margin > capital {
        units = (capital * leverage) / entry;
        notional = units * entry;
        margin = notional / leverage;
        risk_amount = units * price_risk / leverage;
    }

    if let Some(rate) = context.funding_rate {
        let factor = match side {
            Side::Long if rate > params.funding_rate_threshold => Some(0.95),
            Side::Long if rate < -params.funding_rate_threshold => Some(1.02),
            Side::Short if rate > 0.0 => Some(1.02),
            _ => None,
        };
        if let Some(factor) = factor {
            units *= factor;
            notional = units * entry;
            margin = notional / leverage;
            risk_amount = units * price_risk / leverage;
        }
    }

    if let Some(price) = context.current_price {
        if near_liquidation(entry, price, side, leverage, params) {
            units *= 0.5;
            notional = units * entry;
            margin = notional / leverage;
            risk_amount = units * price_risk / leverage;
        }
    }

    Some(SizingResult {
        units,
        notional_value: notional,
        margin_required: margin,
        risk_amount,
    })
}

/// Whether the current price already sits within the proximity band of the
/// approximate liquidation price (entry shifted by the margin distance
/// 1/leverage plus a safety buffer).
fn near_liquidation(
    entry: f64,
    current_price: f64,
    side: Side,
    leverage: f64,
    params: &StrategyParams,
) -> bool {
    match side {
        Side::Long => {
            let liquidation = entry * (1.0 - 1.0 / leverage - params.liquidation_buffer_pct);
            current_price <= liquidation * (1.0 + params.liquidation_proximity_pct)
        }
        Side::Short => {
            let liquidation = entry * (1.0 + 1.0 / leverage + params.liquidation_buffer_pct);
            current_price >= liquidation * (1.0 - params.liquidation_proximity_pct)
        }
    }
}
