//! Breakout detector — level-crossing detection with confirmation.
//!
//! Two modes behind one interface (distinct strategies, selected by
//! configuration and never mixed within a cycle):
//!
//! - Two-candle confirmation (default): the crossing happens on the prior
//!   candle and the current candle must continue the move beyond the prior
//!   close.
//! - Single-candle: crossing and confirmation on the current candle, with an
//!   intrabar requirement that its extreme reaches the entry buffer beyond
//!   the level.
//!
//! Entry is offset from the level by half the confirmation percentage in the
//! breakout direction (a limit order fills marginally beyond the level on the
//! push-through). Stop distance = max(entry-to-level distance, minimum stop)
//! scaled by the level's decay factor; target = stop distance times the
//! reward multiplier.

use crate::domain::{Candle, Level, Side, Signal, TrendState};
use crate::params::{ConfirmationMode, StrategyParams};
use crate::strategy::volume;

/// Scan the most recent candles for a confirmed breakout of `level`.
///
/// Returns `None` when the level is not tradable, the trend filter disallows
/// the breakout direction, or the confirmation magnitude is not met. Volume
/// confirmation is computed and recorded but never gates emission.
pub fn detect(
    candles: &[Candle],
    level: &Level,
    trend: &TrendState,
    params: &StrategyParams,
) -> Option<Signal> {
    if !level.valid {
        return None;
    }
    match params.confirmation {
        ConfirmationMode::TwoCandle => detect_two_candle(candles, level, trend, params),
        ConfirmationMode::SingleCandle => detect_single_candle(candles, level, trend, params),
    }
}

fn detect_two_candle(
    candles: &[Candle],
    level: &Level,
    trend: &TrendState,
    params: &StrategyParams,
) -> Option<Signal> {
    if candles.len() < 3 {
        return None;
    }
    let n = candles.len();
    let prior_prior = &candles[n - 3];
    let prior = &candles[n - 2];
    let current = &candles[n - 1];
    let level_price = level.price;

    // Crossing on the prior candle, continuation on the current one.
    if prior_prior.close <= level_price && prior.close > level_price {
        if current.close <= prior.close {
            return None;
        }
        let magnitude = (prior.close - level_price) / level_price;
        emit(
            Side::Long,
            magnitude,
            volume::confirmed_at(candles, n - 2, params),
            current,
            level,
            trend,
            params,
        )
    } else if prior_prior.close >= level_price && prior.close < level_price {
        if current.close >= prior.close {
            return None;
        }
        let magnitude = (level_price - prior.close) / level_price;
        emit(
            Side::Short,
            magnitude,
            volume::confirmed_at(candles, n - 2, params),
            current,
            level,
            trend,
            params,
        )
    } else {
        None
    }
}

fn detect_single_candle(
    candles: &[Candle],
    level: &Level,
    trend: &TrendState,
    params: &StrategyParams,
) -> Option<Signal> {
    if candles.len() < 2 {
        return None;
    }
    let n = candles.len();
    let prior = &candles[n - 2];
    let current = &candles[n - 1];
    let level_price = level.price;
    let buffer = params.breakout_confirmation_pct * 0.5;

    if prior.close <= level_price && current.close > level_price {
        let magnitude = (current.close - level_price) / level_price;
        // Intrabar push-through: the high must reach the entry buffer.
        if current.high < level_price * (1.0 + buffer) {
            return None;
        }
        emit(
            Side::Long,
            magnitude,
            volume::confirmed_at(candles, n - 1, params),
            current,
            level,
            trend,
            params,
        )
    } else if prior.close >= level_price && current.close < level_price {
        let magnitude = (level_price - current.close) / level_price;
        if current.low > level_price * (1.0 - buffer) {
            return None;
        }
        emit(
            Side::Short,
            magnitude,
            volume::confirmed_at(candles, n - 1, params),
            current,
            level,
            trend,
            params,
        )
    } else {
        None
    }
}

/// Shared gate and price arithmetic for both modes.
fn emit(
    side: Side,
    magnitude: f64,
    volume_confirmed: bool,
    current: &Candle,
    level: &Level,
    trend: &TrendState,
    params: &StrategyParams,
) -> Option<Signal> {
    if magnitude < params.breakout_confirmation_pct {
        return None;
    }
    if !trend.allows(side) {
        return None;
    }

    let offset = params.breakout_confirmation_pct * 0.5;
    let (entry, stop_loss, take_profit, risk_distance) = match side {
        Side::Long => {
            let entry = level.price * (1.0 + offset);
            let risk = (entry - level.price).max(entry * params.min_stop_pct) * level.decay_factor;
            (
                entry,
                entry - risk,
                entry + risk * params.take_profit_multiplier,
                risk,
            )
        }
        Side::Short => {
            let entry = level.price * (1.0 - offset);
            let risk = (level.price - entry).max(entry * params.min_stop_pct) * level.decay_factor;
            (
                entry,
                entry + risk,
                entry - risk * params.take_profit_multiplier,
                risk,
            )
        }
    };

    Some(Signal {
        side,
        entry,
        stop_loss,
        take_profit,
        risk_pct: risk_distance / entry * 100.0,
        reward_pct: risk_distance * params.take_profit_multiplier / entry * 100.0,
        level_price: level.price,
        breakout_magnitude_pct: magnitude * 100.0,
        volume_confirmed,
        trend_aligned: true,
        decay_applied: level.decay_applied(),
        signal_time: current.open_time,
    })
}
