//! Strategy parameters — one immutable value passed into every component.
//!
//! Defaults carry the production parameter set. A runner may deserialize
//! overrides from TOML; components never read ambient state.

use serde::{Deserialize, Serialize};

/// Breakout confirmation mode (A/B toggle, never mixed within a cycle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfirmationMode {
    /// Crossing on the prior candle, continuation required on the current one.
    TwoCandle,
    /// Crossing and confirmation on the current candle, with an intrabar
    /// push-through requirement.
    SingleCandle,
}

/// Complete parameter set for one strategy instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Hour-of-day (UTC) whose candle close defines the session level.
    pub session_close_hour_utc: u32,
    /// Minimum breakout magnitude relative to the level (fraction).
    pub breakout_confirmation_pct: f64,
    /// Floor on the stop distance as a fraction of entry.
    pub min_stop_pct: f64,
    /// Target distance as a multiple of the stop distance.
    pub take_profit_multiplier: f64,
    pub base_leverage: f64,
    pub min_leverage: f64,
    pub max_leverage: f64,
    /// Levels younger than this are visible but not tradable.
    pub min_level_age_hours: f64,
    /// Age past which the stale decay applies.
    pub decay_onset_hours: f64,
    /// Fraction of risk weight removed from levels past the decay onset.
    pub stale_level_decay: f64,
    /// Levels older than this are absent unless retested.
    pub expiry_hours: f64,
    /// Retest proximity band around the level price (fraction).
    pub retest_proximity_pct: f64,
    /// Fraction of capital risked per trade.
    pub risk_per_trade_pct: f64,
    /// Breakout volume must exceed the trailing average by this multiple.
    pub volume_confirmation_multiplier: f64,
    /// Trailing window for the average-volume baseline.
    pub volume_lookback: usize,
    pub ema_short: usize,
    pub ema_long: usize,
    pub atr_period: usize,
    /// Normalized ATR above this (percent of price) pins leverage to minimum.
    pub high_volatility_atr_pct: f64,
    /// Normalized ATR below this (percent of price) pins leverage to maximum.
    pub low_volatility_atr_pct: f64,
    /// Funding rate magnitude (per 8h) beyond which long sizing adjusts.
    pub funding_rate_threshold: f64,
    /// Safety margin added to the approximate liquidation distance.
    pub liquidation_buffer_pct: f64,
    /// Proximity band around the liquidation price that halves the position.
    pub liquidation_proximity_pct: f64,
    /// Pause when drawdown from peak reaches this fraction.
    pub drawdown_pause_threshold: f64,
    /// Resume when capital recovers to this fraction of peak.
    pub drawdown_resume_threshold: f64,
    pub confirmation: ConfirmationMode,
    /// Adverse fill slippage applied to entries and exits (fraction).
    pub slippage_pct: f64,
    /// Exchange fee per leg, on notional (fraction).
    pub fee_pct: f64,
    /// Minimum candle history before any decision is made.
    pub min_history: usize,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            session_close_hour_utc: 0,
            breakout_confirmation_pct: 0.001,
            min_stop_pct: 0.004,
            take_profit_multiplier: 3.5,
            base_leverage: 3.5,
            min_leverage: 2.0,
            max_leverage: 4.0,
            min_level_age_hours: 6.0,
            decay_onset_hours: 24.0,
            stale_level_decay: 0.25,
            expiry_hours: 72.0,
            retest_proximity_pct: 0.002,
            risk_per_trade_pct: 0.003,
            volume_confirmation_multiplier: 1.2,
            volume_lookback: 20,
            ema_short: 20,
            ema_long: 50,
            atr_period: 14,
            high_volatility_atr_pct: 2.0,
            low_volatility_atr_pct: 0.8,
            funding_rate_threshold: 0.001,
            liquidation_buffer_pct: 0.005,
            liquidation_proximity_pct: 0.02,
            drawdown_pause_threshold: 0.20,
            drawdown_resume_threshold: 0.95,
            confirmation: ConfirmationMode::TwoCandle,
            slippage_pct: 0.0025,
            fee_pct: 0.001,
            min_history: 100,
        }
    }
}
