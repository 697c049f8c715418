//! Historical backtest — replay one series through the engine.
//!
//! One synchronous pass per candle, in the same component order the live and
//! paper modes use: guard update, open-position exit check, then (when
//! unpaused and flat) a signal evaluation over the candle prefix. Exits are
//! evaluated on every candle, paused or not — existing risk is still managed
//! to its stop or target while new entries are suspended.

use breakwater_core::domain::{ClosedTrade, EquityState, Position};
use breakwater_core::engine;
use breakwater_core::params::StrategyParams;
use breakwater_core::series::{Series, SeriesError};
use breakwater_core::strategy::{sizing, MarketContext};
use breakwater_core::{guard, lifecycle};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::metrics::PerformanceMetrics;

#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("data error: {0}")]
    Data(#[from] SeriesError),
}

/// Serializable configuration for one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Flat per-8h funding estimate applied to every sizing call; historical
    /// funding prints are not replayed.
    pub funding_rate_estimate: f64,
    pub params: StrategyParams,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 1000.0,
            funding_rate_estimate: 0.0001,
            params: StrategyParams::default(),
        }
    }
}

impl BacktestConfig {
    /// Deterministic content hash of this configuration. Two runs with equal
    /// configs share a fingerprint and are directly comparable.
    pub fn run_id(&self) -> String {
        let json = serde_json::to_string(self).expect("BacktestConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

/// Complete result of one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub run_id: String,
    pub metrics: PerformanceMetrics,
    pub trades: Vec<ClosedTrade>,
    /// Equity at each evaluated candle close.
    pub equity_curve: Vec<f64>,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub candle_count: usize,
    /// Candidate signals seen, whether or not they were sized and opened.
    pub signal_count: usize,
    /// Candles skipped for new entries by the drawdown guard.
    pub paused_candles: usize,
}

/// Run a backtest over a pre-loaded series. No I/O.
pub fn run(series: &Series, config: &BacktestConfig) -> Result<BacktestReport, BacktestError> {
    let params = &config.params;
    // One candle beyond the decision minimum so at least one evaluation runs.
    series.require_min(params.min_history + 1)?;
    let candles = series.candles();

    let mut equity = EquityState::new(config.initial_capital);
    let mut open_position: Option<Position> = None;
    let mut trades: Vec<ClosedTrade> = Vec::new();
    let mut equity_curve: Vec<f64> = Vec::with_capacity(candles.len() - params.min_history);
    let mut signal_count = 0usize;
    let mut paused_candles = 0usize;

    for i in params.min_history..candles.len() {
        let current = &candles[i];
        let price = current.close;

        match guard::update(&mut equity, params) {
            guard::GuardTransition::Paused => {
                info!(candle = i, drawdown = equity.drawdown(), "drawdown pause")
            }
            guard::GuardTransition::Resumed => info!(candle = i, "drawdown resume"),
            guard::GuardTransition::Unchanged => {}
        }

        // Lifecycle first: open risk is managed on every candle.
        if let Some(position) = &open_position {
            if let Some(trade) =
                lifecycle::evaluate(position, price, equity.capital, params, current.open_time)
            {
                debug!(candle = i, result = ?trade.result, pnl = trade.net_pnl, "position closed");
                equity.capital = trade.capital_after;
                trades.push(trade);
                open_position = None;
                equity_curve.push(equity.capital);
                continue;
            }
        }

        if equity.paused {
            paused_candles += 1;
            equity_curve.push(equity.capital);
            continue;
        }

        // New entries: one position slot, never on the final candle (its
        // close has no subsequent observation to manage the position on).
        if open_position.is_none() && i + 1 < candles.len() {
            let evaluation = engine::evaluate_slice(&candles[..=i], params);
            if let Some(signal) = evaluation.signal {
                signal_count += 1;
                let context = MarketContext {
                    current_price: Some(price),
                    funding_rate: Some(config.funding_rate_estimate),
                };
                if let Some(sized) = sizing::size(
                    equity.capital,
                    signal.entry,
                    signal.stop_loss,
                    signal.side,
                    evaluation.leverage,
                    context,
                    params,
                ) {
                    open_position = Some(Position::open(
                        &signal,
                        &sized,
                        evaluation.leverage,
                        params.slippage_pct,
                        current.open_time,
                    ));
                }
            }
        }

        equity_curve.push(equity.capital);
    }

    let metrics = PerformanceMetrics::compute(&equity_curve, &trades);
    Ok(BacktestReport {
        run_id: config.run_id(),
        metrics,
        final_capital: equity.capital,
        initial_capital: config.initial_capital,
        candle_count: candles.len(),
        signal_count,
        paused_candles,
        trades,
        equity_curve,
    })
}
