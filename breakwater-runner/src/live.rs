//! Live mode — signal generation against live market data.
//!
//! One check is one load-evaluate-save pass over the persisted strategy
//! state. Live mode never tracks positions itself: a found signal is sized,
//! snapshotted for the external monitor, and sent to the alert channel.

use std::path::{Path, PathBuf};

use breakwater_core::domain::{Signal, SizingResult};
use breakwater_core::engine;
use breakwater_core::guard;
use breakwater_core::params::StrategyParams;
use breakwater_core::series::{Series, SeriesError};
use breakwater_core::strategy::{sizing, MarketContext};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::exchange::{funding_rate_or_default, FetchError, MarketData};
use crate::notify::{self, Notifier};
use crate::state::{self, SignalSnapshot, StateError, StrategyState};

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("candle fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("data error: {0}")]
    Data(#[from] SeriesError),
}

/// Files and market identity for the live signal checker.
#[derive(Debug, Clone)]
pub struct LiveConfig {
    pub symbol: String,
    pub interval: String,
    pub candle_limit: usize,
    pub initial_capital: f64,
    pub state_path: PathBuf,
    /// Where the latest signal + sizing snapshot is written for the monitor.
    pub snapshot_path: PathBuf,
    pub params: StrategyParams,
}

impl LiveConfig {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            interval: "4h".to_string(),
            candle_limit: 500,
            initial_capital: 1000.0,
            state_path: state_dir.join("strategy_state.json"),
            snapshot_path: state_dir.join("current_signal.json"),
            params: StrategyParams::default(),
        }
    }
}

/// Outcome of one live check.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Paused,
    NoSignal(&'static str),
    Signal {
        signal: Signal,
        leverage: f64,
        sizing: SizingResult,
    },
}

/// Run one live signal check.
pub fn run_check(
    config: &LiveConfig,
    market: &dyn MarketData,
    notifier: &dyn Notifier,
    now: DateTime<Utc>,
) -> Result<CheckOutcome, CheckError> {
    let mut strategy = state::load::<StrategyState>(&config.state_path)?
        .unwrap_or_else(|| StrategyState::new(config.initial_capital, now));

    guard::update(&mut strategy.equity, &config.params);
    if strategy.equity.paused {
        info!(
            capital = strategy.equity.capital,
            peak = strategy.equity.peak_equity,
            drawdown = strategy.equity.drawdown(),
            "live check paused by drawdown guard"
        );
        strategy.last_update = now;
        state::save(&config.state_path, &strategy)?;
        return Ok(CheckOutcome::Paused);
    }

    let raw = market.klines(&config.symbol, &config.interval, config.candle_limit)?;
    let series = Series::from_raw(&raw);
    let evaluation = engine::evaluate(&series, &config.params)?;

    if let Some(level) = &evaluation.level {
        info!(
            price = level.price,
            age_hours = level.age_hours,
            decay = level.decay_factor,
            "session level"
        );
    }
    info!(trend = ?evaluation.trend.classification, leverage = evaluation.leverage, "regime");

    let no_signal_reason = evaluation.no_signal_reason();
    let leverage = evaluation.leverage;
    let trend = evaluation.trend;
    let outcome = match evaluation.signal {
        None => CheckOutcome::NoSignal(no_signal_reason.unwrap_or("no signal")),
        Some(signal) => {
            let funding_rate = funding_rate_or_default(market, &config.symbol);
            let current_price = series.last().map(|c| c.close);
            let context = MarketContext {
                current_price,
                funding_rate: Some(funding_rate),
            };
            match sizing::size(
                strategy.equity.capital,
                signal.entry,
                signal.stop_loss,
                signal.side,
                leverage,
                context,
                &config.params,
            ) {
                None => {
                    warn!("signal found but sizing failed (non-positive price risk)");
                    CheckOutcome::NoSignal("sizing failed")
                }
                Some(sized) => {
                    let snapshot = SignalSnapshot {
                        symbol: config.symbol.clone(),
                        signal: signal.clone(),
                        leverage,
                        sizing: sized.clone(),
                        saved_at: now,
                    };
                    if let Err(err) = state::save(&config.snapshot_path, &snapshot) {
                        warn!(error = %err, "signal snapshot write failed");
                    }
                    notify::send_non_fatal(
                        notifier,
                        &notify::format_signal(
                            &config.symbol,
                            &signal,
                            &sized,
                            strategy.equity.capital,
                            leverage,
                            &trend,
                        ),
                    );
                    info!(side = %signal.side, entry = signal.entry, "signal emitted");
                    CheckOutcome::Signal {
                        signal,
                        leverage,
                        sizing: sized,
                    }
                }
            }
        }
    };

    strategy.last_update = now;
    state::save(&config.state_path, &strategy)?;
    Ok(outcome)
}
