//! Paper trading — one simulated tick against live market data.
//!
//! A tick is one load-evaluate-save pass: mark the open position against the
//! latest traded price, update the drawdown guard, evaluate the latest
//! candles for a signal, and open a simulated position when one appears and
//! the single slot is free. Virtual fills use the same slippage and fee model
//! as the backtest.

use std::path::{Path, PathBuf};

use breakwater_core::domain::{ClosedTrade, Position, Signal};
use breakwater_core::engine;
use breakwater_core::params::StrategyParams;
use breakwater_core::series::{Series, SeriesError};
use breakwater_core::strategy::{sizing, MarketContext};
use breakwater_core::{guard, lifecycle};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::exchange::{funding_rate_or_default, FetchError, MarketData};
use crate::journal;
use crate::notify::{self, Notifier};
use crate::state::{self, PaperState, StateError};

#[derive(Debug, Error)]
pub enum TickError {
    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("candle fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("data error: {0}")]
    Data(#[from] SeriesError),
}

/// Files and market identity for a paper-trading instance.
#[derive(Debug, Clone)]
pub struct PaperConfig {
    pub symbol: String,
    pub interval: String,
    pub candle_limit: usize,
    pub initial_capital: f64,
    pub state_path: PathBuf,
    pub journal_path: PathBuf,
    pub params: StrategyParams,
}

impl PaperConfig {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            interval: "4h".to_string(),
            candle_limit: 500,
            initial_capital: 1000.0,
            state_path: state_dir.join("paper_state.json"),
            journal_path: state_dir.join("trade_journal.csv"),
            params: StrategyParams::default(),
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Drawdown guard is pausing new entries.
    Paused,
    /// A signal appeared but the position slot is occupied.
    SlotOccupied,
    /// A simulated position was opened.
    Opened(Position),
    /// Nothing actionable; the reason mirrors the evaluation.
    NoSignal(&'static str),
}

/// Result of one tick, including any position settled against the latest
/// price before the signal evaluation ran.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub outcome: TickOutcome,
    pub closed: Option<ClosedTrade>,
    pub capital: f64,
}

/// Run one paper-trading tick.
pub fn run_tick(
    config: &PaperConfig,
    market: &dyn MarketData,
    notifier: &dyn Notifier,
    now: DateTime<Utc>,
) -> Result<TickReport, TickError> {
    let mut paper = state::load::<PaperState>(&config.state_path)?
        .unwrap_or_else(|| PaperState::new(config.initial_capital, now));

    // Mark the open position first: exits are managed even when the guard
    // pauses new entries or the candle fetch later fails.
    let closed = mark_open_position(config, market, notifier, &mut paper, now)?;

    guard::update(&mut paper.equity, &config.params);
    if paper.equity.paused {
        info!(drawdown = paper.equity.drawdown(), "paper tick paused by drawdown guard");
        paper.last_update = now;
        state::save(&config.state_path, &paper)?;
        return Ok(TickReport {
            outcome: TickOutcome::Paused,
            closed,
            capital: paper.equity.capital,
        });
    }

    let raw = market.klines(&config.symbol, &config.interval, config.candle_limit)?;
    let series = Series::from_raw(&raw);
    let evaluation = match engine::evaluate(&series, &config.params) {
        Ok(evaluation) => evaluation,
        Err(err @ SeriesError::Insufficient { .. }) => {
            // Abort this cycle without touching the position slot.
            paper.last_update = now;
            state::save(&config.state_path, &paper)?;
            return Err(err.into());
        }
    };

    let no_signal_reason = evaluation.no_signal_reason();
    let leverage = evaluation.leverage;
    let outcome = match evaluation.signal {
        None => TickOutcome::NoSignal(no_signal_reason.unwrap_or("no signal")),
        Some(signal) if paper.open_position.is_some() => {
            info!(side = %signal.side, "signal ignored: position slot occupied");
            TickOutcome::SlotOccupied
        }
        Some(signal) => open_position(config, market, notifier, &mut paper, leverage, signal, now),
    };

    paper.last_update = now;
    state::save(&config.state_path, &paper)?;
    Ok(TickReport {
        capital: paper.equity.capital,
        outcome,
        closed,
    })
}

/// Check the open position against the latest traded price; settle it when a
/// stop or target is hit. A failed ticker fetch leaves the position open for
/// the next tick.
fn mark_open_position(
    config: &PaperConfig,
    market: &dyn MarketData,
    notifier: &dyn Notifier,
    paper: &mut PaperState,
    now: DateTime<Utc>,
) -> Result<Option<ClosedTrade>, TickError> {
    let Some(position) = &paper.open_position else {
        return Ok(None);
    };
    let price = match market.ticker_price(&config.symbol) {
        Ok(price) => price,
        Err(err) => {
            warn!(error = %err, "ticker fetch failed, skipping exit check this tick");
            return Ok(None);
        }
    };
    let Some(trade) =
        lifecycle::evaluate(position, price, paper.equity.capital, &config.params, now)
    else {
        return Ok(None);
    };

    info!(
        result = ?trade.result,
        pnl = trade.net_pnl,
        capital = trade.capital_after,
        "paper position closed"
    );
    journal::append_non_fatal(&config.journal_path, &trade);
    notify::send_non_fatal(notifier, &notify::format_close(&config.symbol, &trade));
    paper.settle(trade.clone());
    Ok(Some(trade))
}

fn open_position(
    config: &PaperConfig,
    market: &dyn MarketData,
    notifier: &dyn Notifier,
    paper: &mut PaperState,
    leverage: f64,
    signal: Signal,
    now: DateTime<Utc>,
) -> TickOutcome {
    let funding_rate = funding_rate_or_default(market, &config.symbol);
    let current_price = market.ticker_price(&config.symbol).ok();
    let context = MarketContext {
        current_price,
        funding_rate: Some(funding_rate),
    };
    let Some(sized) = sizing::size(
        paper.equity.capital,
        signal.entry,
        signal.stop_loss,
        signal.side,
        leverage,
        context,
        &config.params,
    ) else {
        warn!("signal found but sizing failed (non-positive price risk)");
        return TickOutcome::NoSignal("sizing failed");
    };

    let position = Position::open(
        &signal,
        &sized,
        leverage,
        config.params.slippage_pct,
        now,
    );
    info!(
        side = %position.side,
        entry = position.entry_price,
        stop = position.stop_loss,
        target = position.take_profit,
        units = position.units,
        "paper position opened"
    );
    notify::send_non_fatal(
        notifier,
        &notify::format_open(&config.symbol, &position, paper.equity.capital),
    );
    paper.open_position = Some(position.clone());
    TickOutcome::Opened(position)
}
