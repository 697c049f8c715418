//! Breakwater Core — session-level breakout engine.
//!
//! The decision core shared by all three execution modes (live signal
//! checks, paper trading, backtesting):
//! - Domain types (candles, levels, signals, positions, trades, equity)
//! - Series preprocessing and on-demand indicators (ATR, EMA)
//! - Strategy components: level engine with decay, trend filter, breakout
//!   detection with confirmation, volume confirmation, volatility-mapped
//!   leverage, risk-budget position sizing
//! - Position lifecycle (stop/target exits with slippage and fees)
//! - Drawdown guard
//!
//! Everything here is synchronous and I/O-free; collaborators (candle source,
//! funding source, persistence, notification) live in the runner crate.

pub mod domain;
pub mod engine;
pub mod guard;
pub mod indicators;
pub mod lifecycle;
pub mod params;
pub mod series;
pub mod strategy;
