//! Breakwater Runner — execution modes and boundary collaborators.
//!
//! This crate builds on `breakwater-core` to provide:
//! - The three execution modes: live signal checks, paper-trading ticks, and
//!   historical backtests — each a thin shell over the shared engine
//! - Exchange REST client (candles, ticker, funding rate) behind a trait
//! - Persisted state snapshots (strategy state, paper state, signal snapshot)
//! - Append-only CSV trade journal
//! - Notification sink (Telegram or no-op)
//! - Performance metrics and a synthetic data generator for offline runs

pub mod backtest;
pub mod exchange;
pub mod journal;
pub mod live;
pub mod metrics;
pub mod notify;
pub mod paper;
pub mod state;
pub mod synthetic;

pub use backtest::{BacktestConfig, BacktestError, BacktestReport};
pub use exchange::{FetchError, MarketData, MexcRest};
pub use live::{CheckError, CheckOutcome, LiveConfig};
pub use metrics::PerformanceMetrics;
pub use notify::{NoopNotifier, Notifier, TelegramNotifier};
pub use paper::{PaperConfig, TickError, TickOutcome, TickReport};
pub use state::{PaperState, SignalSnapshot, StateError, StrategyState};
pub use synthetic::{generate, SyntheticConfig};
