//! Persisted state snapshots — JSON save/load across runs.
//!
//! Each run is load-evaluate-save over an exclusively-owned snapshot file.
//! Absent-on-first-run is a valid state and initializes defaults; a corrupt
//! snapshot is a contract violation that surfaces loudly instead of being
//! silently replaced. Writes go through a temp file and rename so a crashed
//! run never leaves a half-written snapshot behind.

use std::path::{Path, PathBuf};

use breakwater_core::domain::{ClosedTrade, EquityState, Position, Signal, SizingResult};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt state snapshot at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// Live-mode strategy state: capital and the drawdown guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyState {
    pub equity: EquityState,
    pub last_update: DateTime<Utc>,
}

impl StrategyState {
    pub fn new(initial_capital: f64, now: DateTime<Utc>) -> Self {
        Self {
            equity: EquityState::new(initial_capital),
            last_update: now,
        }
    }
}

/// Paper-trading state: equity, the single open-position slot, and the
/// closed-trade history with its running counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperState {
    pub equity: EquityState,
    /// Single slot by design: new signals are ignored while it is occupied.
    pub open_position: Option<Position>,
    pub closed_trades: Vec<ClosedTrade>,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub total_pnl: f64,
    pub last_update: DateTime<Utc>,
}

impl PaperState {
    pub fn new(initial_capital: f64, now: DateTime<Utc>) -> Self {
        Self {
            equity: EquityState::new(initial_capital),
            open_position: None,
            closed_trades: Vec::new(),
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            total_pnl: 0.0,
            last_update: now,
        }
    }

    /// Fold a settled trade into capital, counters, and history.
    pub fn settle(&mut self, trade: ClosedTrade) {
        self.equity.capital = trade.capital_after;
        self.total_pnl += trade.net_pnl;
        self.total_trades += 1;
        if trade.is_winner() {
            self.winning_trades += 1;
        } else {
            self.losing_trades += 1;
        }
        self.closed_trades.push(trade);
        self.open_position = None;
    }
}

/// Snapshot of the latest live signal and its sizing, written for the
/// external position monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub symbol: String,
    pub signal: Signal,
    pub leverage: f64,
    pub sizing: SizingResult,
    pub saved_at: DateTime<Utc>,
}

/// Load a snapshot. `Ok(None)` when the file does not exist; corrupt content
/// is an error, never a silent default.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StateError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(StateError::Io {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|err| StateError::Corrupt {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
}

/// Save a snapshot atomically: write a sibling temp file, then rename over
/// the target.
pub fn save<T: Serialize>(path: &Path, state: &T) -> Result<(), StateError> {
    let io_err = |source| StateError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let json = serde_json::to_string_pretty(state).map_err(|err| StateError::Corrupt {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn missing_file_is_none() {
        let dir = std::env::temp_dir().join("breakwater_state_missing");
        let loaded: Option<StrategyState> = load(&dir.join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn roundtrip_strategy_state() {
        let dir = std::env::temp_dir().join("breakwater_state_roundtrip");
        let path = dir.join("strategy_state.json");

        let mut state = StrategyState::new(1000.0, now());
        state.equity.capital = 1234.5;
        state.equity.peak_equity = 1300.0;
        save(&path, &state).unwrap();

        let loaded: StrategyState = load(&path).unwrap().unwrap();
        assert_eq!(loaded, state);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_snapshot_is_loud() {
        let dir = std::env::temp_dir().join("breakwater_state_corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("strategy_state.json");
        std::fs::write(&path, "{not json").unwrap();

        let result: Result<Option<StrategyState>, _> = load(&path);
        assert!(matches!(result, Err(StateError::Corrupt { .. })));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn settle_updates_counters_and_slot() {
        use breakwater_core::domain::{ExitReason, Side, TradeResult};

        let mut state = PaperState::new(1000.0, now());
        state.open_position = Some(Position {
            side: Side::Long,
            entry_price: 50_000.0,
            stop_loss: 49_800.0,
            take_profit: 50_700.0,
            units: 0.015,
            leverage: 3.5,
            margin_required: 214.29,
            level_price: 50_000.0,
            opened_at: now(),
        });
        state.settle(ClosedTrade {
            side: Side::Long,
            entry_price: 50_000.0,
            exit_price: 50_573.25,
            stop_loss: 49_800.0,
            take_profit: 50_700.0,
            units: 0.015,
            leverage: 3.5,
            level_price: 50_000.0,
            result: TradeResult::Win,
            reason: ExitReason::TakeProfit,
            net_pnl: 28.59,
            pnl_pct: 2.78,
            capital_after: 1028.59,
            opened_at: now(),
            closed_at: now(),
        });

        assert!(state.open_position.is_none());
        assert_eq!(state.total_trades, 1);
        assert_eq!(state.winning_trades, 1);
        assert_eq!(state.losing_trades, 0);
        assert_eq!(state.equity.capital, 1028.59);
        assert_eq!(state.closed_trades.len(), 1);
    }
}
