//! Trade journal — append-only CSV log of closed trades.
//!
//! Write failures are non-fatal: the journal is an external convenience, not
//! part of the strategy's state. Callers go through [`append_non_fatal`] in
//! the execution loops.

use std::path::{Path, PathBuf};

use breakwater_core::domain::ClosedTrade;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("journal io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("journal encode error: {0}")]
    Encode(String),
}

/// One journal row. Flattened from a ClosedTrade so the CSV stays stable even
/// if the domain type grows.
#[derive(Debug, Serialize)]
struct JournalRow<'a> {
    timestamp: String,
    side: &'a str,
    level: f64,
    entry: f64,
    stop_loss: f64,
    take_profit: f64,
    exit: f64,
    result: &'a str,
    pnl: f64,
    pnl_pct: f64,
    capital_after: f64,
    leverage: f64,
    units: f64,
}

impl<'a> JournalRow<'a> {
    fn from_trade(trade: &'a ClosedTrade) -> Self {
        Self {
            timestamp: trade.closed_at.to_rfc3339(),
            side: trade.side.as_str(),
            level: trade.level_price,
            entry: trade.entry_price,
            stop_loss: trade.stop_loss,
            take_profit: trade.take_profit,
            exit: trade.exit_price,
            result: match trade.result {
                breakwater_core::domain::TradeResult::Win => "WIN",
                breakwater_core::domain::TradeResult::Loss => "LOSS",
            },
            pnl: trade.net_pnl,
            pnl_pct: trade.pnl_pct,
            capital_after: trade.capital_after,
            leverage: trade.leverage,
            units: trade.units,
        }
    }
}

/// Append one trade, writing the header only when the file is new.
pub fn append(path: &Path, trade: &ClosedTrade) -> Result<(), JournalError> {
    let exists = path.exists();
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| JournalError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(!exists)
        .from_writer(file);
    writer
        .serialize(JournalRow::from_trade(trade))
        .map_err(|e| JournalError::Encode(e.to_string()))?;
    writer
        .flush()
        .map_err(|source| JournalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

/// Append, demoting any failure to a warning.
pub fn append_non_fatal(path: &Path, trade: &ClosedTrade) {
    if let Err(err) = append(path, trade) {
        warn!(error = %err, "trade journal write failed");
    }
}
