//! Series preprocessor — raw exchange records to a canonical candle series.
//!
//! Exchange klines arrive with numeric fields as either JSON numbers or
//! strings, in no guaranteed order. Canonicalization coerces every field to
//! f64, drops rows that fail coercion (one bad row must not fail the batch),
//! and sorts ascending by open time. No dedup guarantee is made.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Candle;

/// Errors from series construction and minimum-length preconditions.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("insufficient data: {have} candles < minimum {need}")]
    Insufficient { have: usize, need: usize },
}

/// A raw candle record as delivered by the exchange.
///
/// Numeric fields are untyped JSON values (number-or-string); `open_time` is
/// epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCandle {
    pub open_time: i64,
    pub open: serde_json::Value,
    pub high: serde_json::Value,
    pub low: serde_json::Value,
    pub close: serde_json::Value,
    pub volume: serde_json::Value,
}

/// Coerce a JSON number-or-string to f64. Anything else is a dropped row.
fn coerce_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Canonical ordered candle series.
///
/// Owned by the preprocessing boundary and read-only downstream. Consumers
/// enforce their own minimum lengths via [`Series::require_min`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    candles: Vec<Candle>,
}

impl Series {
    /// Build a series from already-typed candles, restoring ascending order.
    pub fn from_candles(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.open_time);
        Self { candles }
    }

    /// Canonicalize raw exchange records: coerce numerics, drop invalid rows,
    /// sort ascending by open time.
    pub fn from_raw(raw: &[RawCandle]) -> Self {
        let candles = raw
            .iter()
            .filter_map(|r| {
                let open_time = match Utc.timestamp_millis_opt(r.open_time) {
                    chrono::LocalResult::Single(t) => t,
                    _ => return None,
                };
                Some(Candle {
                    open_time,
                    open: coerce_f64(&r.open)?,
                    high: coerce_f64(&r.high)?,
                    low: coerce_f64(&r.low)?,
                    close: coerce_f64(&r.close)?,
                    volume: coerce_f64(&r.volume)?,
                })
            })
            .collect();
        Self::from_candles(candles)
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Enforce a consumer's minimum-length precondition.
    pub fn require_min(&self, need: usize) -> Result<(), SeriesError> {
        if self.candles.len() < need {
            return Err(SeriesError::Insufficient {
                have: self.candles.len(),
                need,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(open_time: i64, close: serde_json::Value) -> RawCandle {
        RawCandle {
            open_time,
            open: json!("100.0"),
            high: json!(105.0),
            low: json!("95.0"),
            close,
            volume: json!(1000),
        }
    }

    #[test]
    fn coerces_strings_and_numbers() {
        let series = Series::from_raw(&[raw(1_700_000_000_000, json!("101.5"))]);
        assert_eq!(series.len(), 1);
        let candle = &series.candles()[0];
        assert_eq!(candle.open, 100.0);
        assert_eq!(candle.high, 105.0);
        assert_eq!(candle.close, 101.5);
        assert_eq!(candle.volume, 1000.0);
    }

    #[test]
    fn drops_invalid_rows_without_failing_batch() {
        let series = Series::from_raw(&[
            raw(1_700_000_000_000, json!("101.5")),
            raw(1_700_000_100_000, json!("not-a-number")),
            raw(1_700_000_200_000, json!(null)),
            raw(1_700_000_300_000, json!(102.0)),
        ]);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn sorts_ascending_by_open_time() {
        let series = Series::from_raw(&[
            raw(1_700_000_200_000, json!(3.0)),
            raw(1_700_000_000_000, json!(1.0)),
            raw(1_700_000_100_000, json!(2.0)),
        ]);
        let closes: Vec<f64> = series.candles().iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn require_min_reports_counts() {
        let series = Series::from_raw(&[raw(1_700_000_000_000, json!(1.0))]);
        let err = series.require_min(100).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::Insufficient { have: 1, need: 100 }
        ));
        assert!(series.require_min(1).is_ok());
    }
}
