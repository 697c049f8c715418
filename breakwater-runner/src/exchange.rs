//! Market data trait and the MEXC REST implementation.
//!
//! The `MarketData` trait abstracts the exchange so execution modes can swap
//! in fakes for tests and replays. Fetch failures are structured errors; the
//! funding rate alone degrades to a default (0.0) because it is an optional
//! sizing input, while a candle failure aborts the cycle.

use std::time::Duration;

use breakwater_core::series::RawCandle;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Structured errors for exchange operations.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("response format changed: {0}")]
    ResponseFormat(String),

    #[error("exchange returned status {0}")]
    Status(u16),
}

/// Boundary collaborator: produces candles, the latest traded price, and the
/// current funding rate for one symbol.
pub trait MarketData {
    /// A finite ordered batch of recent klines.
    fn klines(&self, symbol: &str, interval: &str, limit: usize)
        -> Result<Vec<RawCandle>, FetchError>;

    /// Latest traded price.
    fn ticker_price(&self, symbol: &str) -> Result<f64, FetchError>;

    /// Current funding rate per 8h. Implementations may fail; callers use
    /// [`funding_rate_or_default`] for the degraded-mode default.
    fn funding_rate(&self, symbol: &str) -> Result<f64, FetchError>;
}

/// Funding rate with the degraded-mode default: a failed fetch is worth a
/// warning, never an aborted cycle.
pub fn funding_rate_or_default(market: &dyn MarketData, symbol: &str) -> f64 {
    match market.funding_rate(symbol) {
        Ok(rate) => rate,
        Err(err) => {
            warn!(%symbol, error = %err, "funding rate fetch failed, defaulting to 0");
            0.0
        }
    }
}

/// Blocking REST client for the MEXC spot API.
pub struct MexcRest {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl MexcRest {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.mexc.com/api/v3";

    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Client against an explicit base URL (tests point this at a local stub).
    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(format!("{}/{path}", self.base_url))
            .query(query)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        response
            .json::<Value>()
            .map_err(|e| FetchError::ResponseFormat(e.to_string()))
    }
}

impl MarketData for MexcRest {
    fn klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<RawCandle>, FetchError> {
        let body = self.get_json(
            "klines",
            &[
                ("symbol", symbol.to_string()),
                ("interval", interval.to_string()),
                ("limit", limit.to_string()),
            ],
        )?;
        parse_klines(&body)
    }

    fn ticker_price(&self, symbol: &str) -> Result<f64, FetchError> {
        let body = self.get_json("ticker/price", &[("symbol", symbol.to_string())])?;
        body.get("price")
            .and_then(coerce_value_f64)
            .ok_or_else(|| FetchError::ResponseFormat("ticker missing price".into()))
    }

    fn funding_rate(&self, symbol: &str) -> Result<f64, FetchError> {
        let body = self.get_json("funding-rate", &[("symbol", symbol.to_string())])?;
        parse_funding_rate(&body)
            .ok_or_else(|| FetchError::ResponseFormat("funding rate missing".into()))
    }
}

/// Kline rows arrive as arrays: [open_time, open, high, low, close, volume, ...].
/// Rows without a numeric open time are dropped; numeric fields stay untyped
/// for the series preprocessor to coerce.
fn parse_klines(body: &Value) -> Result<Vec<RawCandle>, FetchError> {
    let rows = body
        .as_array()
        .ok_or_else(|| FetchError::ResponseFormat("klines payload is not an array".into()))?;
    Ok(rows
        .iter()
        .filter_map(|row| {
            let fields = row.as_array()?;
            Some(RawCandle {
                open_time: fields.first()?.as_i64()?,
                open: fields.get(1)?.clone(),
                high: fields.get(2)?.clone(),
                low: fields.get(3)?.clone(),
                close: fields.get(4)?.clone(),
                volume: fields.get(5)?.clone(),
            })
        })
        .collect())
}

/// The funding endpoint answers either a single object or a list with the
/// most recent entry first.
fn parse_funding_rate(body: &Value) -> Option<f64> {
    let entry = match body {
        Value::Array(list) => list.first()?,
        other => other,
    };
    entry.get("fundingRate").and_then(coerce_value_f64)
}

fn coerce_value_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_kline_rows() {
        let body = json!([
            [1_700_000_000_000i64, "50000.1", "50100.0", "49900.0", "50050.5", "123.4", 1_700_014_399_999i64],
            [1_700_014_400_000i64, 50050.5, 50200.0, 50000.0, 50150.0, 98.7, 1_700_028_799_999i64],
        ]);
        let rows = parse_klines(&body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].open_time, 1_700_000_000_000);
        assert_eq!(rows[0].close, json!("50050.5"));
        assert_eq!(rows[1].close, json!(50150.0));
    }

    #[test]
    fn malformed_kline_rows_are_dropped() {
        let body = json!([
            [1_700_000_000_000i64, "1", "2", "3", "4", "5"],
            ["not-a-timestamp", "1", "2", "3", "4", "5"],
            [1_700_014_400_000i64, "1", "2"],
        ]);
        let rows = parse_klines(&body).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn non_array_kline_payload_is_an_error() {
        assert!(parse_klines(&json!({"error": "down"})).is_err());
    }

    #[test]
    fn funding_rate_from_object_or_list() {
        assert_eq!(
            parse_funding_rate(&json!({"fundingRate": "0.0003"})),
            Some(0.0003)
        );
        assert_eq!(
            parse_funding_rate(&json!([{"fundingRate": -0.0012}, {"fundingRate": 0.01}])),
            Some(-0.0012)
        );
        assert_eq!(parse_funding_rate(&json!([])), None);
    }
}
