//! Paper-trading tick tests with fake collaborators.

use std::cell::RefCell;
use std::path::Path;

use breakwater_core::series::RawCandle;
use breakwater_runner::exchange::{FetchError, MarketData};
use breakwater_runner::notify::{Notifier, NotifyError};
use breakwater_runner::paper::{run_tick, PaperConfig, TickError, TickOutcome};
use breakwater_runner::state::{self, PaperState};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

struct FakeMarket {
    candles: Vec<RawCandle>,
    price: f64,
    funding_rate: f64,
    fail_klines: bool,
}

impl MarketData for FakeMarket {
    fn klines(&self, _: &str, _: &str, _: usize) -> Result<Vec<RawCandle>, FetchError> {
        if self.fail_klines {
            return Err(FetchError::Network("connection refused".into()));
        }
        Ok(self.candles.clone())
    }

    fn ticker_price(&self, _: &str) -> Result<f64, FetchError> {
        Ok(self.price)
    }

    fn funding_rate(&self, _: &str) -> Result<f64, FetchError> {
        Ok(self.funding_rate)
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: RefCell<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn send(&self, message: &str) -> Result<(), NotifyError> {
        self.messages.borrow_mut().push(message.to_string());
        Ok(())
    }
}

/// Raw 4h candles from midnight UTC with a two-candle long breakout of the
/// 50_000 session level at the tail.
fn breakout_candles() -> Vec<RawCandle> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut closes: Vec<f64> = vec![50_000.0; 120];
    for c in closes.iter_mut().skip(115) {
        *c = 49_900.0;
    }
    closes[118] = 50_100.0;
    closes[119] = 50_200.0;

    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            RawCandle {
                open_time: (base + Duration::hours(4 * i as i64)).timestamp_millis(),
                open: json!(open.to_string()),
                high: json!((open.max(close) + 10.0).to_string()),
                low: json!((open.min(close) - 10.0).to_string()),
                close: json!(close.to_string()),
                volume: json!("1000.0"),
            }
        })
        .collect()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 21, 0, 0, 0).unwrap()
}

fn config(dir: &Path) -> PaperConfig {
    PaperConfig::new(dir)
}

#[test]
fn tick_opens_position_on_breakout() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let market = FakeMarket {
        candles: breakout_candles(),
        price: 50_200.0,
        funding_rate: 0.0001,
        fail_klines: false,
    };
    let notifier = RecordingNotifier::default();

    let report = run_tick(&config, &market, &notifier, now()).unwrap();
    let TickOutcome::Opened(position) = &report.outcome else {
        panic!("expected an opened position, got {:?}", report.outcome);
    };
    assert!(report.closed.is_none());
    // Entry slippage pushes the long fill above the signal entry (50_025).
    assert!(position.entry_price > 50_025.0);

    // The slot is persisted.
    let saved: PaperState = state::load(&config.state_path).unwrap().unwrap();
    assert!(saved.open_position.is_some());
    assert_eq!(notifier.messages.borrow().len(), 1);
    assert!(notifier.messages.borrow()[0].contains("PAPER OPEN LONG"));
}

#[test]
fn second_signal_is_ignored_while_slot_occupied() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let market = FakeMarket {
        candles: breakout_candles(),
        price: 50_200.0,
        funding_rate: 0.0,
        fail_klines: false,
    };
    let notifier = RecordingNotifier::default();

    let first = run_tick(&config, &market, &notifier, now()).unwrap();
    assert!(matches!(first.outcome, TickOutcome::Opened(_)));

    // Same candles, same signal — but the slot is taken and the price has
    // not reached stop or target.
    let second = run_tick(&config, &market, &notifier, now() + Duration::hours(1)).unwrap();
    assert_eq!(second.outcome, TickOutcome::SlotOccupied);
    assert!(second.closed.is_none());
}

#[test]
fn tick_settles_position_at_target() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let notifier = RecordingNotifier::default();

    let market = FakeMarket {
        candles: breakout_candles(),
        price: 50_200.0,
        funding_rate: 0.0,
        fail_klines: false,
    };
    let opened = run_tick(&config, &market, &notifier, now()).unwrap();
    let TickOutcome::Opened(position) = opened.outcome else {
        panic!("expected open");
    };

    // Price beyond the target: the next tick settles the position.
    let market = FakeMarket {
        price: position.take_profit + 100.0,
        ..market
    };
    let report = run_tick(&config, &market, &notifier, now() + Duration::hours(4)).unwrap();
    let trade = report.closed.expect("position should have settled");
    assert!(trade.is_winner());
    assert!(trade.capital_after > 1000.0);

    // Settlement is persisted, counters included.
    let saved: PaperState = state::load(&config.state_path).unwrap().unwrap();
    assert_eq!(saved.total_trades, 1);
    assert_eq!(saved.winning_trades, 1);
    assert_eq!(saved.closed_trades.len(), 1);
    assert!((saved.equity.capital - trade.capital_after).abs() < 1e-9);

    // The journal recorded the close.
    let journal = std::fs::read_to_string(&config.journal_path).unwrap();
    assert!(journal.contains("WIN"));

    // Open + close notifications (plus the immediate re-open on the stale
    // breakout candles).
    assert!(notifier
        .messages
        .borrow()
        .iter()
        .any(|m| m.contains("PAPER CLOSE")));
}

#[test]
fn candle_fetch_failure_aborts_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let market = FakeMarket {
        candles: Vec::new(),
        price: 50_000.0,
        funding_rate: 0.0,
        fail_klines: true,
    };
    let result = run_tick(&config, &market, &NoopRecorder, now());
    assert!(matches!(result, Err(TickError::Fetch(_))));
}

#[test]
fn short_candle_batch_is_insufficient_data() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let market = FakeMarket {
        candles: breakout_candles().into_iter().take(50).collect(),
        price: 50_000.0,
        funding_rate: 0.0,
        fail_klines: false,
    };
    let result = run_tick(&config, &market, &NoopRecorder, now());
    assert!(matches!(result, Err(TickError::Data(_))));
    // The aborted cycle still persisted the (unchanged) state.
    let saved: PaperState = state::load(&config.state_path).unwrap().unwrap();
    assert!(saved.open_position.is_none());
}

struct NoopRecorder;

impl Notifier for NoopRecorder {
    fn send(&self, _: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}
