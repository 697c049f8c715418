//! Backtest integration tests over synthetic and crafted series.

use breakwater_core::domain::Candle;
use breakwater_core::series::Series;
use breakwater_runner::backtest::{run, BacktestConfig};
use breakwater_runner::synthetic::{generate, SyntheticConfig};
use chrono::{Duration, TimeZone, Utc};

fn series_with_closes(closes: &[f64]) -> Series {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let candles = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                open_time: base + Duration::hours(4 * i as i64),
                open,
                high: open.max(close) + 10.0,
                low: open.min(close) - 10.0,
                close,
                volume: 1000.0,
            }
        })
        .collect();
    Series::from_candles(candles)
}

#[test]
fn synthetic_run_preserves_accounting_identity() {
    let series = generate(&SyntheticConfig::default());
    let config = BacktestConfig::default();
    let report = run(&series, &config).unwrap();

    // Equity curve covers every evaluated candle.
    assert_eq!(
        report.equity_curve.len(),
        series.len() - config.params.min_history
    );

    // Capital reconciles with the settled trades.
    let pnl_sum: f64 = report.trades.iter().map(|t| t.net_pnl).sum();
    assert!((report.final_capital - (config.initial_capital + pnl_sum)).abs() < 1e-6);

    // The curve ends where the final capital says it does.
    assert_eq!(
        report.equity_curve.last().copied().unwrap(),
        report.final_capital
    );
    assert_eq!(report.metrics.trade_count, report.trades.len());
}

#[test]
fn identical_configs_replay_identically() {
    let series = generate(&SyntheticConfig::default());
    let config = BacktestConfig::default();
    let a = run(&series, &config).unwrap();
    let b = run(&series, &config).unwrap();
    assert_eq!(a.run_id, b.run_id);
    assert_eq!(a.final_capital, b.final_capital);
    assert_eq!(a.trades.len(), b.trades.len());
    assert_eq!(a.equity_curve, b.equity_curve);
}

#[test]
fn short_breakout_stopped_out_books_a_loss() {
    // Flat above the session level, a two-candle breakdown, then a squeeze
    // back through the stop.
    let mut closes = vec![50_000.0; 130];
    for c in closes.iter_mut().skip(115) {
        *c = 50_100.0;
    }
    closes[118] = 49_900.0; // crossing, magnitude 0.2%
    closes[119] = 49_800.0; // continuation
    for c in closes.iter_mut().skip(120) {
        *c = 50_400.0; // through any short stop
    }
    let series = series_with_closes(&closes);

    let report = run(&series, &BacktestConfig::default()).unwrap();
    assert_eq!(report.trades.len(), 1);
    let trade = &report.trades[0];
    assert!(!trade.is_winner());
    assert!(trade.net_pnl < 0.0);
    assert!(report.final_capital < 1000.0);
    // Short exit slips upward, against the position.
    assert!(trade.exit_price > trade.stop_loss);
}

#[test]
fn at_most_one_position_is_open_at_a_time() {
    let series = generate(&SyntheticConfig {
        seed: 42,
        count: 600,
        volatility: 0.02,
        ..SyntheticConfig::default()
    });
    let report = run(&series, &BacktestConfig::default()).unwrap();

    // Trades never overlap: each opens at or after the previous close.
    for pair in report.trades.windows(2) {
        assert!(pair[1].opened_at >= pair[0].closed_at);
    }
}
