//! Breakwater CLI — live signal checks, paper trading ticks, and backtests.
//!
//! Commands:
//! - `check` — one live signal-generation cycle against the exchange
//! - `paper` — one paper-trading tick (mark, evaluate, open)
//! - `backtest` — replay exchange or synthetic candles through the engine
//! - `status` — print persisted paper-trading statistics

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use breakwater_core::params::StrategyParams;
use breakwater_core::series::Series;
use breakwater_runner::backtest::{run, BacktestConfig};
use breakwater_runner::exchange::MarketData;
use breakwater_runner::live::{run_check, CheckOutcome, LiveConfig};
use breakwater_runner::notify::{NoopNotifier, Notifier, TelegramNotifier};
use breakwater_runner::paper::{run_tick, PaperConfig, TickOutcome};
use breakwater_runner::state::{self, PaperState};
use breakwater_runner::synthetic::{generate, SyntheticConfig};
use breakwater_runner::{BacktestReport, MexcRest};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "breakwater",
    about = "Breakwater — session-level breakout strategy engine"
)]
struct Cli {
    /// Directory for persisted state and the trade journal.
    #[arg(long, default_value = "state", global = true)]
    state_dir: PathBuf,

    /// TOML file with strategy parameter overrides.
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one live signal-generation cycle.
    Check {
        /// Symbol to evaluate.
        #[arg(long, default_value = "BTCUSDT")]
        symbol: String,

        /// Candle interval.
        #[arg(long, default_value = "4h")]
        interval: String,
    },
    /// Run one paper-trading tick.
    Paper {
        #[arg(long, default_value = "BTCUSDT")]
        symbol: String,

        #[arg(long, default_value = "4h")]
        interval: String,
    },
    /// Replay candles through the engine and print the results.
    Backtest {
        #[arg(long, default_value = "BTCUSDT")]
        symbol: String,

        #[arg(long, default_value = "4h")]
        interval: String,

        /// Candles to fetch from the exchange.
        #[arg(long, default_value_t = 500)]
        limit: usize,

        /// Initial capital.
        #[arg(long, default_value_t = 1000.0)]
        capital: f64,

        /// Use a seeded synthetic series instead of exchange data.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for the synthetic series.
        #[arg(long, default_value_t = 7)]
        seed: u64,

        /// Write the full report as JSON to this path.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print persisted paper-trading statistics.
    Status,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let params = load_params(cli.params.as_deref())?;

    match cli.command {
        Commands::Check { symbol, interval } => {
            let market = MexcRest::new().context("building exchange client")?;
            let notifier = make_notifier();
            let mut config = LiveConfig::new(&cli.state_dir);
            config.symbol = symbol;
            config.interval = interval;
            config.params = params;

            let outcome = run_check(&config, &market, notifier.as_ref(), chrono::Utc::now())?;
            match outcome {
                CheckOutcome::Paused => println!("strategy paused by drawdown guard"),
                CheckOutcome::NoSignal(reason) => println!("no signal ({reason})"),
                CheckOutcome::Signal {
                    signal, leverage, ..
                } => println!(
                    "{} signal: entry {:.2}, stop {:.2}, target {:.2} @ {:.1}x",
                    signal.side, signal.entry, signal.stop_loss, signal.take_profit, leverage
                ),
            }
            Ok(())
        }
        Commands::Paper { symbol, interval } => {
            let market = MexcRest::new().context("building exchange client")?;
            let notifier = make_notifier();
            let mut config = PaperConfig::new(&cli.state_dir);
            config.symbol = symbol;
            config.interval = interval;
            config.params = params;

            let report = run_tick(&config, &market, notifier.as_ref(), chrono::Utc::now())?;
            if let Some(trade) = &report.closed {
                println!(
                    "closed {:?} {} at {:.2}: pnl {:+.2}",
                    trade.result, trade.side, trade.exit_price, trade.net_pnl
                );
            }
            match report.outcome {
                TickOutcome::Paused => println!("paper trading paused by drawdown guard"),
                TickOutcome::SlotOccupied => println!("signal ignored: position already open"),
                TickOutcome::Opened(position) => println!(
                    "opened {} at {:.2} (stop {:.2}, target {:.2})",
                    position.side, position.entry_price, position.stop_loss, position.take_profit
                ),
                TickOutcome::NoSignal(reason) => println!("no signal ({reason})"),
            }
            println!("capital: {:.2}", report.capital);
            Ok(())
        }
        Commands::Backtest {
            symbol,
            interval,
            limit,
            capital,
            synthetic,
            seed,
            output,
        } => {
            let series = if synthetic {
                generate(&SyntheticConfig {
                    seed,
                    count: limit,
                    ..SyntheticConfig::default()
                })
            } else {
                let market = MexcRest::new().context("building exchange client")?;
                let raw = market
                    .klines(&symbol, &interval, limit)
                    .context("fetching candles")?;
                Series::from_raw(&raw)
            };

            let config = BacktestConfig {
                initial_capital: capital,
                params,
                ..BacktestConfig::default()
            };
            let report = run(&series, &config)?;
            print_report(&report);

            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&report)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("writing report to {}", path.display()))?;
                println!("report written to {}", path.display());
            }
            Ok(())
        }
        Commands::Status => {
            let path = cli.state_dir.join("paper_state.json");
            let Some(paper) = state::load::<PaperState>(&path)? else {
                bail!("no paper state at {} — run `breakwater paper` first", path.display());
            };
            println!("capital:        {:.2}", paper.equity.capital);
            println!("peak equity:    {:.2}", paper.equity.peak_equity);
            println!("drawdown:       {:.2}%", paper.equity.drawdown() * 100.0);
            println!("paused:         {}", paper.equity.paused);
            println!("total trades:   {}", paper.total_trades);
            println!("winning trades: {}", paper.winning_trades);
            println!("losing trades:  {}", paper.losing_trades);
            println!("total pnl:      {:+.2}", paper.total_pnl);
            println!(
                "open position:  {}",
                match &paper.open_position {
                    Some(p) => format!("{} from {:.2}", p.side, p.entry_price),
                    None => "none".to_string(),
                }
            );
            Ok(())
        }
    }
}

/// Load parameter overrides from TOML, or defaults.
fn load_params(path: Option<&std::path::Path>) -> Result<StrategyParams> {
    match path {
        None => Ok(StrategyParams::default()),
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading params file {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
        }
    }
}

/// Telegram when configured, otherwise a no-op sink.
fn make_notifier() -> Box<dyn Notifier> {
    match TelegramNotifier::from_env() {
        Some(telegram) => Box::new(telegram),
        None => Box::new(NoopNotifier),
    }
}

fn print_report(report: &BacktestReport) {
    println!("run id:        {}", report.run_id);
    println!("candles:       {}", report.candle_count);
    println!("signals:       {}", report.signal_count);
    println!("paused:        {} candles", report.paused_candles);
    println!("trades:        {}", report.metrics.trade_count);
    println!("win rate:      {:.1}%", report.metrics.win_rate * 100.0);
    println!("profit factor: {:.2}", report.metrics.profit_factor);
    println!("avg w/l:       {:.2}", report.metrics.avg_win_loss_ratio);
    println!(
        "return:        {:+.2}% ({:.2} -> {:.2})",
        report.metrics.total_return * 100.0,
        report.initial_capital,
        report.final_capital
    );
    println!(
        "max drawdown:  {:.2}%",
        report.metrics.max_drawdown * 100.0
    );
}
