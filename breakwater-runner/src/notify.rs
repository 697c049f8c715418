//! Notification sink — human-readable alerts for signals and trades.
//!
//! Failures are logged and swallowed: a dead chat bot must never take the
//! strategy down with it.

use breakwater_core::domain::{ClosedTrade, Position, Signal, SizingResult, TrendState};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport error: {0}")]
    Transport(String),

    #[error("notification rejected with status {0}")]
    Rejected(u16),
}

/// Boundary collaborator: consumes a formatted message.
pub trait Notifier {
    fn send(&self, message: &str) -> Result<(), NotifyError>;
}

/// Sink for runs without a configured channel.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn send(&self, _message: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Telegram bot sink, configured from `TELEGRAM_BOT_TOKEN` and
/// `TELEGRAM_CHAT_ID`.
pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// `None` when either environment variable is missing or empty.
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok().filter(|s| !s.is_empty())?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").ok().filter(|s| !s.is_empty())?;
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .ok()?;
        Some(Self {
            client,
            bot_token,
            chat_id,
        })
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, message: &str) -> Result<(), NotifyError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": message,
            }))
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Send, demoting any failure to a warning.
pub fn send_non_fatal(notifier: &dyn Notifier, message: &str) {
    if let Err(err) = notifier.send(message) {
        warn!(error = %err, "notification failed");
    }
}

/// Format a fresh signal with its sizing for the alert channel.
pub fn format_signal(
    symbol: &str,
    signal: &Signal,
    sizing: &SizingResult,
    capital: f64,
    leverage: f64,
    trend: &TrendState,
) -> String {
    let mut notes = Vec::new();
    if signal.volume_confirmed {
        notes.push("volume confirmed".to_string());
    }
    if signal.trend_aligned {
        notes.push(format!("trend {:?}", trend.classification));
    }
    if signal.decay_applied {
        notes.push("level decay applied".to_string());
    }
    let notes = if notes.is_empty() {
        "(standard signal)".to_string()
    } else {
        notes.join(", ")
    };

    format!(
        "{side} SIGNAL {symbol}\n\
         entry {entry:.2} | stop {stop:.2} | target {target:.2}\n\
         size {units:.4} @ {leverage:.1}x | notional {notional:.2} | margin {margin:.2}\n\
         risk {risk_pct:.2}% ({risk_amount:.2}) | reward {reward_pct:.2}%\n\
         level {level:.2} | breakout {breakout:.3}% | capital {capital:.2}\n\
         {notes}",
        side = signal.side,
        symbol = symbol,
        entry = signal.entry,
        stop = signal.stop_loss,
        target = signal.take_profit,
        units = sizing.units,
        leverage = leverage,
        notional = sizing.notional_value,
        margin = sizing.margin_required,
        risk_pct = signal.risk_pct,
        risk_amount = sizing.risk_amount,
        reward_pct = signal.reward_pct,
        level = signal.level_price,
        breakout = signal.breakout_magnitude_pct,
        capital = capital,
        notes = notes,
    )
}

/// Format a paper-position open event.
pub fn format_open(symbol: &str, position: &Position, capital: f64) -> String {
    format!(
        "PAPER OPEN {side} {symbol}\n\
         entry {entry:.2} | stop {stop:.2} | target {target:.2}\n\
         size {units:.4} @ {leverage:.1}x | margin {margin:.2} | capital {capital:.2}",
        side = position.side,
        symbol = symbol,
        entry = position.entry_price,
        stop = position.stop_loss,
        target = position.take_profit,
        units = position.units,
        leverage = position.leverage,
        margin = position.margin_required,
        capital = capital,
    )
}

/// Format a settled trade.
pub fn format_close(symbol: &str, trade: &ClosedTrade) -> String {
    format!(
        "PAPER CLOSE {result:?} {side} {symbol}\n\
         entry {entry:.2} -> exit {exit:.2} ({reason:?})\n\
         pnl {pnl:+.2} ({pnl_pct:+.2}%) | capital {capital:.2}",
        result = trade.result,
        side = trade.side,
        symbol = symbol,
        entry = trade.entry_price,
        exit = trade.exit_price,
        reason = trade.reason,
        pnl = trade.net_pnl,
        pnl_pct = trade.pnl_pct,
        capital = trade.capital_after,
    )
}
