//! Domain types: candles, levels, trend state, signals, positions, trades.

pub mod candle;
pub mod equity;
pub mod level;
pub mod position;
pub mod signal;
pub mod trade;
pub mod trend;

pub use candle::Candle;
pub use equity::EquityState;
pub use level::Level;
pub use position::{Position, SizingResult};
pub use signal::{Side, Signal};
pub use trade::{ClosedTrade, ExitReason, TradeResult};
pub use trend::{TrendClass, TrendState};
