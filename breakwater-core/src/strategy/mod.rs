//! Strategy components: level engine, trend filter, breakout detector,
//! volume confirmation, leverage selector, position sizer.
//!
//! Every component is a pure function of (candle slice, parameters) plus the
//! explicit collaborator inputs of the sizer. One rule set serves all three
//! execution modes.

pub mod breakout;
pub mod level;
pub mod leverage;
pub mod sizing;
pub mod trend;
pub mod volume;

pub use sizing::MarketContext;
