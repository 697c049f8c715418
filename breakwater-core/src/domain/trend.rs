//! Trend regime classification and the directions it permits.

use serde::{Deserialize, Serialize};

use super::Side;

/// Market regime from the short/long EMA comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendClass {
    Bullish,
    Bearish,
    Neutral,
}

/// Trend filter output: which trade directions are allowed this cycle.
///
/// Bullish permits longs only, bearish shorts only. Neutral (insufficient
/// history) permits both — the filter fails open so missing history never
/// blocks trading via a crash, only via insufficient signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendState {
    pub classification: TrendClass,
    pub long_allowed: bool,
    pub short_allowed: bool,
}

impl TrendState {
    pub fn bullish() -> Self {
        Self {
            classification: TrendClass::Bullish,
            long_allowed: true,
            short_allowed: false,
        }
    }

    pub fn bearish() -> Self {
        Self {
            classification: TrendClass::Bearish,
            long_allowed: false,
            short_allowed: true,
        }
    }

    pub fn neutral() -> Self {
        Self {
            classification: TrendClass::Neutral,
            long_allowed: true,
            short_allowed: true,
        }
    }

    pub fn allows(&self, side: Side) -> bool {
        match side {
            Side::Long => self.long_allowed,
            Side::Short => self.short_allowed,
        }
    }
}
