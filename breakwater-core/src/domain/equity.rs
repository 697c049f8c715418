//! EquityState — capital, peak equity, and the drawdown pause flag.

use serde::{Deserialize, Serialize};

/// Running equity state for the drawdown guard.
///
/// `peak_equity` is monotonically non-decreasing except across an external
/// capital reset. `paused` is a derived flag re-evaluated on every capital
/// update by `guard::update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityState {
    pub capital: f64,
    pub peak_equity: f64,
    pub paused: bool,
}

impl EquityState {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            capital: initial_capital,
            peak_equity: initial_capital,
            paused: false,
        }
    }

    /// Current drawdown from peak as a fraction (<= 0).
    pub fn drawdown(&self) -> f64 {
        if self.peak_equity > 0.0 {
            (self.capital - self.peak_equity) / self.peak_equity
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_flat() {
        let state = EquityState::new(1000.0);
        assert_eq!(state.capital, 1000.0);
        assert_eq!(state.peak_equity, 1000.0);
        assert!(!state.paused);
        assert_eq!(state.drawdown(), 0.0);
    }

    #[test]
    fn drawdown_is_negative_below_peak() {
        let state = EquityState {
            capital: 950.0,
            peak_equity: 1200.0,
            paused: false,
        };
        assert!((state.drawdown() - (950.0 - 1200.0) / 1200.0).abs() < 1e-12);
    }
}
