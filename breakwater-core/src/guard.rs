//! Drawdown guard — pause/resume state machine over equity.
//!
//! ACTIVE -> PAUSED when drawdown from peak reaches the pause threshold;
//! PAUSED -> ACTIVE when capital recovers to the resume fraction of peak.
//! While paused the engine must not seek new signals; open-position lifecycle
//! evaluation continues unaffected.

use serde::{Deserialize, Serialize};

use crate::domain::EquityState;
use crate::params::StrategyParams;

/// Transition taken by one guard update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardTransition {
    /// No state change this update.
    Unchanged,
    Paused,
    Resumed,
}

/// Re-evaluate the pause flag after a capital update. Ratchets `peak_equity`
/// first, then applies the pause/resume thresholds.
pub fn update(state: &mut EquityState, params: &StrategyParams) -> GuardTransition {
    if state.capital > state.peak_equity {
        state.peak_equity = state.capital;
    }

    let drawdown = state.drawdown();

    if !state.paused && drawdown <= -params.drawdown_pause_threshold {
        state.paused = true;
        return GuardTransition::Paused;
    }

    if state.paused && state.capital >= state.peak_equity * params.drawdown_resume_threshold {
        state.paused = false;
        return GuardTransition::Resumed;
    }

    GuardTransition::Unchanged
}
