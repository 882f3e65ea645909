//! Read-only view handed to the presentation layer

use serde::{Deserialize, Serialize};

use super::format::formatted_time;
use crate::state::{TimerPhase, TimerState};

/// Snapshot returned by every engine call.
///
/// `interval_boundary_crossed` is an edge flag: it is only true on the call
/// that crossed the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub elapsed_millis: u64,
    pub formatted_time: String,
    pub status_label: String,
    pub interval_seconds: Option<u32>,
    pub interval_boundary_crossed: bool,
}

impl TimerSnapshot {
    pub(crate) fn from_state(state: &TimerState, interval_boundary_crossed: bool) -> Self {
        Self {
            phase: state.phase,
            elapsed_millis: state.elapsed_millis,
            formatted_time: formatted_time(state.elapsed_millis),
            status_label: state.phase.status_label().to_string(),
            interval_seconds: state.interval_seconds,
            interval_boundary_crossed,
        }
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::from_state(&TimerState::default(), false)
    }
}
