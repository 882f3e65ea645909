//! Timer state structure and phase

use serde::{Deserialize, Serialize};

/// The stopwatch's primary state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimerPhase {
    /// Never started, or just reset
    #[default]
    Stopped,
    /// Accumulating elapsed time
    Running,
    /// Elapsed time frozen, resumable
    Paused,
}

impl TimerPhase {
    /// Hint shown to the user for the primary tap gesture
    pub fn status_label(self) -> &'static str {
        match self {
            TimerPhase::Running => "tap to pause",
            TimerPhase::Paused => "tap to resume",
            TimerPhase::Stopped => "tap to start",
        }
    }

    pub fn is_running(self) -> bool {
        self == TimerPhase::Running
    }
}

/// Everything the engine needs to resume a session.
///
/// The host persists this verbatim across suspension boundaries and hands it
/// back to [`crate::engine::TimerEngine::restore`]. `last_reference_millis` is
/// optional on the wire: when it is missing the engine re-baselines to the
/// current time on restore.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub phase: TimerPhase,
    /// Running time accumulated so far, pauses excluded
    pub elapsed_millis: u64,
    /// Wall-clock time the current pause began; set only while paused
    pub pause_started_at_millis: Option<u64>,
    /// Wall-clock sample the next delta is measured from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reference_millis: Option<u64>,
    /// Alert cadence; `None` disables interval alerts
    pub interval_seconds: Option<u32>,
    /// Elapsed value at which the most recent interval boundary was reported
    pub last_flash_elapsed_millis: u64,
}

impl TimerState {
    /// Create the zero state with the given interval setting
    pub fn new(interval_seconds: Option<u32>) -> Self {
        Self {
            interval_seconds,
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }
}
