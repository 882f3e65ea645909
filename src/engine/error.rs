//! Engine error types

use thiserror::Error;

use crate::state::TimerPhase;

/// Rejected interval input; the engine state is left untouched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("interval must be a positive number of seconds, got {0}")]
    NotPositive(i64),
    #[error("interval of {0} seconds is too large")]
    TooLarge(i64),
    #[error("interval {0:?} is not a number")]
    NotANumber(String),
}

/// A persisted state that violates the engine's invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreError {
    #[error("pause start must be set if and only if paused (phase {phase:?}, pause start {pause_started_at_millis:?})")]
    PauseMarkerMismatch {
        phase: TimerPhase,
        pause_started_at_millis: Option<u64>,
    },
    #[error("stopped timer must have zero elapsed time, got {0}ms")]
    StoppedWithElapsed(u64),
    #[error("interval must be at least one second")]
    ZeroInterval,
    #[error("last flash at {last_flash}ms is ahead of elapsed time {elapsed}ms")]
    FlashAheadOfElapsed { last_flash: u64, elapsed: u64 },
}
