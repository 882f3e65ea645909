//! Timing engine module
//!
//! The stopwatch state machine, its derived presentation values, and parsing
//! of interval input coming from text-entry controls.

pub mod error;
pub mod format;
pub mod snapshot;
pub mod timer_engine;

pub use error::{IntervalError, RestoreError};
pub use format::formatted_time;
pub use snapshot::TimerSnapshot;
pub use timer_engine::TimerEngine;

use crate::state::TimerPhase;

/// Hint shown for the primary gesture in the given phase
pub fn status_label(phase: TimerPhase) -> &'static str {
    phase.status_label()
}

/// Parse raw interval text into the value accepted by
/// [`TimerEngine::set_interval_seconds`].
///
/// Blank input and `off` disable the interval.
pub fn parse_interval(text: &str) -> Result<Option<i64>, IntervalError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("off") {
        return Ok(None);
    }

    let value: i64 = trimmed
        .parse()
        .map_err(|_| IntervalError::NotANumber(trimmed.to_string()))?;
    if value <= 0 {
        return Err(IntervalError::NotPositive(value));
    }
    if u32::try_from(value).is_err() {
        return Err(IntervalError::TooLarge(value));
    }
    Ok(Some(value))
}
