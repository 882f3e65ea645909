//! Stopwatch timing state machine

use tracing::{debug, info, warn};

use super::{
    error::{IntervalError, RestoreError},
    snapshot::TimerSnapshot,
};
use crate::{
    clock::Clock,
    state::{TimerPhase, TimerState},
};

/// Tracks running time across start/pause/resume/reset and reports interval
/// boundaries.
///
/// Elapsed time is always the sum of wall-clock deltas observed while
/// running, so a missed tick is made up on the next `tick` or
/// `reconcile_after_suspension` instead of being lost. Calls that do not fit
/// the current phase are no-ops.
#[derive(Debug)]
pub struct TimerEngine<C> {
    clock: C,
    state: TimerState,
    last_reference_millis: u64,
    total_paused_millis: u64,
}

impl<C: Clock> TimerEngine<C> {
    /// Create a stopped engine at zero
    pub fn new(clock: C, interval_seconds: Option<u32>) -> Self {
        let last_reference_millis = clock.now_millis();
        Self {
            clock,
            state: TimerState::new(interval_seconds.filter(|s| *s > 0)),
            last_reference_millis,
            total_paused_millis: 0,
        }
    }

    /// Rebuild an engine from a persisted state.
    ///
    /// The host must follow up with [`Self::reconcile_after_suspension`] to
    /// fold the gap since the state was saved. Without a stored reference
    /// sample the gap cannot be measured and is not counted.
    pub fn restore(state: TimerState, clock: C) -> Result<Self, RestoreError> {
        let paused = state.phase == TimerPhase::Paused;
        if paused != state.pause_started_at_millis.is_some() {
            return Err(RestoreError::PauseMarkerMismatch {
                phase: state.phase,
                pause_started_at_millis: state.pause_started_at_millis,
            });
        }
        if state.phase == TimerPhase::Stopped && state.elapsed_millis != 0 {
            return Err(RestoreError::StoppedWithElapsed(state.elapsed_millis));
        }
        if state.interval_seconds == Some(0) {
            return Err(RestoreError::ZeroInterval);
        }
        if state.last_flash_elapsed_millis > state.elapsed_millis {
            return Err(RestoreError::FlashAheadOfElapsed {
                last_flash: state.last_flash_elapsed_millis,
                elapsed: state.elapsed_millis,
            });
        }

        let last_reference_millis = state
            .last_reference_millis
            .unwrap_or_else(|| clock.now_millis());
        info!(
            "Restored timer: phase={:?}, elapsed={}ms",
            state.phase, state.elapsed_millis
        );
        Ok(Self {
            clock,
            state: TimerState {
                last_reference_millis: None,
                ..state
            },
            last_reference_millis,
            total_paused_millis: 0,
        })
    }

    pub fn phase(&self) -> TimerPhase {
        self.state.phase
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.state.elapsed_millis
    }

    pub fn interval_seconds(&self) -> Option<u32> {
        self.state.interval_seconds
    }

    /// Total time spent paused since the last reset
    pub fn total_paused_millis(&self) -> u64 {
        self.total_paused_millis
    }

    /// Current state in its persisted form
    pub fn state(&self) -> TimerState {
        TimerState {
            last_reference_millis: Some(self.last_reference_millis),
            ..self.state.clone()
        }
    }

    /// Current snapshot without advancing time
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from_state(&self.state, false)
    }

    /// Begin timing from the stopped state
    pub fn start(&mut self) -> TimerSnapshot {
        if self.state.phase != TimerPhase::Stopped {
            debug!("Ignoring start while {:?}", self.state.phase);
            return self.snapshot();
        }

        let now = self.clock.now_millis();
        self.state.phase = TimerPhase::Running;
        self.state.pause_started_at_millis = None;
        self.last_reference_millis = now;
        info!("Timer started at {}", now);
        self.snapshot()
    }

    /// Freeze elapsed time.
    ///
    /// Running time since the last tick is folded in first so the pause
    /// excludes exactly the paused span.
    pub fn pause(&mut self) -> TimerSnapshot {
        if self.state.phase != TimerPhase::Running {
            debug!("Ignoring pause while {:?}", self.state.phase);
            return self.snapshot();
        }

        let now = self.clock.now_millis();
        let crossed = self.advance(now);
        self.state.phase = TimerPhase::Paused;
        self.state.pause_started_at_millis = Some(now);
        info!("Timer paused at {}ms elapsed", self.state.elapsed_millis);
        TimerSnapshot::from_state(&self.state, crossed)
    }

    /// Continue timing after a pause; the paused span is not counted
    pub fn resume(&mut self) -> TimerSnapshot {
        let Some(pause_started) = self.state.pause_started_at_millis else {
            debug!("Ignoring resume while {:?}", self.state.phase);
            return self.snapshot();
        };

        let now = self.clock.now_millis();
        let paused_for = now.saturating_sub(pause_started);
        self.total_paused_millis = self.total_paused_millis.saturating_add(paused_for);
        self.state.pause_started_at_millis = None;
        self.state.phase = TimerPhase::Running;
        self.last_reference_millis = now;
        info!(
            "Timer resumed after {}ms paused ({}ms total)",
            paused_for, self.total_paused_millis
        );
        self.snapshot()
    }

    /// Primary tap gesture: start, pause or resume depending on phase
    pub fn toggle(&mut self) -> TimerSnapshot {
        match self.state.phase {
            TimerPhase::Running => self.pause(),
            TimerPhase::Paused => self.resume(),
            TimerPhase::Stopped => self.start(),
        }
    }

    /// Return to the zero state, keeping the interval setting
    pub fn reset(&mut self) -> TimerSnapshot {
        self.state = TimerState::new(self.state.interval_seconds);
        self.total_paused_millis = 0;
        self.last_reference_millis = self.clock.now_millis();
        info!("Timer reset");
        self.snapshot()
    }

    /// Change the alert cadence; `None` disables alerts.
    ///
    /// The new cadence is measured from the current elapsed time forward, so
    /// a boundary that already passed is not reported.
    pub fn set_interval_seconds(
        &mut self,
        seconds: Option<i64>,
    ) -> Result<TimerSnapshot, IntervalError> {
        let interval = match seconds {
            None => None,
            Some(value) if value <= 0 => {
                warn!("Rejected interval {}", value);
                return Err(IntervalError::NotPositive(value));
            }
            Some(value) => match u32::try_from(value) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Rejected interval {}", value);
                    return Err(IntervalError::TooLarge(value));
                }
            },
        };

        self.state.interval_seconds = interval;
        self.state.last_flash_elapsed_millis = self.state.elapsed_millis;
        info!("Interval set to {:?} seconds", interval);
        Ok(self.snapshot())
    }

    /// Advance elapsed time to `now_millis` while running.
    ///
    /// A clock that went backward contributes nothing and only moves the
    /// reference sample.
    pub fn tick(&mut self, now_millis: u64) -> TimerSnapshot {
        if !self.state.is_running() {
            return self.snapshot();
        }

        let crossed = self.advance(now_millis);
        TimerSnapshot::from_state(&self.state, crossed)
    }

    /// Fold an unobserved gap into elapsed time in one step.
    ///
    /// Equivalent to a single [`Self::tick`]; at most one interval boundary is
    /// reported however many were skipped.
    pub fn reconcile_after_suspension(&mut self, now_millis: u64) -> TimerSnapshot {
        if self.state.is_running() {
            info!(
                "Reconciling {}ms gap after suspension",
                now_millis.saturating_sub(self.last_reference_millis)
            );
        }
        self.tick(now_millis)
    }

    fn advance(&mut self, now_millis: u64) -> bool {
        if now_millis > self.last_reference_millis {
            let delta = now_millis - self.last_reference_millis;
            self.state.elapsed_millis = self.state.elapsed_millis.saturating_add(delta);
            debug!("Tick +{}ms -> {}ms", delta, self.state.elapsed_millis);
        } else if now_millis < self.last_reference_millis {
            warn!(
                "Clock went backward by {}ms, not counting it",
                self.last_reference_millis - now_millis
            );
        }
        self.last_reference_millis = now_millis;
        self.check_boundary()
    }

    fn check_boundary(&mut self) -> bool {
        let Some(seconds) = self.state.interval_seconds else {
            return false;
        };
        let interval_ms = u64::from(seconds) * 1000;
        let elapsed = self.state.elapsed_millis;
        let last = self.state.last_flash_elapsed_millis;

        if elapsed != last && elapsed / interval_ms > last / interval_ms {
            self.state.last_flash_elapsed_millis = elapsed;
            debug!("Interval boundary crossed at {}ms", elapsed);
            true
        } else {
            false
        }
    }
}
