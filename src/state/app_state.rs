//! Host-side shared state around the timer engine

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{TimerPhase, TimerState};
use crate::{
    clock::{Clock, SharedClock},
    config::Config,
    engine::{parse_interval, IntervalError, TimerEngine, TimerSnapshot},
};

/// Errors surfaced when dispatching an intent into the engine
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to lock timer engine: {0}")]
    Lock(String),
    #[error(transparent)]
    Interval(#[from] IntervalError),
}

/// Shared application state: the engine plus the channels the host's tasks
/// and the presentation layer listen on.
///
/// Every intent goes through the engine mutex, so engine methods never run
/// concurrently.
#[derive(Debug)]
pub struct AppState {
    pub engine: Arc<Mutex<TimerEngine<SharedClock>>>,
    pub clock: SharedClock,
    /// Driver cadence while running
    pub tick_interval: Duration,
    /// Wake-up detection settings
    pub wake_check_interval: Duration,
    pub gap_threshold: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Phase transitions, consumed by the tick driver
    pub phase_change_tx: broadcast::Sender<TimerPhase>,
    /// Snapshots that crossed an interval boundary
    pub boundary_tx: broadcast::Sender<TimerSnapshot>,
    /// Latest snapshot after every mutating call
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    pub fn new(config: &Config, clock: SharedClock) -> Self {
        let engine = TimerEngine::new(Arc::clone(&clock), config.interval);
        Self::with_engine(config, clock, engine)
    }

    /// Wrap an existing (e.g. restored) engine
    pub fn with_engine(config: &Config, clock: SharedClock, engine: TimerEngine<SharedClock>) -> Self {
        let (phase_change_tx, _) = broadcast::channel(100);
        let (boundary_tx, _) = broadcast::channel(16);
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

        Self {
            engine: Arc::new(Mutex::new(engine)),
            clock,
            tick_interval: config.tick_interval(),
            wake_check_interval: config.wake_check_interval(),
            gap_threshold: config.gap_threshold(),
            start_time: Instant::now(),
            port: config.port,
            host: config.host.clone(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            phase_change_tx,
            boundary_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    fn lock_engine(&self) -> Result<MutexGuard<'_, TimerEngine<SharedClock>>, DispatchError> {
        self.engine
            .lock()
            .map_err(|e| DispatchError::Lock(e.to_string()))
    }

    /// Run a user intent against the engine and notify listeners
    fn dispatch<F>(&self, action: &str, intent: F) -> Result<TimerSnapshot, DispatchError>
    where
        F: FnOnce(&mut TimerEngine<SharedClock>) -> Result<TimerSnapshot, DispatchError>,
    {
        let mut engine = self.lock_engine()?;
        let before = engine.phase();
        let snapshot = intent(&mut *engine)?;
        drop(engine); // Release the lock early

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.publish(before, &snapshot);
        Ok(snapshot)
    }

    fn publish(&self, before: TimerPhase, snapshot: &TimerSnapshot) {
        if snapshot.phase != before {
            debug!("Phase changed: {:?} -> {:?}", before, snapshot.phase);
            if self.phase_change_tx.send(snapshot.phase).is_err() {
                debug!("No phase listeners");
            }
        }

        if snapshot.interval_boundary_crossed {
            info!("Interval boundary at {}", snapshot.formatted_time);
            if self.boundary_tx.send(snapshot.clone()).is_err() {
                debug!("No boundary listeners");
            }
        }

        if let Err(e) = self.snapshot_tx.send(snapshot.clone()) {
            warn!("Failed to send snapshot update: {}", e);
        }
    }

    /// Primary tap gesture
    pub fn toggle(&self) -> Result<TimerSnapshot, DispatchError> {
        self.dispatch("toggle", |engine| Ok(engine.toggle()))
    }

    pub fn reset(&self) -> Result<TimerSnapshot, DispatchError> {
        self.dispatch("reset", |engine| Ok(engine.reset()))
    }

    pub fn set_interval(&self, seconds: Option<i64>) -> Result<TimerSnapshot, DispatchError> {
        self.dispatch("interval", |engine| Ok(engine.set_interval_seconds(seconds)?))
    }

    /// Set the interval from raw text-entry input
    pub fn set_interval_text(&self, text: &str) -> Result<TimerSnapshot, DispatchError> {
        let seconds = parse_interval(text)?;
        self.set_interval(seconds)
    }

    /// Advance the engine to the clock's current time
    pub fn tick(&self) -> Result<TimerSnapshot, DispatchError> {
        let mut engine = self.lock_engine()?;
        let before = engine.phase();
        let snapshot = engine.tick(self.clock.now_millis());
        drop(engine);

        self.publish(before, &snapshot);
        Ok(snapshot)
    }

    /// Fold a suspension gap into the engine
    pub fn reconcile(&self) -> Result<TimerSnapshot, DispatchError> {
        let now = self.clock.now_millis();
        self.dispatch("reconcile", |engine| Ok(engine.reconcile_after_suspension(now)))
    }

    /// Current snapshot without advancing time
    pub fn get_snapshot(&self) -> Result<TimerSnapshot, DispatchError> {
        Ok(self.lock_engine()?.snapshot())
    }

    /// Current state in its persisted form
    pub fn get_persisted_state(&self) -> Result<TimerState, DispatchError> {
        Ok(self.lock_engine()?.state())
    }

    pub fn get_total_paused_millis(&self) -> Result<u64, DispatchError> {
        Ok(self.lock_engine()?.total_paused_millis())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

        match (hours, minutes) {
            (0, 0) => format!("{}s", seconds),
            (0, _) => format!("{}m {}s", minutes, seconds),
            _ => format!("{}h {}m {}s", hours, minutes, seconds),
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn app(interval: Option<u32>) -> (AppState, ManualClock) {
        let clock = ManualClock::new(0);
        let config = Config {
            interval,
            ..Config::default()
        };
        (AppState::new(&config, Arc::new(clock.clone())), clock)
    }

    #[test]
    fn phase_changes_are_broadcast() {
        let (state, _) = app(None);
        let mut phase_rx = state.phase_change_tx.subscribe();

        state.toggle().unwrap();
        state.toggle().unwrap();
        state.reset().unwrap();

        assert_eq!(phase_rx.try_recv().unwrap(), TimerPhase::Running);
        assert_eq!(phase_rx.try_recv().unwrap(), TimerPhase::Paused);
        assert_eq!(phase_rx.try_recv().unwrap(), TimerPhase::Stopped);
        assert!(phase_rx.try_recv().is_err());
    }

    #[test]
    fn ticks_publish_snapshots_and_boundaries() {
        let (state, clock) = app(Some(1));
        let mut boundary_rx = state.boundary_tx.subscribe();
        state.toggle().unwrap();

        clock.set(1_200);
        let snapshot = state.tick().unwrap();
        assert!(snapshot.interval_boundary_crossed);
        assert_eq!(*state.snapshot_tx.borrow(), snapshot);
        assert_eq!(boundary_rx.try_recv().unwrap().elapsed_millis, 1_200);
    }

    #[test]
    fn rejected_interval_keeps_state_and_last_action() {
        let (state, _) = app(Some(10));
        state.toggle().unwrap();

        assert!(matches!(
            state.set_interval_text("abc"),
            Err(DispatchError::Interval(IntervalError::NotANumber(_)))
        ));
        assert!(matches!(
            state.set_interval(Some(-1)),
            Err(DispatchError::Interval(IntervalError::NotPositive(-1)))
        ));
        assert_eq!(state.get_snapshot().unwrap().interval_seconds, Some(10));
        assert_eq!(state.get_last_action().0.as_deref(), Some("toggle"));
    }

    #[test]
    fn wraps_a_restored_engine() {
        let clock = ManualClock::new(90_000);
        let saved = TimerState {
            phase: TimerPhase::Running,
            elapsed_millis: 10_000,
            last_reference_millis: Some(30_000),
            ..TimerState::default()
        };
        let shared: SharedClock = Arc::new(clock);
        let engine = TimerEngine::restore(saved, Arc::clone(&shared)).unwrap();
        let state = AppState::with_engine(&Config::default(), shared, engine);

        assert_eq!(state.snapshot_tx.borrow().elapsed_millis, 10_000);
        assert_eq!(state.reconcile().unwrap().elapsed_millis, 70_000);
    }

    #[test]
    fn reconcile_folds_the_gap() {
        let (state, clock) = app(None);
        state.toggle().unwrap();
        clock.set(3_600_000);

        let snapshot = state.reconcile().unwrap();
        assert_eq!(snapshot.formatted_time, "01:00:00.0");
        assert_eq!(state.get_persisted_state().unwrap().elapsed_millis, 3_600_000);
    }
}
