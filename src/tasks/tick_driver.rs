//! Periodic tick driver background task

use std::sync::Arc;
use tokio::{
    sync::broadcast::error::RecvError,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use crate::state::{AppState, TimerPhase};

/// A running periodic ticker. Dropping it stops the ticks.
#[derive(Debug)]
pub struct TickSubscription {
    handle: JoinHandle<()>,
}

impl TickSubscription {
    /// Start ticking the engine at the host's configured cadence
    pub fn acquire(state: Arc<AppState>) -> Self {
        debug!("Acquiring tick driver every {:?}", state.tick_interval);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(state.tick_interval);
            // Late ticks are harmless: the engine measures wall-clock deltas.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let Err(e) = state.tick() {
                    error!("Failed to tick timer: {}", e);
                }
            }
        });
        Self { handle }
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for TickSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Background task that holds a tick subscription exactly while the timer is
/// running.
///
/// Cancelling this task releases the subscription too.
pub async fn tick_driver_task(state: Arc<AppState>) {
    info!("Starting tick driver task");

    let mut phase_rx = state.phase_change_tx.subscribe();
    let mut subscription: Option<TickSubscription> = None;
    let mut phase = current_phase(&state);

    loop {
        match (phase, subscription.is_some()) {
            (TimerPhase::Running, false) => {
                info!("Timer running, starting tick driver");
                subscription = Some(TickSubscription::acquire(Arc::clone(&state)));
            }
            (TimerPhase::Running, true) => {}
            (_, true) => {
                info!("Timer {:?}, stopping tick driver", phase);
                subscription = None;
            }
            (_, false) => {}
        }

        phase = match phase_rx.recv().await {
            Ok(phase) => phase,
            Err(RecvError::Lagged(skipped)) => {
                warn!("Tick driver missed {} phase changes, re-reading phase", skipped);
                current_phase(&state)
            }
            Err(RecvError::Closed) => {
                info!("Phase channel closed, stopping tick driver task");
                break;
            }
        };
    }
}

fn current_phase(state: &AppState) -> TimerPhase {
    match state.get_snapshot() {
        Ok(snapshot) => snapshot.phase,
        Err(e) => {
            error!("Failed to read timer phase: {}", e);
            TimerPhase::Stopped
        }
    }
}
