//! Wake-up recovery background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, Instant};
use tracing::{debug, info, warn};

use crate::{clock::Clock, state::AppState};

/// Wall-clock time that passed without monotonic time passing with it.
///
/// Monotonic time stands still while the host is suspended, so a wall-clock
/// jump larger than the monotonic step plus `threshold` means the process was
/// frozen. Returns the unexplained gap in milliseconds.
pub fn detect_suspension(
    previous_wall_millis: u64,
    current_wall_millis: u64,
    monotonic_elapsed: Duration,
    threshold: Duration,
) -> Option<u64> {
    let wall_delta = current_wall_millis.saturating_sub(previous_wall_millis);
    let monotonic = u64::try_from(monotonic_elapsed.as_millis()).unwrap_or(u64::MAX);
    let threshold = u64::try_from(threshold.as_millis()).unwrap_or(u64::MAX);

    let unexplained = wall_delta.saturating_sub(monotonic);
    (unexplained > threshold).then_some(unexplained)
}

/// Background task that watches for suspension gaps and reconciles the
/// engine once per detected gap
pub async fn wake_up_recovery_task(state: Arc<AppState>) {
    info!("Starting wake-up recovery task");

    let mut interval = interval(state.wake_check_interval);
    let mut last_wall = state.clock.now_millis();
    let mut last_mono = Instant::now();

    loop {
        interval.tick().await;

        let wall = state.clock.now_millis();
        let mono = Instant::now();

        if let Some(gap) = detect_suspension(last_wall, wall, mono - last_mono, state.gap_threshold) {
            info!("Wake-up detected after a {}ms gap, reconciling timer", gap);
            match state.reconcile() {
                Ok(snapshot) => debug!("Timer reconciled to {}", snapshot.formatted_time),
                Err(e) => warn!("Failed to reconcile timer after wake-up: {}", e),
            }
        }

        last_wall = wall;
        last_mono = mono;
    }
}
