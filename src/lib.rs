//! Tapwatch - a suspension-resilient stopwatch engine
//!
//! The core is [`TimerEngine`], a single-threaded state machine that measures
//! running time as wall-clock deltas, so suspending the host while the timer
//! runs does not lose time. Around it sits a small tokio host: a tick driver,
//! wake-up recovery, and an HTTP control surface for a presentation layer.

pub mod api;
pub mod clock;
pub mod config;
pub mod engine;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use config::Config;
pub use engine::{
    formatted_time, parse_interval, status_label, IntervalError, RestoreError, TimerEngine,
    TimerSnapshot,
};
pub use state::{AppState, DispatchError, TimerPhase, TimerState};
pub use utils::signals::shutdown_signal;
