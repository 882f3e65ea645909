//! State management module
//!
//! The persisted timer state and the host's shared application state.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, DispatchError};
pub use timer_state::{TimerPhase, TimerState};
