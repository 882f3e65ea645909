//! Background tasks module
//!
//! The periodic tick driver and suspension recovery run alongside the HTTP
//! server.

pub mod tick_driver;
pub mod wake_up_recovery;

// Re-export main functions
pub use tick_driver::{tick_driver_task, TickSubscription};
pub use wake_up_recovery::{detect_suspension, wake_up_recovery_task};
