//! State management module
//!
//! The countdown state, the controller that mutates it, and the shared
//! application state handed to the HTTP layer.

pub mod app_state;
pub mod controller;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, Transport};
pub use controller::{CountdownController, THRESHOLDS, TICK_INTERVAL};
pub use timer_state::{validate_duration, DurationError, Step, TimerState, DEFAULT_DURATION};
