//! Cue Timer - A countdown timer service with audible cues
//!
//! One countdown, driven by start/pause/stop/skip and a one-second tick
//! source, plays a sound on every transition and when the remaining time
//! reaches fixed thresholds. An HTTP control panel exposes the buttons, the
//! duration stepper, and the `MM:SS` display.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::{AppState, CountdownController, TimerState};
pub use utils::signals::shutdown_signal;
