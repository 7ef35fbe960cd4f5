//! Background tasks module
//!
//! Tick sources for the countdown and the console view that follows it.

pub mod console_view;
pub mod ticker;

// Re-export main types
pub use console_view::console_view_task;
pub use ticker::{IntervalScheduler, ManualScheduler, TickCallback, TickScheduler};
