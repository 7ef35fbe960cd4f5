//! Timer state structure and duration bounds

use serde::{Serialize, Serializer, ser::SerializeStruct};
use thiserror::Error;

use crate::utils::format_clock;

/// Shortest duration the stepper accepts, in seconds
pub const MIN_DURATION: u32 = 10;
/// Longest duration the stepper accepts, in seconds
pub const MAX_DURATION: u32 = 600;
/// Stepper increment, in seconds
pub const DURATION_STEP: u32 = 5;
/// Duration used when nothing else is configured
pub const DEFAULT_DURATION: u32 = 60;

/// Rejected configured durations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("duration {0}s is outside 10..=600s")]
    OutOfRange(u32),
    #[error("duration {0}s is not a multiple of 5s")]
    NotAStep(u32),
}

/// Check a duration against the stepper bounds
pub fn validate_duration(seconds: u32) -> Result<u32, DurationError> {
    if !(MIN_DURATION..=MAX_DURATION).contains(&seconds) {
        return Err(DurationError::OutOfRange(seconds));
    }
    if seconds % DURATION_STEP != 0 {
        return Err(DurationError::NotAStep(seconds));
    }
    Ok(seconds)
}

/// Direction of a stepper press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

/// Countdown state observed by the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    /// Seconds left in the current countdown
    pub remaining: u32,
    /// Whether a tick source is installed
    pub running: bool,
    /// Seed for `remaining` when a countdown starts from zero
    pub configured_duration: u32,
}

impl TimerState {
    /// Create an idle timer with the given configured duration
    pub fn new(configured_duration: u32) -> Self {
        Self {
            remaining: 0,
            running: false,
            configured_duration,
        }
    }

    /// `MM:SS` rendering of the remaining time
    pub fn display(&self) -> String {
        format_clock(self.remaining)
    }

    /// Idle with time left on the clock
    pub fn is_paused(&self) -> bool {
        !self.running && self.remaining > 0
    }

    /// Apply one stepper press, clamped to the stepper bounds
    pub fn step_duration(&mut self, step: Step) -> u32 {
        self.configured_duration = match step {
            Step::Up => (self.configured_duration + DURATION_STEP).min(MAX_DURATION),
            Step::Down => self
                .configured_duration
                .saturating_sub(DURATION_STEP)
                .max(MIN_DURATION),
        };
        self.configured_duration
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}

impl Serialize for TimerState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("TimerState", 4)?;
        s.serialize_field("remaining", &self.remaining)?;
        s.serialize_field("running", &self.running)?;
        s.serialize_field("configured_duration", &self.configured_duration)?;
        s.serialize_field("display", &self.display())?;
        s.end()
    }
}
