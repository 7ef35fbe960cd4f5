//! Main application state: the countdown controller plus server metadata

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::{
    controller::CountdownController,
    timer_state::{DurationError, Step, TimerState},
};
use crate::{
    services::CuePlayer,
    tasks::TickScheduler,
    utils::format_uptime,
};

/// Transport buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Start,
    Pause,
    Stop,
    Skip,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Start => "start",
            Transport::Pause => "pause",
            Transport::Stop => "stop",
            Transport::Skip => "skip",
        }
    }
}

/// Shared state handed to every HTTP handler
pub struct AppState {
    /// The single countdown
    pub controller: CountdownController,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        configured_duration: u32,
        scheduler: Arc<dyn TickScheduler>,
        cues: Arc<dyn CuePlayer>,
    ) -> Self {
        Self {
            controller: CountdownController::new(configured_duration, scheduler, cues),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Press a transport button
    pub fn transport(&self, button: Transport) -> TimerState {
        self.record_action(button.as_str());
        match button {
            Transport::Start => self.controller.start(),
            Transport::Pause => self.controller.pause(),
            Transport::Stop => self.controller.stop(),
            Transport::Skip => self.controller.skip(),
        }
    }

    /// Set the configured duration; rejected values are not recorded
    pub fn set_duration(&self, seconds: u32) -> Result<TimerState, DurationError> {
        let state = self.controller.set_duration(seconds)?;
        self.record_action("duration");
        Ok(state)
    }

    /// Press the duration stepper
    pub fn step_duration(&self, step: Step) -> TimerState {
        self.record_action(match step {
            Step::Up => "duration-up",
            Step::Down => "duration-down",
        });
        self.controller.step_duration(step)
    }

    pub fn timer(&self) -> TimerState {
        self.controller.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.controller.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::MutedCuePlayer, tasks::ManualScheduler};

    fn app_state() -> (AppState, Arc<ManualScheduler>) {
        let scheduler = Arc::new(ManualScheduler::new());
        let state = AppState::new(
            20560,
            "127.0.0.1".to_string(),
            60,
            scheduler.clone(),
            Arc::new(MutedCuePlayer),
        );
        (state, scheduler)
    }

    #[test]
    fn test_transport_records_last_action() {
        let (state, scheduler) = app_state();
        assert_eq!(state.get_last_action(), (None, None));

        state.transport(Transport::Start);
        scheduler.advance(2);
        let timer = state.transport(Transport::Pause);
        assert_eq!(timer.remaining, 58);

        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("pause"));
        assert!(time.is_some());
    }

    #[test]
    fn test_rejected_duration_not_recorded() {
        let (state, _) = app_state();
        assert!(state.set_duration(3).is_err());
        assert_eq!(state.get_last_action().0, None);

        state.step_duration(Step::Up);
        assert_eq!(state.get_last_action().0.as_deref(), Some("duration-up"));
        assert_eq!(state.timer().configured_duration, 65);
    }
}
