//! Countdown controller
//!
//! Owns the [`TimerState`], turns transport commands and ticks into state
//! transitions, and fires sound cues along the way. Every command and every
//! tick runs under one lock, so they never interleave and a restart can never
//! leave two tick sources installed.

use std::{
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::timer_state::{validate_duration, DurationError, Step, TimerState};
use crate::{
    services::{Cue, CuePlayer},
    tasks::{TickCallback, TickScheduler},
};

/// Period of the countdown tick source
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Remaining-time values that fire the threshold cue
pub const THRESHOLDS: [u32; 2] = [35, 25];

/// Countdown state machine driven by start/pause/stop/skip and a tick source
pub struct CountdownController {
    core: Arc<Core>,
}

struct Core {
    inner: Mutex<Inner>,
    scheduler: Arc<dyn TickScheduler>,
    cues: Arc<dyn CuePlayer>,
    updates: watch::Sender<TimerState>,
    tick_interval: Duration,
}

struct Inner {
    timer: TimerState,
    /// Stamp of the installed tick source; bumped on every cancel
    generation: u64,
}

impl CountdownController {
    /// Create an idle controller
    ///
    /// `configured_duration` is trusted here; validate it at the boundary.
    pub fn new(
        configured_duration: u32,
        scheduler: Arc<dyn TickScheduler>,
        cues: Arc<dyn CuePlayer>,
    ) -> Self {
        let timer = TimerState::new(configured_duration);
        let (updates, _) = watch::channel(timer.clone());

        Self {
            core: Arc::new(Core {
                inner: Mutex::new(Inner { timer, generation: 0 }),
                scheduler,
                cues,
                updates,
                tick_interval: TICK_INTERVAL,
            }),
        }
    }

    /// Start or resume the countdown
    ///
    /// Seeds `remaining` from the configured duration only when it is zero.
    /// Calling this while already running reinstalls the tick source and keeps
    /// the remaining time.
    pub fn start(&self) -> TimerState {
        let core = &self.core;
        let mut inner = core.lock();

        if inner.timer.remaining == 0 {
            inner.timer.remaining = inner.timer.configured_duration;
        }
        core.cues.play(Cue::Start);

        core.cancel_ticks(&mut inner);
        let generation = inner.generation;
        let weak: Weak<Core> = Arc::downgrade(core);
        let on_tick: TickCallback = Arc::new(move || {
            if let Some(core) = weak.upgrade() {
                core.tick(generation);
            }
        });
        core.scheduler.start(core.tick_interval, on_tick);
        inner.timer.running = true;

        info!("Countdown running from {}", inner.timer.display());
        core.publish(&inner)
    }

    /// Pause, keeping the remaining time for a later start
    pub fn pause(&self) -> TimerState {
        let core = &self.core;
        let mut inner = core.lock();

        if inner.timer.running {
            core.cues.play(Cue::Pause);
            info!("Countdown paused at {}", inner.timer.display());
        }
        core.cancel_ticks(&mut inner);
        inner.timer.running = false;

        core.publish(&inner)
    }

    /// Stop and clear the remaining time
    pub fn stop(&self) -> TimerState {
        let core = &self.core;
        let mut inner = core.lock();
        core.stop_locked(&mut inner);
        core.publish(&inner)
    }

    /// Jump straight to zero
    pub fn skip(&self) -> TimerState {
        let core = &self.core;
        let mut inner = core.lock();

        core.cues.play(Cue::Skip);
        core.halt(&mut inner);
        info!("Countdown skipped to zero");

        core.publish(&inner)
    }

    /// Set the duration used by the next start from zero
    pub fn set_duration(&self, seconds: u32) -> Result<TimerState, DurationError> {
        let seconds = validate_duration(seconds)?;
        let core = &self.core;
        let mut inner = core.lock();

        inner.timer.configured_duration = seconds;
        info!("Configured duration set to {}s", seconds);
        Ok(core.publish(&inner))
    }

    /// Apply one stepper press to the configured duration
    pub fn step_duration(&self, step: Step) -> TimerState {
        let core = &self.core;
        let mut inner = core.lock();

        let seconds = inner.timer.step_duration(step);
        debug!("Configured duration stepped {:?} to {}s", step, seconds);
        core.publish(&inner)
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> TimerState {
        self.core.lock().timer.clone()
    }

    /// Observe every state change
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.core.updates.subscribe()
    }
}

impl Core {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("Timer state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn tick(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.generation != generation || !inner.timer.running {
            debug!("Ignoring tick from a cancelled source");
            return;
        }

        inner.timer.remaining = inner.timer.remaining.saturating_sub(1);
        let remaining = inner.timer.remaining;
        debug!("Tick: {}", inner.timer.display());

        if THRESHOLDS.contains(&remaining) {
            self.cues.play(Cue::Threshold);
        }
        if remaining == 0 {
            info!("Countdown finished");
            self.stop_locked(&mut inner);
        }

        self.publish(&inner);
    }

    fn stop_locked(&self, inner: &mut Inner) {
        self.cues.play(Cue::Stop);
        self.halt(inner);
        info!("Countdown stopped");
    }

    fn halt(&self, inner: &mut Inner) {
        self.cancel_ticks(inner);
        inner.timer.remaining = 0;
        inner.timer.running = false;
    }

    fn cancel_ticks(&self, inner: &mut Inner) {
        self.scheduler.cancel();
        inner.generation = inner.generation.wrapping_add(1);
    }

    fn publish(&self, inner: &Inner) -> TimerState {
        let state = inner.timer.clone();
        self.updates.send_replace(state.clone());
        state
    }
}
