//! Periodic tick sources
//!
//! The controller never touches a clock directly. It installs a callback on a
//! [`TickScheduler`]; production uses a tokio interval, tests use a
//! [`ManualScheduler`] advanced by hand.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error};

/// Callback invoked once per tick
pub type TickCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// A cancellable periodic tick source
///
/// `start` replaces any source that is already installed; at most one is
/// ever active.
pub trait TickScheduler: Send + Sync {
    fn start(&self, interval: Duration, on_tick: TickCallback);
    fn cancel(&self);
}

/// Tick source backed by a spawned tokio interval task
pub struct IntervalScheduler {
    runtime: Handle,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl IntervalScheduler {
    /// Use the runtime of the calling context
    ///
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        Self {
            runtime: Handle::current(),
            task: Mutex::new(None),
        }
    }

    fn abort_current(slot: &mut Option<JoinHandle<()>>) {
        if let Some(task) = slot.take() {
            task.abort();
            debug!("Tick task aborted");
        }
    }
}

impl TickScheduler for IntervalScheduler {
    fn start(&self, period: Duration, on_tick: TickCallback) {
        let mut slot = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        Self::abort_current(&mut slot);

        let task = self.runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                on_tick();
            }
        });
        *slot = Some(task);
        debug!("Tick task started with period {:?}", period);
    }

    fn cancel(&self) {
        match self.task.lock() {
            Ok(mut slot) => Self::abort_current(&mut slot),
            Err(poisoned) => {
                error!("Tick task slot poisoned, aborting anyway");
                Self::abort_current(&mut poisoned.into_inner());
            }
        }
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Deterministic tick source for tests and simulations
#[derive(Default)]
pub struct ManualScheduler {
    inner: Mutex<ManualInner>,
}

#[derive(Default)]
struct ManualInner {
    callback: Option<TickCallback>,
    period: Option<Duration>,
    installs: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> std::sync::MutexGuard<'_, ManualInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fire up to `ticks` ticks, stopping early once the source is cancelled
    ///
    /// Returns the number of ticks actually delivered.
    pub fn advance(&self, ticks: usize) -> usize {
        let mut fired = 0;
        for _ in 0..ticks {
            // Release the lock before calling out: the callback may cancel.
            let Some(callback) = self.inner().callback.clone() else {
                break;
            };
            callback();
            fired += 1;
        }
        fired
    }

    /// Whether a tick source is installed
    pub fn is_active(&self) -> bool {
        self.inner().callback.is_some()
    }

    /// How many times a source has been installed
    pub fn installs(&self) -> usize {
        self.inner().installs
    }

    /// Period requested by the most recent install
    pub fn period(&self) -> Option<Duration> {
        self.inner().period
    }
}

impl TickScheduler for ManualScheduler {
    fn start(&self, period: Duration, on_tick: TickCallback) {
        let mut inner = self.inner();
        inner.callback = Some(on_tick);
        inner.period = Some(period);
        inner.installs += 1;
    }

    fn cancel(&self) {
        self.inner().callback = None;
    }
}
