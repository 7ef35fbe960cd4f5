//! Console view of the countdown

use tokio::sync::watch;
use tracing::{debug, info};

use crate::state::TimerState;

/// Background task that logs the time display whenever it changes
///
/// Returns once the controller that owns the channel is dropped.
pub async fn console_view_task(mut updates: watch::Receiver<TimerState>) {
    info!("Starting console view task");

    let mut last = updates.borrow_and_update().clone();
    info!("[{}] idle, next countdown {}s", last.display(), last.configured_duration);

    while updates.changed().await.is_ok() {
        let current = updates.borrow_and_update().clone();

        if current.running != last.running {
            let label = if current.running {
                "running"
            } else if current.is_paused() {
                "paused"
            } else {
                "idle"
            };
            info!("[{}] {}", current.display(), label);
        } else if current.remaining != last.remaining {
            debug!("[{}]", current.display());
        }

        if current.configured_duration != last.configured_duration {
            info!("Next countdown {}s", current.configured_duration);
        }

        last = current;
    }

    debug!("Timer channel closed, console view exiting");
}
