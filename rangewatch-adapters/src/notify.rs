//! Notifier that writes transitions to the tracing log.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rangewatch_sdk::{Notification, Notifier, Status};
use tracing::{debug, info, warn};

/// A [`Notifier`] that logs each transition.
///
/// Out-of-range transitions are logged at `warn`, returns to normal at
/// `info`. When the monitor's notify hint is off everything drops to
/// `debug`.
///
/// Clones share one counter, so a clone kept by the caller still sees
/// notifications delivered to the copy handed to a monitor.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier {
    count: Arc<AtomicU64>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notifications received.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Notifier for LogNotifier {
    fn notify(&mut self, n: &Notification<'_>) {
        self.count.fetch_add(1, Ordering::Relaxed);

        if !n.notify {
            debug!(monitor = n.monitor, status = %n.status, value = n.value, "Status changed");
            return;
        }

        match n.status {
            Status::TooLow => warn!(
                monitor = n.monitor,
                value = n.value,
                min = n.min,
                "Value below range"
            ),
            Status::TooHigh => warn!(
                monitor = n.monitor,
                value = n.value,
                max = n.max,
                "Value above range"
            ),
            Status::Normal => info!(
                monitor = n.monitor,
                value = n.value,
                min = n.min,
                max = n.max,
                "Value back in range"
            ),
            Status::Empty => {}
        }
    }
}
