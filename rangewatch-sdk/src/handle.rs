//! Shared handle for feeding one monitor from several threads.

use std::sync::Arc;

use parking_lot::Mutex;
use rangewatch_types::{MonitorSnapshot, Status, Timestamp};

use crate::config::ConfigHandle;
use crate::monitor::ThresholdMonitor;

/// A cloneable handle that serializes access to a [`ThresholdMonitor`].
///
/// Collaborators run while the lock is held, so a notifier must not call
/// back into the same handle.
///
/// # Example
///
/// ```rust
/// use rangewatch_sdk::{MonitorHandle, Status, ThresholdMonitor};
///
/// let handle = MonitorHandle::new(ThresholdMonitor::new(0.0, 100.0, 5.0));
/// let worker = handle.clone();
///
/// std::thread::spawn(move || {
///     worker.check_value(Some(120.0));
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(handle.status(), Status::TooHigh);
/// ```
#[derive(Clone)]
pub struct MonitorHandle {
    inner: Arc<Mutex<ThresholdMonitor>>,
    config: ConfigHandle,
    name: String,
}

impl MonitorHandle {
    pub fn new(monitor: ThresholdMonitor) -> Self {
        let config = monitor.config().clone();
        let name = monitor.name().to_string();
        Self {
            inner: Arc::new(Mutex::new(monitor)),
            config,
            name,
        }
    }

    /// Classify a sample taken now.
    pub fn check_value(&self, sample: Option<f32>) -> Status {
        self.inner.lock().check_value(sample)
    }

    /// Classify a sample taken at `now`.
    pub fn check_value_at(&self, sample: Option<f32>, now: Timestamp) -> Status {
        self.inner.lock().check_value_at(sample, now)
    }

    pub fn status(&self) -> Status {
        self.inner.lock().status()
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.inner.lock().snapshot()
    }

    /// Publish the current snapshot outside of a transition.
    pub fn publish(&self, forced: bool) -> bool {
        self.inner.lock().publish(forced)
    }

    /// Run `f` with exclusive access to the monitor.
    pub fn with<R>(&self, f: impl FnOnce(&mut ThresholdMonitor) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Tunables of the wrapped monitor; reading them does not take the lock.
    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// Get the monitor name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for MonitorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorHandle")
            .field("name", &self.name)
            .finish()
    }
}
