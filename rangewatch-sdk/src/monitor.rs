//! The threshold monitor and its builder.

use std::fmt;
use std::sync::Arc;

use rangewatch_types::{MonitorSnapshot, Status, Timestamp};
use tracing::{debug, warn};

use crate::config::{ConfigHandle, MonitorConfig, Param, ParamField, ParamGroup, ParamRegistry};
use crate::format::SnapshotFormat;
use crate::gateway::{Notification, Notifier, Publication, Publisher, RouteBuilder, StateStore};
use crate::state::MonitorState;

/// Watches a stream of samples and reports range transitions once each.
///
/// Every transition triggers, in order: a write to the state store (if a
/// namespace and store are configured), a publish of the JSON snapshot (if a
/// route and publisher are set), and a call to the notifier (if one is
/// registered and the transition warrants it). All of it happens inside the
/// `check_value` call that caused the transition.
///
/// The monitor holds no locks of its own. Callers feeding it from several
/// threads wrap it in a [`MonitorHandle`](crate::MonitorHandle).
///
/// # Example
///
/// ```rust
/// use rangewatch_sdk::{Notification, Status, ThresholdMonitor};
///
/// let mut monitor = ThresholdMonitor::builder()
///     .name("greenhouse")
///     .range(10.0, 30.0)
///     .hysteresis(2.0)
///     .on_notify(|n: &Notification<'_>| println!("{} is now {}", n.monitor, n.status))
///     .build();
///
/// assert_eq!(monitor.check_value(Some(5.0)), Status::TooLow);
/// assert_eq!(monitor.check_value(Some(11.0)), Status::TooLow); // inside the deadband
/// assert_eq!(monitor.check_value(Some(12.0)), Status::Normal);
/// assert_eq!(monitor.check_value(None), Status::Normal);
/// ```
pub struct ThresholdMonitor {
    name: String,
    config: ConfigHandle,
    state: MonitorState,
    route: Option<String>,
    namespace: Option<String>,
    store: Option<Arc<dyn StateStore>>,
    publisher: Option<Box<dyn Publisher>>,
    notifier: Option<Box<dyn Notifier>>,
    format: SnapshotFormat,
    forced_publish: bool,
}

impl ThresholdMonitor {
    /// Create a monitor with no collaborators attached.
    pub fn new(min: f32, max: f32, hysteresis: f32) -> Self {
        Self::builder().range(min, max).hysteresis(hysteresis).build()
    }

    /// Create a builder for configuring the monitor.
    pub fn builder() -> ThresholdMonitorBuilder {
        ThresholdMonitorBuilder::new()
    }

    /// Classify a sample taken now.
    ///
    /// `None`, NaN and infinities are not samples: the state is left
    /// untouched and no collaborator is called. Returns the status after the sample.
    pub fn check_value(&mut self, sample: Option<f32>) -> Status {
        self.check_value_at(sample, Timestamp::now())
    }

    /// Classify a sample taken at `now`.
    pub fn check_value_at(&mut self, sample: Option<f32>, now: Timestamp) -> Status {
        let Some(value) = sample.filter(|v| v.is_finite()) else {
            return self.state.status;
        };

        let config = self.config.get();
        if let Some(change) = self.state.apply(value, &config, now) {
            debug!(
                monitor = %self.name,
                from = %change.from,
                to = %change.to,
                value,
                "Status changed"
            );
            self.persist();
            self.publish(self.forced_publish);
            if change.notify {
                self.notify(value, &config);
            }
        }
        self.state.status
    }

    /// Current status.
    pub fn status(&self) -> Status {
        self.state.status
    }

    /// Full current state.
    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last_value(&self) -> Option<f32> {
        self.state.last_value
    }

    pub fn last_normal_at(&self) -> Option<Timestamp> {
        self.state.last_normal
    }

    pub fn last_low_at(&self) -> Option<Timestamp> {
        self.state.last_low
    }

    pub fn last_high_at(&self) -> Option<Timestamp> {
        self.state.last_high
    }

    pub fn min(&self) -> f32 {
        self.config.get().min
    }

    pub fn max(&self) -> f32 {
        self.config.get().max
    }

    pub fn hysteresis(&self) -> f32 {
        self.config.get().hysteresis
    }

    pub fn notify_enabled(&self) -> bool {
        self.config.get().notify
    }

    /// Shared handle to the tunables.
    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// Replace the notifier, or remove it with `None`.
    pub fn set_notifier(&mut self, notifier: Option<Box<dyn Notifier>>) {
        self.notifier = notifier;
    }

    /// Replace the publisher, or remove it with `None`.
    pub fn set_publisher(&mut self, publisher: Option<Box<dyn Publisher>>) {
        self.publisher = publisher;
    }

    // ------------------------------------------------------------------
    // Snapshot
    // ------------------------------------------------------------------

    /// Point-in-time view used as the publish payload.
    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            status: self.state.status,
            value: self.state.last_value,
            last_normal: self.format.format(self.state.last_normal),
            last_min: self.format.format(self.state.last_low),
            last_max: self.format.format(self.state.last_high),
        }
    }

    /// The snapshot as JSON.
    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshot())
    }

    // ------------------------------------------------------------------
    // Publish
    // ------------------------------------------------------------------

    /// Current publish route.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Replace the route, dropping the previous one. Returns whether a route
    /// is now set.
    pub fn set_route(&mut self, route: Option<String>) -> bool {
        self.route = route;
        self.route.is_some()
    }

    /// Build the route from up to three segments with an external builder.
    pub fn create_route(
        &mut self,
        builder: &dyn RouteBuilder,
        primary: bool,
        local: bool,
        segments: &[&str],
    ) -> bool {
        self.set_route(builder.build(primary, local, segments))
    }

    /// Drop the route; further publishes are skipped until a new one is set.
    pub fn clear_route(&mut self) {
        self.route = None;
    }

    /// Publish the current snapshot.
    ///
    /// Transitions call this with the monitor's configured forced flag;
    /// callers may use it directly for heartbeats. Returns false when no
    /// route or publisher is set, or when the transport rejects the payload.
    pub fn publish(&mut self, forced: bool) -> bool {
        if self.route.is_none() || self.publisher.is_none() {
            return false;
        }

        let payload = match self.snapshot_json() {
            Ok(payload) => payload,
            Err(err) => {
                warn!(monitor = %self.name, error = %err, "Failed to encode snapshot");
                return false;
            }
        };

        match (self.route.as_deref(), self.publisher.as_mut()) {
            (Some(route), Some(publisher)) => {
                let accepted = publisher.publish(Publication {
                    monitor: &self.name,
                    route,
                    payload,
                    forced,
                });
                if !accepted {
                    debug!(monitor = %self.name, route, "Publish rejected");
                }
                accepted
            }
            _ => false,
        }
    }

    fn notify(&mut self, value: f32, config: &MonitorConfig) {
        if let Some(notifier) = self.notifier.as_mut() {
            notifier.notify(&Notification {
                monitor: &self.name,
                status: self.state.status,
                notify: config.notify,
                value,
                min: config.min,
                max: config.max,
            });
        }
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Namespace the monitor persists under.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn persist(&self) {
        if let Some(namespace) = self.namespace.as_deref() {
            self.store_to(namespace);
        }
    }

    /// Write the current state under `namespace`.
    ///
    /// Nothing is written while the status is `Empty` or when no store is
    /// attached. Store errors are logged and reported as `false`.
    pub fn store_to(&self, namespace: &str) -> bool {
        if self.state.status == Status::Empty {
            return false;
        }
        let Some(store) = self.store.as_ref() else {
            return false;
        };

        match store.store(namespace, &self.state.to_record()) {
            Ok(()) => true,
            Err(err) => {
                warn!(monitor = %self.name, namespace, error = %err, "Failed to store state");
                false
            }
        }
    }

    /// Seed the state from the monitor's own namespace.
    pub fn restore(&mut self) -> bool {
        match self.namespace.clone() {
            Some(namespace) => self.restore_from(&namespace),
            None => false,
        }
    }

    /// Seed the state from `namespace`.
    ///
    /// Returns false, keeping the in-memory state, if nothing is stored, the
    /// store fails, or the stored status is not restorable.
    pub fn restore_from(&mut self, namespace: &str) -> bool {
        let Some(store) = self.store.as_ref() else {
            return false;
        };

        match store.load(namespace) {
            Ok(Some(record)) => {
                let restored = self.state.restore(&record);
                if restored {
                    debug!(monitor = %self.name, namespace, status = %self.state.status, "State restored");
                } else {
                    warn!(
                        monitor = %self.name,
                        namespace,
                        code = record.status,
                        "Discarding stored state"
                    );
                }
                restored
            }
            Ok(None) => false,
            Err(err) => {
                warn!(monitor = %self.name, namespace, error = %err, "Failed to load state");
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------

    /// Expose the four tunables to a registry under `group`.
    pub fn register_params(&self, registry: &mut dyn ParamRegistry, group: &ParamGroup) {
        for field in ParamField::ALL {
            registry.register(group, Param::new(field, self.config.clone()));
        }
    }
}

impl fmt::Debug for ThresholdMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThresholdMonitor")
            .field("name", &self.name)
            .field("config", &self.config.get())
            .field("state", &self.state)
            .field("route", &self.route)
            .field("namespace", &self.namespace)
            .finish()
    }
}

/// Builder for configuring a [`ThresholdMonitor`].
///
/// Capabilities are opt-in: without [`storage`](Self::storage) the monitor
/// never persists, and [`forced_publish`](Self::forced_publish) decides
/// whether state-change publishes carry the forced flag.
pub struct ThresholdMonitorBuilder {
    name: Option<String>,
    config: MonitorConfig,
    namespace: Option<String>,
    store: Option<Arc<dyn StateStore>>,
    publisher: Option<Box<dyn Publisher>>,
    notifier: Option<Box<dyn Notifier>>,
    route: Option<String>,
    format: SnapshotFormat,
    forced_publish: bool,
    restore: bool,
}

impl ThresholdMonitorBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            name: None,
            config: MonitorConfig::default(),
            namespace: None,
            store: None,
            publisher: None,
            notifier: None,
            route: None,
            format: SnapshotFormat::default(),
            forced_publish: true,
            restore: false,
        }
    }

    /// Name passed to collaborators. Defaults to `"monitor"`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Inclusive valid range.
    pub fn range(mut self, min: f32, max: f32) -> Self {
        self.config.min = min;
        self.config.max = max;
        self
    }

    pub fn hysteresis(mut self, hysteresis: f32) -> Self {
        self.config.hysteresis = hysteresis;
        self
    }

    /// Notification hint forwarded to the notifier. Defaults to true.
    pub fn notify(mut self, notify: bool) -> Self {
        self.config.notify = notify;
        self
    }

    /// Set the whole configuration at once.
    pub fn config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Persist state under `namespace` in `store`.
    pub fn storage(mut self, namespace: impl Into<String>, store: Arc<dyn StateStore>) -> Self {
        self.namespace = Some(namespace.into());
        self.store = Some(store);
        self
    }

    pub fn publisher(mut self, publisher: impl Publisher + 'static) -> Self {
        self.publisher = Some(Box::new(publisher));
        self
    }

    /// Use a closure as the publisher.
    pub fn on_publish<F>(self, f: F) -> Self
    where
        F: FnMut(Publication<'_>) -> bool + Send + 'static,
    {
        self.publisher(f)
    }

    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Use a closure as the notifier.
    pub fn on_notify<F>(self, f: F) -> Self
    where
        F: FnMut(&Notification<'_>) + Send + 'static,
    {
        self.notifier(f)
    }

    /// Initial publish route.
    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Snapshot timestamp rendering.
    pub fn format(mut self, format: SnapshotFormat) -> Self {
        self.format = format;
        self
    }

    /// Whether state-change publishes set the forced flag. Defaults to true.
    pub fn forced_publish(mut self, forced: bool) -> Self {
        self.forced_publish = forced;
        self
    }

    /// Restore state from storage as part of `build`.
    pub fn restore_on_build(mut self, restore: bool) -> Self {
        self.restore = restore;
        self
    }

    /// Build the monitor.
    pub fn build(self) -> ThresholdMonitor {
        let mut monitor = ThresholdMonitor {
            name: self.name.unwrap_or_else(|| "monitor".to_string()),
            config: ConfigHandle::new(self.config),
            state: MonitorState::default(),
            route: self.route,
            namespace: self.namespace,
            store: self.store,
            publisher: self.publisher,
            notifier: self.notifier,
            format: self.format,
            forced_publish: self.forced_publish,
        };
        if self.restore {
            monitor.restore();
        }
        monitor
    }
}

impl Default for ThresholdMonitorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use parking_lot::Mutex;
    use rangewatch_types::PersistedState;

    use super::*;
    use crate::config::ParamValue;
    use crate::error::StoreError;

    const T0: Timestamp = Timestamp::from_secs(1_703_160_000);

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Store(String, i8),
        Publish {
            route: String,
            payload: String,
            forced: bool,
        },
        Notify {
            status: Status,
            notify: bool,
            value: f32,
        },
    }

    type Log = Arc<Mutex<Vec<Event>>>;

    #[derive(Default)]
    struct TestStore {
        records: Mutex<HashMap<String, PersistedState>>,
        log: Option<Log>,
        fail: bool,
    }

    impl StateStore for TestStore {
        fn store(&self, namespace: &str, record: &PersistedState) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::Open {
                    namespace: namespace.to_string(),
                    reason: "flash busy".to_string(),
                });
            }
            if let Some(log) = &self.log {
                log.lock().push(Event::Store(namespace.to_string(), record.status));
            }
            self.records.lock().insert(namespace.to_string(), *record);
            Ok(())
        }

        fn load(&self, namespace: &str) -> Result<Option<PersistedState>, StoreError> {
            if self.fail {
                return Err(StoreError::Read("flash busy".to_string()));
            }
            Ok(self.records.lock().get(namespace).copied())
        }
    }

    fn recording_monitor(log: &Log, store: Arc<TestStore>, accept: bool) -> ThresholdMonitor {
        let publish_log = log.clone();
        let notify_log = log.clone();
        ThresholdMonitor::builder()
            .name("test")
            .range(10.0, 30.0)
            .hysteresis(2.0)
            .storage("ns", store)
            .route("home/sensor")
            .on_publish(move |p: Publication<'_>| {
                publish_log.lock().push(Event::Publish {
                    route: p.route.to_string(),
                    payload: p.payload,
                    forced: p.forced,
                });
                accept
            })
            .on_notify(move |n: &Notification<'_>| {
                notify_log.lock().push(Event::Notify {
                    status: n.status,
                    notify: n.notify,
                    value: n.value,
                });
            })
            .build()
    }

    fn logged_store(log: &Log) -> Arc<TestStore> {
        Arc::new(TestStore {
            log: Some(log.clone()),
            ..Default::default()
        })
    }

    fn kinds(log: &Log) -> Vec<&'static str> {
        log.lock()
            .iter()
            .map(|e| match e {
                Event::Store(..) => "store",
                Event::Publish { .. } => "publish",
                Event::Notify { .. } => "notify",
            })
            .collect()
    }

    #[test]
    fn test_scenario_sequence() {
        let mut monitor = ThresholdMonitor::new(10.0, 30.0, 2.0);
        let statuses: Vec<Status> = [5.0, 9.0, 12.0, 29.0, 32.0, 11.0]
            .into_iter()
            .map(|v| monitor.check_value_at(Some(v), T0))
            .collect();

        assert_eq!(
            statuses,
            vec![
                Status::TooLow,
                Status::TooLow,
                Status::Normal,
                Status::Normal,
                Status::TooHigh,
                Status::TooHigh
            ]
        );
    }

    #[test]
    fn test_side_effects_run_in_order() {
        let log = Log::default();
        let mut monitor = recording_monitor(&log, logged_store(&log), true);

        monitor.check_value_at(Some(5.0), T0);

        assert_eq!(kinds(&log), vec!["store", "publish", "notify"]);
        assert_eq!(log.lock()[0], Event::Store("ns".to_string(), -1));
    }

    #[test]
    fn test_first_normal_is_not_notified() {
        let log = Log::default();
        let mut monitor = recording_monitor(&log, logged_store(&log), true);

        assert_eq!(monitor.check_value_at(Some(20.0), T0), Status::Normal);
        assert_eq!(kinds(&log), vec!["store", "publish"]);
    }

    #[test]
    fn test_recovery_is_notified() {
        let log = Log::default();
        let mut monitor = recording_monitor(&log, logged_store(&log), true);

        monitor.check_value_at(Some(35.0), T0);
        log.lock().clear();
        monitor.check_value_at(Some(20.0), T0);

        assert_eq!(kinds(&log), vec!["store", "publish", "notify"]);
        assert_eq!(
            log.lock()[2],
            Event::Notify {
                status: Status::Normal,
                notify: true,
                value: 20.0
            }
        );
    }

    #[test]
    fn test_steady_values_have_no_side_effects() {
        let log = Log::default();
        let mut monitor = recording_monitor(&log, logged_store(&log), true);

        monitor.check_value_at(Some(20.0), T0);
        log.lock().clear();
        for _ in 0..5 {
            monitor.check_value_at(Some(20.0), T0);
        }

        assert!(log.lock().is_empty());
        assert_eq!(monitor.status(), Status::Normal);
    }

    #[test]
    fn test_deadband_has_no_side_effects() {
        let log = Log::default();
        let mut monitor = recording_monitor(&log, logged_store(&log), true);

        monitor.check_value_at(Some(5.0), T0);
        log.lock().clear();
        monitor.check_value_at(Some(11.0), T0);
        monitor.check_value_at(Some(40.0), T0);

        assert!(log.lock().is_empty());
        assert_eq!(monitor.status(), Status::TooLow);
        assert_eq!(monitor.last_value(), Some(40.0));
    }

    #[test]
    fn test_missing_samples_are_ignored() {
        let log = Log::default();
        let mut monitor = recording_monitor(&log, logged_store(&log), true);
        monitor.check_value_at(Some(20.0), T0);
        log.lock().clear();

        assert_eq!(monitor.check_value_at(None, T0), Status::Normal);
        assert_eq!(monitor.check_value_at(Some(f32::NAN), T0), Status::Normal);
        assert_eq!(monitor.check_value_at(Some(f32::INFINITY), T0), Status::Normal);
        assert_eq!(monitor.check_value_at(Some(f32::NEG_INFINITY), T0), Status::Normal);

        assert!(log.lock().is_empty());
        assert_eq!(monitor.last_value(), Some(20.0));
    }

    #[test]
    fn test_missing_first_sample_stays_empty() {
        let mut monitor = ThresholdMonitor::new(10.0, 30.0, 2.0);
        assert_eq!(monitor.check_value(None), Status::Empty);
        assert_eq!(monitor.last_value(), None);
        assert_eq!(monitor.last_normal_at(), None);
    }

    #[test]
    fn test_infinite_samples_keep_snapshot_value_intact() {
        let mut monitor = ThresholdMonitor::new(10.0, 30.0, 2.0);

        assert_eq!(monitor.check_value_at(Some(f32::INFINITY), T0), Status::Empty);
        assert_eq!(monitor.check_value_at(Some(f32::NEG_INFINITY), T0), Status::Empty);
        assert_eq!(monitor.last_value(), None);

        monitor.check_value_at(Some(31.5), T0);
        monitor.check_value_at(Some(f32::INFINITY), T0);

        let parsed: MonitorSnapshot =
            serde_json::from_str(&monitor.snapshot_json().unwrap()).unwrap();
        assert_eq!(parsed.status, Status::TooHigh);
        assert_eq!(parsed.value, Some(31.5));
    }

    #[test]
    fn test_timestamps_recorded_per_status() {
        let mut monitor = ThresholdMonitor::new(10.0, 30.0, 2.0);
        let t1 = Timestamp::from_secs(T0.as_secs() + 60);
        let t2 = Timestamp::from_secs(T0.as_secs() + 120);

        monitor.check_value_at(Some(20.0), T0);
        monitor.check_value_at(Some(5.0), t1);
        monitor.check_value_at(Some(20.0), t2);

        assert_eq!(monitor.last_low_at(), Some(t1));
        assert_eq!(monitor.last_normal_at(), Some(t2));
        assert_eq!(monitor.last_high_at(), None);
    }

    #[test]
    fn test_rejected_publish_keeps_transition() {
        let log = Log::default();
        let mut monitor = recording_monitor(&log, logged_store(&log), false);

        assert_eq!(monitor.check_value_at(Some(5.0), T0), Status::TooLow);
        assert_eq!(kinds(&log), vec!["store", "publish", "notify"]);
        assert!(!monitor.publish(false));
    }

    #[test]
    fn test_store_failure_is_swallowed() {
        let log = Log::default();
        let store = Arc::new(TestStore {
            fail: true,
            ..Default::default()
        });
        let mut monitor = recording_monitor(&log, store, true);

        assert_eq!(monitor.check_value_at(Some(5.0), T0), Status::TooLow);
        assert_eq!(kinds(&log), vec!["publish", "notify"]);
        assert!(!monitor.store_to("ns"));
        assert!(!monitor.restore());
    }

    #[test]
    fn test_no_namespace_no_persistence() {
        let log = Log::default();
        let notify_log = log.clone();
        let mut monitor = ThresholdMonitor::builder()
            .range(10.0, 30.0)
            .on_notify(move |n: &Notification<'_>| {
                notify_log.lock().push(Event::Notify {
                    status: n.status,
                    notify: n.notify,
                    value: n.value,
                })
            })
            .build();

        monitor.check_value_at(Some(50.0), T0);
        assert_eq!(kinds(&log), vec!["notify"]);
        assert_eq!(monitor.namespace(), None);
        assert!(!monitor.restore());
    }

    #[test]
    fn test_publish_payload_is_snapshot() {
        let log = Log::default();
        let mut monitor = recording_monitor(&log, logged_store(&log), true);

        monitor.check_value_at(Some(33.5), T0);

        let payload = match &log.lock()[1] {
            Event::Publish {
                route,
                payload,
                forced,
            } => {
                assert_eq!(route, "home/sensor");
                assert!(*forced);
                payload.clone()
            }
            other => panic!("unexpected event {other:?}"),
        };

        let parsed: MonitorSnapshot = serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed.status, Status::TooHigh);
        assert_eq!(parsed.value, Some(33.5));
        assert_eq!(parsed.last_normal, "--");
        assert_ne!(parsed.last_max, "--");
    }

    #[test]
    fn test_unforced_publish_mode() {
        let log = Log::default();
        let publish_log = log.clone();
        let mut monitor = ThresholdMonitor::builder()
            .range(10.0, 30.0)
            .route("r")
            .forced_publish(false)
            .on_publish(move |p: Publication<'_>| {
                publish_log.lock().push(Event::Publish {
                    route: p.route.to_string(),
                    payload: p.payload,
                    forced: p.forced,
                });
                true
            })
            .build();

        monitor.check_value_at(Some(5.0), T0);
        assert!(monitor.publish(true));

        let forced: Vec<bool> = log
            .lock()
            .iter()
            .filter_map(|e| match e {
                Event::Publish { forced, .. } => Some(*forced),
                _ => None,
            })
            .collect();
        assert_eq!(forced, vec![false, true]);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut monitor = ThresholdMonitor::new(10.0, 30.0, 2.0);
        monitor.check_value_at(Some(7.25), T0);

        let json = monitor.snapshot_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["status"], -1);
        assert_eq!(value["value"], 7.25);
        assert_eq!(value["last_normal"], "--");
        assert_eq!(value["last_max"], "--");
    }

    #[test]
    fn test_snapshot_before_any_sample() {
        let monitor = ThresholdMonitor::new(10.0, 30.0, 2.0);
        let snapshot = monitor.snapshot();

        assert_eq!(snapshot.status, Status::Empty);
        assert_eq!(snapshot.value, None);
        assert_eq!(snapshot.last_min, "--");
    }

    #[test]
    fn test_custom_snapshot_format() {
        let mut monitor = ThresholdMonitor::builder()
            .range(10.0, 30.0)
            .format(SnapshotFormat::new("%s", "never"))
            .build();

        monitor.check_value_at(Some(50.0), T0);
        let snapshot = monitor.snapshot();

        assert_eq!(snapshot.last_max, "1703160000");
        assert_eq!(snapshot.last_min, "never");
    }

    #[test]
    fn test_store_then_restore_on_fresh_instance() {
        for (sample, expected) in [
            (5.0, Status::TooLow),
            (20.0, Status::Normal),
            (50.0, Status::TooHigh),
        ] {
            let store = Arc::new(TestStore::default());
            let mut monitor = ThresholdMonitor::builder()
                .range(10.0, 30.0)
                .storage("ns", store.clone())
                .build();
            monitor.check_value_at(Some(sample), T0);

            let fresh = ThresholdMonitor::builder()
                .range(10.0, 30.0)
                .storage("ns", store)
                .restore_on_build(true)
                .build();

            assert_eq!(fresh.status(), expected);
            assert_eq!(fresh.last_normal_at(), monitor.last_normal_at());
            assert_eq!(fresh.last_low_at(), monitor.last_low_at());
            assert_eq!(fresh.last_high_at(), monitor.last_high_at());
        }
    }

    #[test]
    fn test_invalid_stored_status_is_discarded() {
        let store = Arc::new(TestStore::default());
        let mut record = PersistedState::new(Status::TooLow, Some(T0), Some(T0), None);
        record.status = 9;
        store.records.lock().insert("ns".to_string(), record);

        let mut monitor = ThresholdMonitor::builder()
            .range(10.0, 30.0)
            .storage("ns", store)
            .build();

        assert!(!monitor.restore());
        assert_eq!(monitor.status(), Status::Empty);
        assert_eq!(monitor.last_low_at(), None);
    }

    #[test]
    fn test_restored_state_continues_with_hysteresis() {
        let store = Arc::new(TestStore::default());
        store.records.lock().insert(
            "ns".to_string(),
            PersistedState::new(Status::TooHigh, None, None, Some(T0)),
        );

        let mut monitor = ThresholdMonitor::builder()
            .range(10.0, 30.0)
            .hysteresis(2.0)
            .storage("ns", store)
            .restore_on_build(true)
            .build();

        assert_eq!(monitor.check_value_at(Some(29.0), T0), Status::TooHigh);
        assert_eq!(monitor.check_value_at(Some(28.0), T0), Status::Normal);
    }

    #[test]
    fn test_empty_state_is_never_stored() {
        let store = Arc::new(TestStore::default());
        let monitor = ThresholdMonitor::builder()
            .storage("ns", store.clone())
            .build();

        assert!(!monitor.store_to("ns"));
        assert!(store.records.lock().is_empty());
    }

    #[test]
    fn test_store_to_other_namespace() {
        let store = Arc::new(TestStore::default());
        let mut monitor = ThresholdMonitor::builder()
            .range(10.0, 30.0)
            .storage("ns", store.clone())
            .build();
        monitor.check_value_at(Some(20.0), T0);

        assert!(monitor.store_to("backup"));

        let mut other = ThresholdMonitor::builder().storage("x", store).build();
        assert!(other.restore_from("backup"));
        assert_eq!(other.status(), Status::Normal);
    }

    #[test]
    fn test_route_management() {
        let mut monitor = ThresholdMonitor::new(10.0, 30.0, 2.0);
        assert_eq!(monitor.route(), None);
        assert!(!monitor.publish(true));

        assert!(monitor.set_route(Some("a/b".to_string())));
        assert_eq!(monitor.route(), Some("a/b"));

        let builder = |primary: bool, local: bool, segments: &[&str]| {
            let scope = if local { "local" } else { "remote" };
            primary.then(|| format!("{scope}/{}", segments.join("/")))
        };
        assert!(monitor.create_route(&builder, true, true, &["dev", "temp"]));
        assert_eq!(monitor.route(), Some("local/dev/temp"));

        assert!(!monitor.create_route(&builder, false, true, &["x"]));
        assert_eq!(monitor.route(), None);

        monitor.set_route(Some("c".to_string()));
        monitor.clear_route();
        assert_eq!(monitor.route(), None);
    }

    #[test]
    fn test_publish_without_publisher_is_false() {
        let mut monitor = ThresholdMonitor::builder().route("a").build();
        assert!(!monitor.publish(true));
    }

    #[test]
    fn test_replace_collaborators() {
        let log = Log::default();
        let mut monitor = recording_monitor(&log, logged_store(&log), true);
        monitor.set_notifier(None);
        monitor.set_publisher(None);

        monitor.check_value_at(Some(5.0), T0);
        assert_eq!(kinds(&log), vec!["store"]);

        let notify_log = log.clone();
        monitor.set_notifier(Some(Box::new(move |n: &Notification<'_>| {
            notify_log.lock().push(Event::Notify {
                status: n.status,
                notify: n.notify,
                value: n.value,
            })
        })));
        monitor.check_value_at(Some(20.0), T0);
        assert_eq!(kinds(&log), vec!["store", "store", "notify"]);
    }

    #[test]
    fn test_runtime_config_changes_apply() {
        let mut monitor = ThresholdMonitor::new(10.0, 30.0, 2.0);
        monitor.check_value_at(Some(25.0), T0);

        monitor
            .config()
            .set(ParamField::Max, ParamValue::Float(20.0))
            .unwrap();

        assert_eq!(monitor.max(), 20.0);
        assert_eq!(monitor.check_value_at(Some(25.0), T0), Status::TooHigh);
    }

    #[test]
    fn test_notify_hint_is_forwarded() {
        let log = Log::default();
        let mut monitor = recording_monitor(&log, logged_store(&log), true);
        monitor
            .config()
            .set(ParamField::Notify, ParamValue::Bool(false))
            .unwrap();

        monitor.check_value_at(Some(5.0), T0);

        assert!(log.lock().contains(&Event::Notify {
            status: Status::TooLow,
            notify: false,
            value: 5.0
        }));
    }

    #[derive(Default)]
    struct TestRegistry {
        entries: Vec<(String, Param)>,
    }

    impl ParamRegistry for TestRegistry {
        fn register(&mut self, group: &ParamGroup, param: Param) {
            self.entries.push((group.key.clone(), param));
        }
    }

    #[test]
    fn test_register_params_exposes_four_tunables() {
        let monitor = ThresholdMonitor::new(10.0, 30.0, 2.0);
        let mut registry = TestRegistry::default();
        monitor.register_params(&mut registry, &ParamGroup::new("temp", "temp", "Temperature"));

        let keys: Vec<_> = registry.entries.iter().map(|(_, p)| p.key()).collect();
        assert_eq!(keys, vec!["notify", "min", "max", "hysteresis"]);
        assert!(registry.entries.iter().all(|(g, _)| g == "temp"));

        registry.entries[3].1.set(ParamValue::Float(0.5)).unwrap();
        assert_eq!(monitor.hysteresis(), 0.5);
    }

    #[test]
    fn test_builder_defaults() {
        let monitor = ThresholdMonitor::builder().build();
        assert_eq!(monitor.name(), "monitor");
        assert_eq!(monitor.min(), 0.0);
        assert_eq!(monitor.hysteresis(), 0.1);
        assert!(monitor.notify_enabled());
        assert_eq!(monitor.status(), Status::Empty);
    }
}
