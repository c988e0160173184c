//! Classification state and the transition rules.

use rangewatch_types::{PersistedState, Status, Timestamp};

use crate::config::MonitorConfig;

/// Mutable state owned by a single monitor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorState {
    pub status: Status,
    pub last_value: Option<f32>,
    pub last_normal: Option<Timestamp>,
    pub last_low: Option<Timestamp>,
    pub last_high: Option<Timestamp>,
}

/// A status change produced by [`MonitorState::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub from: Status,
    pub to: Status,
    /// Whether the notifier should be invoked for this change.
    pub notify: bool,
}

impl MonitorState {
    /// Classify a sample and update the state.
    ///
    /// Returns the change if the status moved. From an out-of-range status
    /// the only way out is back to `Normal`; crossing the opposite bound is
    /// not a change.
    pub fn apply(&mut self, value: f32, config: &MonitorConfig, now: Timestamp) -> Option<StateChange> {
        self.last_value = Some(value);

        let from = self.status;
        let to = match from {
            Status::Empty | Status::Normal => {
                if config.is_below(value) {
                    self.last_low = Some(now);
                    Status::TooLow
                } else if config.is_above(value) {
                    self.last_high = Some(now);
                    Status::TooHigh
                } else if from == Status::Empty {
                    self.last_normal = Some(now);
                    Status::Normal
                } else {
                    return None;
                }
            }
            Status::TooLow | Status::TooHigh => {
                if !config.clears_deadband(value) {
                    return None;
                }
                self.last_normal = Some(now);
                Status::Normal
            }
        };

        self.status = to;
        Some(StateChange {
            from,
            to,
            // first classification has no prior alarm to clear
            notify: from != Status::Empty || to != Status::Normal,
        })
    }

    /// Durable part of the state.
    pub fn to_record(&self) -> PersistedState {
        PersistedState::new(self.status, self.last_normal, self.last_low, self.last_high)
    }

    /// Seed from a stored record. Returns false, leaving the state untouched,
    /// if the record's status is not restorable.
    pub fn restore(&mut self, record: &PersistedState) -> bool {
        let Some(status) = record.status() else {
            return false;
        };
        self.status = status;
        self.last_normal = record.last_normal();
        self.last_low = record.last_low();
        self.last_high = record.last_high();
        true
    }
}
