//! Monitor configuration and runtime tunables.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ParamError;

/// Range configuration for a monitor.
///
/// `min <= max` and `hysteresis >= 0` are preconditions; they are not
/// enforced here. A hysteresis wider than half the range means the monitor
/// can never return to normal once it leaves it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorConfig {
    /// Lower bound, inclusive.
    pub min: f32,
    /// Upper bound, inclusive.
    pub max: f32,
    /// Deadband a value must clear before leaving an out-of-range status.
    pub hysteresis: f32,
    /// Hint forwarded to the notifier.
    pub notify: bool,
}

impl MonitorConfig {
    pub fn new(min: f32, max: f32, hysteresis: f32) -> Self {
        Self {
            min,
            max,
            hysteresis,
            notify: true,
        }
    }

    pub(crate) fn is_below(&self, value: f32) -> bool {
        value < self.min
    }

    pub(crate) fn is_above(&self, value: f32) -> bool {
        value > self.max
    }

    /// Both sides of the deadband are checked, whichever bound was crossed.
    pub(crate) fn clears_deadband(&self, value: f32) -> bool {
        value >= self.min + self.hysteresis && value <= self.max - self.hysteresis
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.1)
    }
}

/// The four tunables a monitor exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    Notify,
    Min,
    Max,
    Hysteresis,
}

impl ParamField {
    /// All fields, in registration order.
    pub const ALL: [ParamField; 4] = [
        ParamField::Notify,
        ParamField::Min,
        ParamField::Max,
        ParamField::Hysteresis,
    ];

    /// Registry key.
    pub fn key(&self) -> &'static str {
        match self {
            ParamField::Notify => "notify",
            ParamField::Min => "min",
            ParamField::Max => "max",
            ParamField::Hysteresis => "hysteresis",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ParamField::Notify => "Notifications",
            ParamField::Min => "Minimum value",
            ParamField::Max => "Maximum value",
            ParamField::Hysteresis => "Hysteresis",
        }
    }
}

/// A tunable value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Float(f32),
}

/// Shared, runtime-updatable monitor configuration.
///
/// The monitor reads through this handle on every sample, so updates made
/// by a registry take effect on the next call to `check_value`.
#[derive(Debug, Clone, Default)]
pub struct ConfigHandle {
    inner: Arc<RwLock<MonitorConfig>>,
}

impl ConfigHandle {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy of the current configuration.
    pub fn get(&self) -> MonitorConfig {
        *self.inner.read()
    }

    /// Replace the whole configuration.
    pub fn replace(&self, config: MonitorConfig) {
        *self.inner.write() = config;
    }

    /// Current value of a single tunable.
    pub fn param(&self, field: ParamField) -> ParamValue {
        let config = self.inner.read();
        match field {
            ParamField::Notify => ParamValue::Bool(config.notify),
            ParamField::Min => ParamValue::Float(config.min),
            ParamField::Max => ParamValue::Float(config.max),
            ParamField::Hysteresis => ParamValue::Float(config.hysteresis),
        }
    }

    /// Set a single tunable.
    ///
    /// NaN floats and a negative hysteresis are rejected; the range
    /// ordering is left to the caller.
    pub fn set(&self, field: ParamField, value: ParamValue) -> Result<(), ParamError> {
        let key = field.key();
        match (field, value) {
            (ParamField::Notify, ParamValue::Bool(b)) => {
                self.inner.write().notify = b;
                Ok(())
            }
            (ParamField::Notify, _) => Err(ParamError::TypeMismatch {
                field: key,
                expected: "bool",
            }),
            (_, ParamValue::Bool(_)) => Err(ParamError::TypeMismatch {
                field: key,
                expected: "float",
            }),
            (_, ParamValue::Float(v)) if v.is_nan() => Err(ParamError::Invalid {
                field: key,
                reason: "not a number",
            }),
            (ParamField::Hysteresis, ParamValue::Float(v)) if v < 0.0 => {
                Err(ParamError::Invalid {
                    field: key,
                    reason: "must not be negative",
                })
            }
            (field, ParamValue::Float(v)) => {
                let mut config = self.inner.write();
                match field {
                    ParamField::Min => config.min = v,
                    ParamField::Max => config.max = v,
                    _ => config.hysteresis = v,
                }
                Ok(())
            }
        }
    }
}

/// Caller-supplied location of a monitor's tunables in a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamGroup {
    /// Registry key of the group.
    pub key: String,
    /// Topic segment the registry publishes the group under.
    pub topic: String,
    /// Human readable name.
    pub label: String,
}

impl ParamGroup {
    pub fn new(key: impl Into<String>, topic: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            topic: topic.into(),
            label: label.into(),
        }
    }
}

/// One tunable handed to a registry.
#[derive(Debug, Clone)]
pub struct Param {
    pub field: ParamField,
    handle: ConfigHandle,
}

impl Param {
    pub(crate) fn new(field: ParamField, handle: ConfigHandle) -> Self {
        Self { field, handle }
    }

    pub fn key(&self) -> &'static str {
        self.field.key()
    }

    pub fn label(&self) -> &'static str {
        self.field.label()
    }

    pub fn value(&self) -> ParamValue {
        self.handle.param(self.field)
    }

    pub fn set(&self, value: ParamValue) -> Result<(), ParamError> {
        self.handle.set(self.field, value)
    }
}

/// External configuration registry that makes tunables settable at runtime.
///
/// Passed in explicitly by the caller; the monitor never reaches for a
/// global registry.
pub trait ParamRegistry {
    fn register(&mut self, group: &ParamGroup, param: Param);
}
