//! Snapshot - the published view of a monitor.

use alloc::string::String;

use crate::Status;

/// A point-in-time view of a monitor, used as the publish payload.
///
/// Timestamps are already formatted for display; unset timestamps carry the
/// monitor's empty placeholder instead.
///
/// # Example
///
/// ```rust
/// use rangewatch_types::{MonitorSnapshot, Status};
///
/// let snapshot = MonitorSnapshot {
///     status: Status::Normal,
///     value: Some(21.5),
///     last_normal: "18.12.2023 12:00:00".into(),
///     last_min: "--".into(),
///     last_max: "--".into(),
/// };
///
/// // Serialize with serde (requires "serde" feature)
/// // let json = serde_json::to_string(&snapshot)?;
/// # let _ = snapshot;
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorSnapshot {
    /// Current status, serialized as its integer code.
    pub status: Status,

    /// Last valid sample, `null` before the first one.
    pub value: Option<f32>,

    /// Last entry into `Normal`.
    pub last_normal: String,

    /// Last entry into `TooLow`.
    pub last_min: String,

    /// Last entry into `TooHigh`.
    pub last_max: String,
}
