//! Wall-clock timestamps.
//!
//! Timestamps are whole seconds since the Unix epoch, which is the
//! resolution the persisted record stores.

/// Seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
#[cfg_attr(feature = "minicbor", cbor(transparent))]
pub struct Timestamp(#[cfg_attr(feature = "minicbor", n(0))] pub i64);

impl Timestamp {
    /// Create from epoch seconds.
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    /// Get the value in epoch seconds.
    pub const fn as_secs(&self) -> i64 {
        self.0
    }

    /// Current wall-clock time.
    #[cfg(feature = "std")]
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| Self(d.as_secs() as i64))
            .unwrap_or_default()
    }

    /// Encode an optional timestamp the way the record stores it (`0` = never).
    pub fn to_epoch(ts: Option<Timestamp>) -> i64 {
        ts.map_or(0, |t| t.0)
    }

    /// Decode a stored epoch value, mapping non-positive values to "never".
    pub fn from_epoch(secs: i64) -> Option<Timestamp> {
        (secs > 0).then_some(Timestamp(secs))
    }
}
