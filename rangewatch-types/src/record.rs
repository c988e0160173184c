//! Persisted monitor state.

use crate::{SchemaVersion, Status, Timestamp};

/// The durable part of a monitor's state, as written to a store.
///
/// Fields keep their raw stored form so that a corrupt record can still be
/// decoded and then rejected by [`PersistedState::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct PersistedState {
    /// Record layout version.
    #[cfg_attr(feature = "minicbor", n(0))]
    pub version: SchemaVersion,

    /// Raw [`Status`] code.
    #[cfg_attr(feature = "minicbor", n(1))]
    pub status: i8,

    /// Last entry into `Normal`, epoch seconds, `0` = never.
    #[cfg_attr(feature = "minicbor", n(2))]
    pub last_normal: i64,

    /// Last entry into `TooLow`, epoch seconds, `0` = never.
    #[cfg_attr(feature = "minicbor", n(3))]
    pub last_low: i64,

    /// Last entry into `TooHigh`, epoch seconds, `0` = never.
    #[cfg_attr(feature = "minicbor", n(4))]
    pub last_high: i64,
}

impl PersistedState {
    /// Build a record in the current schema.
    pub fn new(
        status: Status,
        last_normal: Option<Timestamp>,
        last_low: Option<Timestamp>,
        last_high: Option<Timestamp>,
    ) -> Self {
        Self {
            version: SchemaVersion::current(),
            status: status.code(),
            last_normal: Timestamp::to_epoch(last_normal),
            last_low: Timestamp::to_epoch(last_low),
            last_high: Timestamp::to_epoch(last_high),
        }
    }

    /// The stored status if the record may be restored.
    ///
    /// Only `TooLow`, `Normal` and `TooHigh` from a compatible schema are
    /// accepted; `Empty` and unknown codes yield `None`.
    pub fn status(&self) -> Option<Status> {
        if !self.version.is_compatible() {
            return None;
        }
        Status::from_code(self.status).filter(|s| *s != Status::Empty)
    }

    pub fn last_normal(&self) -> Option<Timestamp> {
        Timestamp::from_epoch(self.last_normal)
    }

    pub fn last_low(&self) -> Option<Timestamp> {
        Timestamp::from_epoch(self.last_low)
    }

    pub fn last_high(&self) -> Option<Timestamp> {
        Timestamp::from_epoch(self.last_high)
    }
}
