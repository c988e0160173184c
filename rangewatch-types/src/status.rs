//! Classification status of a monitored value.

use core::fmt;

/// Where the last observed value sits relative to the configured range.
///
/// The integer codes are part of the published payload and of the persisted
/// record, so they never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "i8", try_from = "i8"))]
pub enum Status {
    /// No value has been classified yet.
    #[default]
    Empty,
    /// Below the lower bound.
    TooLow,
    /// Inside the range.
    Normal,
    /// Above the upper bound.
    TooHigh,
}

impl Status {
    /// Integer code used on the wire and in storage.
    pub const fn code(self) -> i8 {
        match self {
            Status::Empty => -2,
            Status::TooLow => -1,
            Status::Normal => 0,
            Status::TooHigh => 1,
        }
    }

    /// Decode an integer code.
    pub const fn from_code(code: i8) -> Option<Self> {
        match code {
            -2 => Some(Status::Empty),
            -1 => Some(Status::TooLow),
            0 => Some(Status::Normal),
            1 => Some(Status::TooHigh),
            _ => None,
        }
    }

    /// True for `TooLow` and `TooHigh`.
    pub const fn is_out_of_range(self) -> bool {
        matches!(self, Status::TooLow | Status::TooHigh)
    }

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Empty => "--",
            Status::TooLow => "LOW",
            Status::Normal => "OK",
            Status::TooHigh => "HIGH",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl From<Status> for i8 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl TryFrom<i8> for Status {
    type Error = InvalidStatus;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        Status::from_code(code).ok_or(InvalidStatus(code))
    }
}

/// An integer that does not name any [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidStatus(pub i8);

impl fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid status code {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidStatus {}
