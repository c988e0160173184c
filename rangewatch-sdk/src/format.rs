//! Timestamp formatting for snapshots.

use chrono::{Local, TimeZone};
use rangewatch_types::Timestamp;

/// Default `strftime` pattern for snapshot timestamps.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Default placeholder for a timestamp that was never set.
pub const DEFAULT_EMPTY_TIMESTAMP: &str = "--";

/// How snapshot timestamps are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFormat {
    /// `strftime` pattern, rendered in local time.
    pub timestamp_format: String,
    /// Text used for unset timestamps.
    pub empty: String,
}

impl SnapshotFormat {
    pub fn new(timestamp_format: impl Into<String>, empty: impl Into<String>) -> Self {
        Self {
            timestamp_format: timestamp_format.into(),
            empty: empty.into(),
        }
    }

    /// Render a timestamp, or the placeholder if unset or unrepresentable.
    pub fn format(&self, ts: Option<Timestamp>) -> String {
        ts.and_then(|t| Local.timestamp_opt(t.as_secs(), 0).single())
            .map(|dt| dt.format(&self.timestamp_format).to_string())
            .unwrap_or_else(|| self.empty.clone())
    }
}

impl Default for SnapshotFormat {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMAT, DEFAULT_EMPTY_TIMESTAMP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_uses_placeholder() {
        let format = SnapshotFormat::new("%Y", "never");
        assert_eq!(format.format(None), "never");
    }

    #[test]
    fn test_formats_in_local_time() {
        let format = SnapshotFormat::default();
        let secs = 1_703_160_000;
        let expected = Local
            .timestamp_opt(secs, 0)
            .unwrap()
            .format(DEFAULT_TIMESTAMP_FORMAT)
            .to_string();

        assert_eq!(format.format(Some(Timestamp::from_secs(secs))), expected);
    }

    #[test]
    fn test_custom_pattern() {
        let format = SnapshotFormat::new("%s", "-");
        assert_eq!(
            format.format(Some(Timestamp::from_secs(1_703_160_000))),
            "1703160000"
        );
    }
}
