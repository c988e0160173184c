//! MQTT-style route builder.

use rangewatch_sdk::RouteBuilder;

/// Maximum number of caller segments in a route.
pub const MAX_SEGMENTS: usize = 3;

/// Builds routes of the form `[local/]<location>[/<device>]/<segments…>`.
///
/// Primary routes live under the device's own subtree; secondary routes sit
/// directly under the location. Local routes get the broker-local prefix.
///
/// # Example
///
/// ```rust
/// use rangewatch_adapters::TopicBuilder;
/// use rangewatch_sdk::RouteBuilder;
///
/// let topics = TopicBuilder::new("home", "boiler");
/// assert_eq!(
///     topics.build(true, false, &["temp", "status"]).as_deref(),
///     Some("home/boiler/temp/status")
/// );
/// assert_eq!(
///     topics.build(false, true, &["temp"]).as_deref(),
///     Some("local/home/temp")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicBuilder {
    location: String,
    device: String,
    local_prefix: String,
}

impl TopicBuilder {
    pub fn new(location: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            device: device.into(),
            local_prefix: "local".to_string(),
        }
    }

    /// Replace the prefix used for local routes. Defaults to `local`.
    pub fn local_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.local_prefix = prefix.into();
        self
    }
}

impl RouteBuilder for TopicBuilder {
    fn build(&self, primary: bool, local: bool, segments: &[&str]) -> Option<String> {
        let segments: Vec<&str> = segments
            .iter()
            .map(|s| s.trim_matches('/'))
            .filter(|s| !s.is_empty())
            .collect();
        if segments.is_empty() || segments.len() > MAX_SEGMENTS {
            return None;
        }

        let mut parts: Vec<&str> = Vec::with_capacity(segments.len() + 3);
        if local {
            parts.push(&self.local_prefix);
        }
        parts.push(&self.location);
        if primary {
            parts.push(&self.device);
        }
        parts.extend(segments);

        Some(parts.into_iter().filter(|p| !p.is_empty()).collect::<Vec<_>>().join("/"))
    }
}
