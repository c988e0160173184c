//! Sample-file replay.
//!
//! A sample file holds one reading per line. Lines starting with `#` are
//! comments. An empty line, `-` or `nan` is a missing reading: it is fed to
//! the monitor, which ignores it. Infinite readings are rejected.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use rangewatch_adapters::{FileStore, LogNotifier, MemoryRegistry, TopicBuilder};
use rangewatch_sdk::{ParamGroup, Publisher, Status, ThresholdMonitor};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::settings::Settings;

/// Parse the contents of a sample file.
pub fn parse_samples(content: &str) -> Result<Vec<Option<f32>>> {
    let mut samples = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        let sample = match line {
            "" | "-" => None,
            _ if line.eq_ignore_ascii_case("nan") => None,
            _ => match line.parse::<f32>() {
                Ok(value) if value.is_finite() => Some(value),
                Ok(_) => bail!("line {}: sample {:?} is not finite", index + 1, line),
                Err(_) => bail!("line {}: invalid sample {:?}", index + 1, line),
            },
        };
        samples.push(sample);
    }
    Ok(samples)
}

/// Read and parse a sample file.
pub fn read_samples<P: AsRef<Path>>(path: P) -> Result<Vec<Option<f32>>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read samples from {}", path.display()))?;
    parse_samples(&content).with_context(|| format!("Invalid sample file {}", path.display()))
}

/// Build a monitor from settings, publishing through `publisher`.
///
/// Transitions are logged through [`LogNotifier`]. State is persisted in a
/// [`FileStore`] when both namespace and state directory are configured.
pub fn build_monitor(settings: &Settings, publisher: impl Publisher + 'static) -> Result<ThresholdMonitor> {
    let mut builder = ThresholdMonitor::builder()
        .name(settings.name.clone())
        .config(settings.monitor_config())
        .format(settings.snapshot_format())
        .forced_publish(settings.forced_publish)
        .publisher(publisher)
        .notifier(LogNotifier::new());

    if let Some((namespace, dir)) = settings.storage() {
        debug!(namespace, dir = %dir.display(), "Using file store");
        builder = builder
            .storage(namespace, Arc::new(FileStore::new(dir)))
            .restore_on_build(settings.restore);
    } else if settings.restore {
        warn!("restore requested without namespace and state_dir, starting empty");
    }

    let mut monitor = builder.build();

    let topics = TopicBuilder::new(settings.route.location.clone(), settings.name.clone());
    let segments: Vec<&str> = settings.route.segments.iter().map(String::as_str).collect();
    if !monitor.create_route(&topics, settings.route.primary, settings.route.local, &segments) {
        bail!("route segments {:?} do not form a valid route", settings.route.segments);
    }

    apply_params(&monitor, settings)?;
    Ok(monitor)
}

/// Apply `params` overrides through a registry, as a broker would at runtime.
fn apply_params(monitor: &ThresholdMonitor, settings: &Settings) -> Result<()> {
    if settings.params.is_empty() {
        return Ok(());
    }

    let mut registry = MemoryRegistry::new();
    let group = ParamGroup::new(
        settings.name.clone(),
        format!("{}/{}", settings.route.location, settings.name),
        settings.name.clone(),
    );
    monitor.register_params(&mut registry, &group);

    for (path, raw) in &settings.params {
        registry
            .apply(path, raw)
            .with_context(|| format!("Invalid parameter override {path} = {raw:?}"))?;
        debug!(path = path.as_str(), value = raw.as_str(), "Parameter applied");
    }
    Ok(())
}

/// Outcome of a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub samples: usize,
    pub missing: usize,
    pub transitions: usize,
    pub final_status: Status,
    /// Number of samples after which the monitor was in each status.
    pub time_in: BTreeMap<String, usize>,
}

/// Feed `samples` through `monitor` in order.
pub fn replay(monitor: &mut ThresholdMonitor, samples: &[Option<f32>]) -> ReplaySummary {
    let mut missing = 0;
    let mut transitions = 0;
    let mut time_in: BTreeMap<String, usize> = BTreeMap::new();

    for sample in samples {
        if sample.is_none() {
            missing += 1;
        }
        let before = monitor.status();
        let after = monitor.check_value(*sample);
        if after != before {
            transitions += 1;
        }
        *time_in.entry(status_key(after).to_string()).or_default() += 1;
    }

    let summary = ReplaySummary {
        samples: samples.len(),
        missing,
        transitions,
        final_status: monitor.status(),
        time_in,
    };
    info!(
        monitor = monitor.name(),
        samples = summary.samples,
        transitions = summary.transitions,
        status = %summary.final_status,
        "Replay finished"
    );
    summary
}

fn status_key(status: Status) -> &'static str {
    match status {
        Status::Empty => "empty",
        Status::TooLow => "too_low",
        Status::Normal => "normal",
        Status::TooHigh => "too_high",
    }
}
