//! Monitor settings for the replay tool.
//!
//! Settings come from three layers, later ones winning: an optional TOML
//! file, `RANGEWATCH_*` environment variables (nested keys use `__`, as in
//! `RANGEWATCH_ROUTE__LOCATION`), and command-line overrides.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use rangewatch_sdk::{MonitorConfig, SnapshotFormat, DEFAULT_EMPTY_TIMESTAMP, DEFAULT_TIMESTAMP_FORMAT};
use serde::Deserialize;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "RANGEWATCH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Monitor name, also the device part of primary routes.
    pub name: String,
    pub min: f32,
    pub max: f32,
    pub hysteresis: f32,
    pub notify: bool,
    /// Storage namespace. Persistence is off unless both this and
    /// `state_dir` are set.
    pub namespace: Option<String>,
    pub state_dir: Option<PathBuf>,
    /// Load the stored state before replaying.
    pub restore: bool,
    pub forced_publish: bool,
    pub timestamp_format: String,
    pub empty_timestamp: String,
    pub route: RouteSettings,
    /// Parameter overrides keyed by `group/key`, applied through the
    /// parameter registry after the monitor is built.
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RouteSettings {
    pub location: String,
    pub segments: Vec<String>,
    pub primary: bool,
    pub local: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: "monitor".to_string(),
            min: 0.0,
            max: 0.0,
            hysteresis: 0.1,
            notify: true,
            namespace: None,
            state_dir: None,
            restore: false,
            forced_publish: true,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            empty_timestamp: DEFAULT_EMPTY_TIMESTAMP.to_string(),
            route: RouteSettings::default(),
            params: BTreeMap::new(),
        }
    }
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            location: "rangewatch".to_string(),
            segments: vec!["value".to_string(), "status".to_string()],
            primary: true,
            local: false,
        }
    }
}

/// Command-line overrides. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub name: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub hysteresis: Option<f64>,
    pub notify: Option<bool>,
    pub namespace: Option<String>,
    pub state_dir: Option<String>,
    pub restore: Option<bool>,
}

impl Settings {
    /// Load settings from `path` (if given), the process environment and
    /// `overrides`.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        Self::load_with_env(path, env_source(), overrides)
    }

    /// Like [`Settings::load`] with an explicit environment source.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Environment,
        overrides: &Overrides,
    ) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(env)
            .set_override_option("name", overrides.name.clone())?
            .set_override_option("min", overrides.min)?
            .set_override_option("max", overrides.max)?
            .set_override_option("hysteresis", overrides.hysteresis)?
            .set_override_option("notify", overrides.notify)?
            .set_override_option("namespace", overrides.namespace.clone())?
            .set_override_option("state_dir", overrides.state_dir.clone())?
            .set_override_option("restore", overrides.restore)?
            .build()
            .context("Failed to load settings")?;

        let settings: Settings = config
            .try_deserialize()
            .context("Failed to parse settings")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.min.is_nan() || self.max.is_nan() || self.hysteresis.is_nan() {
            bail!("min, max and hysteresis must be numbers");
        }
        if self.hysteresis < 0.0 {
            bail!("hysteresis must not be negative (got {})", self.hysteresis);
        }
        if self.name.is_empty() {
            bail!("name must not be empty");
        }
        Ok(())
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            min: self.min,
            max: self.max,
            hysteresis: self.hysteresis,
            notify: self.notify,
        }
    }

    pub fn snapshot_format(&self) -> SnapshotFormat {
        SnapshotFormat::new(self.timestamp_format.clone(), self.empty_timestamp.clone())
    }

    /// Namespace and directory, when persistence is configured.
    pub fn storage(&self) -> Option<(&str, &Path)> {
        match (&self.namespace, &self.state_dir) {
            (Some(ns), Some(dir)) => Some((ns.as_str(), dir.as_path())),
            _ => None,
        }
    }
}

/// Environment source for `RANGEWATCH_*` variables.
pub fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
