//! # rangewatch-sdk
//!
//! A bounded-value monitor with hysteresis.
//!
//! Feed it scalar samples (temperature, humidity, anything with a valid
//! range) and it reports each transition between *too low*, *normal* and
//! *too high* exactly once, instead of on every sample.
//!
//! ## Quick Start
//!
//! ```rust
//! use rangewatch_sdk::{Notification, Publication, Status, ThresholdMonitor};
//!
//! let mut monitor = ThresholdMonitor::builder()
//!     .name("boiler")
//!     .range(40.0, 80.0)
//!     .hysteresis(3.0)
//!     .route("home/boiler/temp/status")
//!     .on_publish(|p: Publication<'_>| {
//!         println!("{} <- {}", p.route, p.payload);
//!         true
//!     })
//!     .on_notify(|n: &Notification<'_>| {
//!         println!("{}: {} ({} .. {})", n.monitor, n.value, n.min, n.max);
//!     })
//!     .build();
//!
//! monitor.check_value(Some(85.0));
//! monitor.check_value(Some(79.0)); // still inside the deadband
//! assert_eq!(monitor.status(), Status::TooHigh);
//! ```
//!
//! ## Transition rules
//!
//! - From *empty* or *normal*, a sample below `min` or above `max` trips the
//!   monitor. The first in-range sample moves *empty* to *normal* quietly.
//! - From *too low* or *too high*, only a sample inside
//!   `[min + hysteresis, max - hysteresis]` returns to *normal*. Crossing the
//!   opposite bound does nothing.
//!
//! ## Collaborators
//!
//! - [`StateStore`]: persists status and timestamps per namespace
//! - [`Publisher`]: receives the JSON snapshot on every transition
//! - [`Notifier`]: told about transitions worth telling a user about
//! - [`ParamRegistry`]: exposes the tunables for runtime changes
//! - [`RouteBuilder`]: turns path segments into a publish route

mod config;
mod error;
mod format;
mod gateway;
mod handle;
mod monitor;
mod state;

pub use config::{
    ConfigHandle, MonitorConfig, Param, ParamField, ParamGroup, ParamRegistry, ParamValue,
};
pub use error::{ParamError, StoreError};
pub use format::{SnapshotFormat, DEFAULT_EMPTY_TIMESTAMP, DEFAULT_TIMESTAMP_FORMAT};
pub use gateway::{Notification, Notifier, Publication, Publisher, RouteBuilder, StateStore};
pub use handle::MonitorHandle;
pub use monitor::{ThresholdMonitor, ThresholdMonitorBuilder};
pub use state::{MonitorState, StateChange};

#[cfg(feature = "tokio")]
pub use gateway::{ChannelPublisher, PublishedMessage};

// Re-export types for convenience
pub use rangewatch_types::{MonitorSnapshot, PersistedState, SchemaVersion, Status, Timestamp};
