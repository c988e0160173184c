//! # rangewatch-adapters
//!
//! Ready-made collaborators for [`rangewatch_sdk::ThresholdMonitor`].
//!
//! ## Included
//!
//! - [`MemoryStore`] - state store kept in memory
//! - [`FileStore`] (`file` feature, default) - one CBOR record per namespace on disk
//! - [`TopicBuilder`] - MQTT-style route builder
//! - [`MemoryRegistry`] - parameter registry addressed by `group/key` paths
//! - [`LogNotifier`] - notifier writing transitions to `tracing`
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use rangewatch_adapters::{LogNotifier, MemoryRegistry, MemoryStore, TopicBuilder};
//! use rangewatch_sdk::{ParamGroup, Status, ThresholdMonitor};
//!
//! let store = Arc::new(MemoryStore::new());
//! let mut monitor = ThresholdMonitor::builder()
//!     .name("cellar")
//!     .range(2.0, 12.0)
//!     .hysteresis(0.5)
//!     .storage("cellar", store.clone())
//!     .notifier(LogNotifier::new())
//!     .build();
//!
//! monitor.create_route(&TopicBuilder::new("home", "cellar"), true, false, &["temp", "status"]);
//!
//! let mut registry = MemoryRegistry::new();
//! monitor.register_params(&mut registry, &ParamGroup::new("cellar", "cellar", "Cellar"));
//! registry.apply("cellar/max", "10").unwrap();
//!
//! assert_eq!(monitor.check_value(Some(11.0)), Status::TooHigh);
//! assert_eq!(store.len(), 1);
//! ```

pub mod error;
mod memory;
mod notify;
mod registry;
mod topic;

#[cfg(feature = "file")]
mod file;

pub use error::AdapterError;
pub use memory::MemoryStore;
pub use notify::LogNotifier;
pub use registry::{MemoryRegistry, RegisteredParam};
pub use topic::{TopicBuilder, MAX_SEGMENTS};

#[cfg(feature = "file")]
pub use file::FileStore;
