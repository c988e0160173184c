//! # rangewatch-types
//!
//! Core types for bounded-value monitoring. This crate defines the shared
//! vocabulary used by the monitor, its storage backends and its publish
//! transports.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable `serde` and/or `minicbor` features as needed
//! - **Stable wire codes**: [`Status`] always maps to the same integer code
//! - **Versioned storage**: Persisted records carry a schema version
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON serialization of snapshots via serde
//! - `minicbor`: Compact binary encoding of persisted records
//! - `all`: Enable all serialization formats
//!
//! ## Example
//!
//! ```rust
//! use rangewatch_types::{PersistedState, Status, Timestamp};
//!
//! let record = PersistedState::new(
//!     Status::TooHigh,
//!     Some(Timestamp::from_secs(1_700_000_000)),
//!     None,
//!     Some(Timestamp::from_secs(1_700_000_600)),
//! );
//!
//! assert_eq!(record.status(), Some(Status::TooHigh));
//! assert_eq!(record.last_low(), None);
//! ```
//!
//! ## Record Schema
//!
//! The current persisted record schema is **2**: a signed 8-bit status code
//! and three 64-bit epoch-second timestamps, `0` meaning "never".

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod record;
mod snapshot;
mod status;
mod timestamp;
mod version;

pub use record::*;
pub use snapshot::*;
pub use status::*;
pub use timestamp::*;
pub use version::*;

/// Current persisted record schema version.
///
/// Version 1 stored a 32-bit epoch; version 2 widened every timestamp to
/// 64 bits. Records from another major version are rejected on restore.
pub const SCHEMA_VERSION: u32 = 2;
