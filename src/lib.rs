//! # rangewatch
//!
//! Replay a stream of readings through a [`ThresholdMonitor`] and see what it
//! would have published.
//!
//! The monitor itself lives in `rangewatch-sdk`; this crate wires it to the
//! ready-made collaborators in `rangewatch-adapters` from a settings file.
//!
//! ## Usage
//!
//! ```bash
//! # Replay readings against a 10..30 range with a 2 degree deadband
//! rangewatch --samples readings.txt --min 10 --max 30 --hysteresis 2
//!
//! # Settings from a file, state kept between runs
//! rangewatch --samples readings.txt --config greenhouse.toml --restore
//! ```
//!
//! ### As a library
//!
//! ```
//! use rangewatch::{build_monitor, parse_samples, replay, Settings};
//! use rangewatch_sdk::{Publication, Status};
//!
//! let settings = Settings {
//!     min: 10.0,
//!     max: 30.0,
//!     hysteresis: 2.0,
//!     ..Default::default()
//! };
//! let mut monitor = build_monitor(&settings, |p: Publication<'_>| {
//!     println!("{} {}", p.route, p.payload);
//!     true
//! })
//! .unwrap();
//!
//! let samples = parse_samples("5\n12\n").unwrap();
//! let summary = replay(&mut monitor, &samples);
//! assert_eq!(summary.final_status, Status::Normal);
//! ```
//!
//! [`ThresholdMonitor`]: rangewatch_sdk::ThresholdMonitor

pub mod replay;
pub mod settings;

pub use replay::{build_monitor, parse_samples, read_samples, replay, ReplaySummary};
pub use settings::{Overrides, RouteSettings, Settings};
