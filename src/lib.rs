//! pywatch — live terminal monitor for Python processes.
//!
//! Samples the host process table on a fixed cadence, keeps the
//! Python-runtime processes that pass the configured filters, tracks
//! arrivals and departures between cycles, and renders a color-coded table.
//!
//! The pipeline per cycle:
//!
//! ```text
//! SnapshotSource -> filter -> delta -> display -> RenderSink
//! ```
//!
//! [`monitor::Monitor`] orchestrates the loop and owns the only cross-cycle
//! state (the previous cycle's kept-pid set). Both ends of the pipeline are
//! trait seams: [`process::SnapshotSource`] for sampling and
//! [`render::RenderSink`] for painting, so tests can drive the whole loop
//! with scripted snapshots and a recording sink.

pub mod cli;
pub mod config;
pub mod delta;
pub mod display;
pub mod filter;
pub mod monitor;
pub mod process;
pub mod render;

pub use config::{ConfigError, MonitorConfig};
pub use monitor::Monitor;
