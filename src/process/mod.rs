//! Process-related modules for snapshot collection from /proc.
//!
//! This module provides:
//! - `cpu`: CPU time parsing and delta-based usage tracking
//! - `memory`: RSS parsing from /proc/<pid>/status
//! - `scanner`: Process discovery and record assembly

pub mod cpu;
pub mod memory;
pub mod scanner;

// Re-export commonly used types
pub use cpu::{parse_cpu_time_seconds, parse_runtime_seconds, CpuTracker, CLK_TCK};
pub use memory::parse_rss_bytes;
pub use scanner::{collect_proc_entries, read_cmdline, read_process_name, ProcSampler};

/// A single process observation, rebuilt fresh every cycle.
///
/// Fields that the kernel may not expose for a given process fall back to
/// explicit defaults: an empty `cmdline` and zero `rss_bytes`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub user: String,
    pub cmdline: Vec<String>,
    /// Seconds since the process started, measured at sample time.
    pub runtime_secs: f64,
    pub cpu_percent: f64,
    pub rss_bytes: u64,
}

/// Source of per-cycle process snapshots.
///
/// The live implementation reads /proc; tests substitute scripted snapshots.
pub trait SnapshotSource {
    fn sample(&mut self) -> Vec<ProcessRecord>;
}
