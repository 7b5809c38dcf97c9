//! Configuration for pywatch.
//!
//! This module builds the immutable monitor configuration from CLI arguments
//! and validates it before the sampling loop starts.

use crate::cli::Args;

/// Minimum allowed refresh interval in seconds.
pub const MIN_INTERVAL_SECS: f64 = 0.5;

/// Name token a process name must contain (case-insensitive) to be considered
/// a Python-runtime process.
pub const RUNTIME_TOKEN: &str = "python";

/// Script-path prefixes for system-owned Python tooling that is never
/// interesting on the dashboard.
pub const SYSTEM_SCRIPT_PREFIXES: &[&str] = &[
    "/usr/bin/wsdd",
    "/usr/bin/networkd-dispatcher",
    "/usr/lib/",
    "/usr/share/",
];

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("minimum refresh interval is {MIN_INTERVAL_SECS} seconds (got {0})")]
    IntervalTooSmall(f64),
}

/// Immutable monitor configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Exact-match owner filter, if any.
    pub user: Option<String>,
    /// Case-insensitive script-path substring filter, if any.
    pub pattern: Option<String>,
    /// Refresh interval in seconds.
    pub interval_secs: f64,
    /// Script-path prefixes to drop as system-owned.
    pub system_prefixes: Vec<String>,
    /// The monitor's own pid, always excluded from the display.
    pub own_pid: u32,
}

impl MonitorConfig {
    /// Builds and validates the configuration from parsed CLI arguments.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        if args.interval < MIN_INTERVAL_SECS {
            return Err(ConfigError::IntervalTooSmall(args.interval));
        }

        Ok(Self {
            user: args.user.clone(),
            pattern: args.pattern.clone(),
            interval_secs: args.interval,
            system_prefixes: SYSTEM_SCRIPT_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            own_pid: std::process::id(),
        })
    }
}
