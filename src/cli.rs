//! CLI arguments for pywatch.
//!
//! This module defines the command-line interface structure using the clap library.

use clap::{Parser, ValueEnum};

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "pywatch",
    about = "Live terminal monitor for Python processes",
    long_about = "Live terminal monitor for Python processes.\n\n\
                  Samples the process table on a fixed cadence, keeps only Python-runtime \
                  processes matching the configured filters, and renders a color-coded table \
                  with CPU/memory highlighting and arrival/departure tracking.",
    version = "0.1.0",
    after_help = "Examples:\n  \
                  pywatch                       monitor all Python processes\n  \
                  pywatch -u alice              only processes owned by 'alice'\n  \
                  pywatch -p main.py            only scripts whose path contains 'main.py'\n  \
                  pywatch -u alice -p server    combine filters\n  \
                  pywatch -i 5                  refresh every 5 seconds"
)]
pub struct Args {
    /// Only show processes owned by this user (exact match)
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Only show processes whose script path contains this pattern (case-insensitive)
    #[arg(short = 'p', long)]
    pub pattern: Option<String>,

    /// Refresh interval in seconds (minimum 0.5)
    #[arg(short = 'i', long, default_value_t = 1.0)]
    pub interval: f64,

    /// Log level (logs go to stderr; mostly useful off the live display)
    #[arg(long, value_enum, default_value = "error")]
    pub log_level: LogLevel,
}
