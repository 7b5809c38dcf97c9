//! Classification and formatting of kept processes into the per-cycle
//! display model.
//!
//! Everything here is pure: the render sink receives a [`TableModel`] and
//! decides how to paint it.

use crate::delta::SetDelta;
use crate::filter::{KeptProcess, NOT_AVAILABLE};
use chrono::Local;
use std::cmp::Ordering;

/// Longest command label rendered before truncation kicks in.
pub const MAX_COMMAND_CHARS: usize = 70;

/// Widest owner label rendered.
pub const MAX_USER_CHARS: usize = 9;

const BYTES_PER_MB: f64 = 1_048_576.0;

/// Resource severity for a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Nominal,
    Warning,
    Critical,
}

/// Per-row lifecycle/usage tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTag {
    New,
    High,
    Warn,
    Ok,
}

impl StatusTag {
    pub fn label(self) -> &'static str {
        match self {
            StatusTag::New => "NEW",
            StatusTag::High => "HIGH",
            StatusTag::Warn => "WARN",
            StatusTag::Ok => "OK",
        }
    }
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub pid: u32,
    pub user: String,
    pub cpu_text: String,
    pub cpu_severity: Severity,
    pub mem_text: String,
    pub mem_severity: Severity,
    pub runtime: String,
    pub status: StatusTag,
    pub command: String,
}

/// The full table model for one cycle, handed to the render sink.
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    /// Wall-clock HH:MM:SS at model build time.
    pub timestamp: String,
    pub process_count: usize,
    pub arrival_count: usize,
    pub departure_count: usize,
    pub rows: Vec<DisplayRow>,
}

/// CPU severity: >50 critical, >20 warning, else nominal. Boundaries are
/// strict; exactly 50.0 is still warning.
pub fn classify_cpu(cpu_percent: f64) -> Severity {
    if cpu_percent > 50.0 {
        Severity::Critical
    } else if cpu_percent > 20.0 {
        Severity::Warning
    } else {
        Severity::Nominal
    }
}

/// Memory severity in MB: >500 critical, >100 warning, else nominal.
pub fn classify_memory(memory_mb: f64) -> Severity {
    if memory_mb > 500.0 {
        Severity::Critical
    } else if memory_mb > 100.0 {
        Severity::Warning
    } else {
        Severity::Nominal
    }
}

/// Status tag precedence: NEW beats HIGH beats WARN beats OK.
pub fn classify_status(pid: u32, cpu_percent: f64, arrivals: &ahash::AHashSet<u32>) -> StatusTag {
    if arrivals.contains(&pid) {
        StatusTag::New
    } else if cpu_percent > 50.0 {
        StatusTag::High
    } else if cpu_percent > 20.0 {
        StatusTag::Warn
    } else {
        StatusTag::Ok
    }
}

/// Formats elapsed seconds as "1h 1m 1s" / "1m 1s" / "1s". Once hours are
/// present, minutes and seconds render even when zero.
pub fn format_runtime(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Picks the command label for display: the script path when resolvable,
/// otherwise the full command line. Labels beyond 70 chars collapse to an
/// ellipsis plus the last 67 chars.
pub fn display_command(script_label: &str, full_command: &str) -> String {
    let chosen = if script_label != NOT_AVAILABLE {
        script_label
    } else {
        full_command
    };

    let chars: Vec<char> = chosen.chars().collect();
    if chars.len() > MAX_COMMAND_CHARS {
        let tail: String = chars[chars.len() - (MAX_COMMAND_CHARS - 3)..].iter().collect();
        format!("...{tail}")
    } else {
        chosen.to_string()
    }
}

fn truncate_user(user: &str) -> String {
    user.chars().take(MAX_USER_CHARS).collect()
}

fn build_row(kept: &KeptProcess, delta: &SetDelta) -> DisplayRow {
    let rec = &kept.record;
    let memory_mb = rec.rss_bytes as f64 / BYTES_PER_MB;

    DisplayRow {
        pid: rec.pid,
        user: truncate_user(&rec.user),
        cpu_text: format!("{:.1}%", rec.cpu_percent),
        cpu_severity: classify_cpu(rec.cpu_percent),
        mem_text: format!("{:.1}", memory_mb),
        mem_severity: classify_memory(memory_mb),
        runtime: format_runtime(rec.runtime_secs),
        status: classify_status(rec.pid, rec.cpu_percent, &delta.arrivals),
        command: display_command(&kept.script_label, &kept.full_command),
    }
}

/// Builds the table model for one cycle. Rows sort by CPU descending with
/// pid ascending as the tie-break.
pub fn build_model(kept: &[KeptProcess], delta: &SetDelta) -> TableModel {
    let mut rows: Vec<(f64, DisplayRow)> = kept
        .iter()
        .map(|k| (k.record.cpu_percent, build_row(k, delta)))
        .collect();

    rows.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.pid.cmp(&b.1.pid))
    });

    TableModel {
        timestamp: Local::now().format("%H:%M:%S").to_string(),
        process_count: kept.len(),
        arrival_count: delta.arrivals.len(),
        departure_count: delta.departures.len(),
        rows: rows.into_iter().map(|(_, row)| row).collect(),
    }
}
