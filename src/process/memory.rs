//! Memory parsing utilities for reading process memory from /proc.
//!
//! This module parses resident set size from `/proc/<pid>/status`, which is
//! cheap to read and present for every process the caller can see.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parses resident memory in bytes from the `VmRSS:` line of
/// /proc/<pid>/status. A missing line (kernel threads) reports 0 bytes.
pub fn parse_rss_bytes(proc_path: &Path) -> Result<u64, std::io::Error> {
    let file = fs::File::open(proc_path.join("status"))?;
    let reader = BufReader::new(file);

    for line in reader.lines() {
        let l = line?;
        if let Some(v) = l.strip_prefix("VmRSS:") {
            return Ok(parse_kb_value(v).unwrap_or(0) * 1024);
        }
    }

    Ok(0)
}

/// Parses the owning uid from the `Uid:` line of /proc/<pid>/status
/// (first value is the real uid).
pub fn parse_owner_uid(proc_path: &Path) -> Result<u32, std::io::Error> {
    let content = fs::read_to_string(proc_path.join("status"))?;

    for line in content.lines() {
        if let Some(v) = line.strip_prefix("Uid:") {
            return v
                .split_whitespace()
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| std::io::Error::other("Invalid Uid format"));
        }
    }

    Err(std::io::Error::other("No Uid line in status"))
}

/// Parses kilobyte values from status file lines.
pub fn parse_kb_value(v: &str) -> Option<u64> {
    v.split_whitespace().next()?.parse().ok()
}
