//! CPU statistics parsing for process records.
//!
//! This module provides functions to parse CPU time information from
//! `/proc/<pid>/stat` and a per-pid tracker that turns successive CPU time
//! readings into an instantaneous usage percentage.

use ahash::AHashMap as HashMap;
use once_cell::sync::Lazy;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Get system clock ticks per second (usually 100, but can vary).
fn get_clk_tck() -> f64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_CLK_TCK
        // Returns -1 on error, 0 if undefined - both are handled by the > 0 check
        unsafe {
            let tck = libc::sysconf(libc::_SC_CLK_TCK);
            if tck > 0 {
                return tck as f64;
            }
        }
    }
    // Fallback to common default for error cases or non-Unix platforms
    100.0
}

/// System clock ticks per second (for CPU time calculation).
pub static CLK_TCK: Lazy<f64> = Lazy::new(get_clk_tck);

/// Last CPU time observation for a pid, used for delta-based percent.
struct CpuEntry {
    cpu_time_seconds: f64,
    last_updated: Instant,
}

/// Parse total CPU time (user+system) in seconds from /proc/<pid>/stat.
pub fn parse_cpu_time_seconds(proc_path: &Path) -> Result<f64, std::io::Error> {
    let stat_path = proc_path.join("stat");
    let content = fs::read_to_string(stat_path)?;

    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() <= 14 {
        return Err(std::io::Error::other("Invalid stat format"));
    }

    let utime: f64 = parts[13].parse().unwrap_or(0.0);
    let stime: f64 = parts[14].parse().unwrap_or(0.0);

    // Use system-detected clock ticks per second
    Ok((utime + stime) / *CLK_TCK)
}

/// Parse elapsed runtime in seconds from /proc/<pid>/stat (field 22 -
/// starttime in jiffies since boot) given the current system uptime.
pub fn parse_runtime_seconds(proc_path: &Path, uptime_secs: f64) -> Result<f64, std::io::Error> {
    let stat_path = proc_path.join("stat");
    let content = fs::read_to_string(stat_path)?;

    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() <= 21 {
        return Err(std::io::Error::other("Invalid stat format"));
    }

    // Field 22 is at index 21 (0-based)
    let starttime_jiffies: u64 = parts[21]
        .parse()
        .map_err(|_| std::io::Error::other("Failed to parse starttime field"))?;

    let runtime = uptime_secs - (starttime_jiffies as f64 / *CLK_TCK);
    Ok(runtime.max(0.0))
}

/// Reads system uptime in seconds from /proc/uptime.
pub fn read_uptime(proc_root: &str) -> Result<f64, std::io::Error> {
    let content = fs::read_to_string(Path::new(proc_root).join("uptime"))?;
    content
        .split_whitespace()
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| std::io::Error::other("Invalid /proc/uptime format"))
}

/// Per-pid CPU usage tracker.
///
/// Percent is the delta of CPU time between two samples divided by wall time;
/// the first observation of a pid yields 0.0 because there is no baseline yet.
/// Owned by the sampler, which is the single reader and writer.
#[derive(Default)]
pub struct CpuTracker {
    entries: HashMap<u32, CpuEntry>,
}

impl CpuTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a CPU time reading for `pid` and returns the usage percent
    /// relative to the previous reading.
    pub fn observe(&mut self, pid: u32, cpu_time_seconds: f64) -> f64 {
        let now = Instant::now();
        let mut cpu_percent = 0.0;

        if let Some(entry) = self.entries.get(&pid) {
            let dt = now.duration_since(entry.last_updated).as_secs_f64();
            if dt > 0.0 {
                let delta_cpu = cpu_time_seconds - entry.cpu_time_seconds;
                if delta_cpu > 0.0 {
                    cpu_percent = (delta_cpu / dt) * 100.0;
                }
            }
        }

        self.entries.insert(
            pid,
            CpuEntry {
                cpu_time_seconds,
                last_updated: now,
            },
        );

        cpu_percent
    }

    /// Drops cached entries for pids no longer present, so pid reuse does not
    /// inherit a stale baseline.
    pub fn retain_pids(&mut self, live: &ahash::AHashSet<u32>) {
        self.entries.retain(|pid, _| live.contains(pid));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // -------------------------------------------------------------------------
    // Tests for parse_cpu_time_seconds
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_cpu_time_seconds() {
        let dir = tempdir().expect("Failed to create temp dir");
        let stat_path = dir.path().join("stat");

        // Fields 14 and 15 (0-indexed: 13 and 14) are utime and stime in
        // clock ticks. utime=1000, stime=500 -> total = 1500 ticks.
        let stat_content = "1234 (test_process) S 1 1234 1234 0 -1 4194304 100 0 0 0 1000 500 0 0 20 0 1 0 12345 12345678 1234 18446744073709551615 4194304 4238788 140736466511168 0 0 0 0 0 0 0 0 0 17 1 0 0 0 0 0";
        std::fs::write(&stat_path, stat_content).expect("Failed to write stat file");

        let result = parse_cpu_time_seconds(dir.path());
        assert!(result.is_ok());

        let expected = 1500.0 / *CLK_TCK;
        let actual = result.unwrap();
        assert!(
            (actual - expected).abs() < 0.001,
            "Expected ~{:.3}, got {:.3}",
            expected,
            actual
        );
    }

    #[test]
    fn test_parse_cpu_time_seconds_invalid_stat() {
        let dir = tempdir().expect("Failed to create temp dir");
        let stat_path = dir.path().join("stat");

        // Invalid stat file with not enough fields
        std::fs::write(&stat_path, "1234 (test) S 1 2 3").expect("Failed to write stat file");

        let result = parse_cpu_time_seconds(dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_cpu_time_seconds_missing_file() {
        let dir = tempdir().expect("Failed to create temp dir");

        // No stat file exists
        let result = parse_cpu_time_seconds(dir.path());
        assert!(result.is_err());
    }

    // -------------------------------------------------------------------------
    // Tests for parse_runtime_seconds
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_runtime_seconds() {
        let dir = tempdir().expect("Failed to create temp dir");
        let stat_path = dir.path().join("stat");

        // Field 22 (index 21) is starttime in jiffies: 12345
        let stat_content = "1234 (test_process) S 1 1234 1234 0 -1 4194304 100 0 0 0 1000 500 0 0 20 0 1 0 12345 12345678 1234 18446744073709551615 4194304 4238788 140736466511168 0 0 0 0 0 0 0 0 0 17 1 0 0 0 0 0";
        std::fs::write(&stat_path, stat_content).expect("Failed to write stat file");

        let uptime = 10_000.0;
        let expected = uptime - 12345.0 / *CLK_TCK;
        let actual = parse_runtime_seconds(dir.path(), uptime).expect("runtime parse failed");
        assert!((actual - expected).abs() < 0.001);
    }

    #[test]
    fn test_parse_runtime_seconds_clamped_at_zero() {
        let dir = tempdir().expect("Failed to create temp dir");
        let stat_path = dir.path().join("stat");

        let stat_content = "1234 (p) S 1 1 1 0 -1 0 0 0 0 0 0 0 0 0 20 0 1 0 999999999 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0";
        std::fs::write(&stat_path, stat_content).expect("Failed to write stat file");

        // Starttime far beyond uptime (clock skew) must not go negative
        let actual = parse_runtime_seconds(dir.path(), 1.0).expect("runtime parse failed");
        assert_eq!(actual, 0.0);
    }

    // -------------------------------------------------------------------------
    // Tests for read_uptime
    // -------------------------------------------------------------------------

    #[test]
    fn test_read_uptime() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("uptime"), "54321.98 12345.67\n")
            .expect("Failed to write uptime file");

        let uptime = read_uptime(dir.path().to_str().unwrap()).expect("uptime parse failed");
        assert!((uptime - 54321.98).abs() < 0.001);
    }

    // -------------------------------------------------------------------------
    // Tests for CpuTracker
    // -------------------------------------------------------------------------

    #[test]
    fn test_cpu_tracker_first_observation_is_zero() {
        let mut tracker = CpuTracker::new();
        assert_eq!(tracker.observe(42, 10.0), 0.0);
    }

    #[test]
    fn test_cpu_tracker_delta_produces_percent() {
        let mut tracker = CpuTracker::new();
        tracker.observe(42, 10.0);
        std::thread::sleep(std::time::Duration::from_millis(20));
        // CPU time advanced, so percent must be positive
        let pct = tracker.observe(42, 10.5);
        assert!(pct > 0.0);
    }

    #[test]
    fn test_cpu_tracker_no_cpu_progress_is_zero() {
        let mut tracker = CpuTracker::new();
        tracker.observe(42, 10.0);
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(tracker.observe(42, 10.0), 0.0);
    }

    #[test]
    fn test_cpu_tracker_retain_drops_dead_pids() {
        let mut tracker = CpuTracker::new();
        tracker.observe(1, 1.0);
        tracker.observe(2, 2.0);

        let mut live = ahash::AHashSet::new();
        live.insert(2u32);
        tracker.retain_pids(&live);

        // Pid 1 lost its baseline, pid 2 kept it
        assert_eq!(tracker.entries.len(), 1);
        assert!(tracker.entries.contains_key(&2));
    }
}
