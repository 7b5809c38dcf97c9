//! Process scanning utilities for discovering and reading process entries from /proc.
//!
//! This module scans the /proc filesystem for process entries and assembles
//! one [`ProcessRecord`] per readable process. Processes that vanish or deny
//! access mid-scan are skipped for the cycle; the next sample sees the fresh
//! state anyway.

use crate::process::cpu::{parse_cpu_time_seconds, parse_runtime_seconds, read_uptime, CpuTracker};
use crate::process::memory::{parse_owner_uid, parse_rss_bytes};
use crate::process::{ProcessRecord, SnapshotSource};
use ahash::{AHashMap as HashMap, AHashSet as HashSet};
use nix::unistd::{Uid, User};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Process entry representing a directory in /proc filesystem.
#[derive(Debug, Clone)]
pub struct ProcEntry {
    pub pid: u32,
    pub proc_path: PathBuf,
}

/// Scans /proc directory for process entries with numeric PIDs.
pub fn collect_proc_entries(root: &str) -> Vec<ProcEntry> {
    let mut out = Vec::new();
    if let Ok(entries) = fs::read_dir(root) {
        for entry in entries.flatten() {
            let p = entry.path();
            let name = match p.file_name().and_then(|s| s.to_str()) {
                Some(v) => v,
                None => continue,
            };
            if !name.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            let pid: u32 = match name.parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            out.push(ProcEntry { pid, proc_path: p });
        }
    }
    out
}

/// Reads process name from comm file or extracts it from cmdline.
pub fn read_process_name(proc_path: &Path) -> Option<String> {
    let comm = proc_path.join("comm");
    if let Ok(s) = fs::read_to_string(&comm) {
        let t = s.trim();
        if !t.is_empty() {
            return Some(t.into());
        }
    }

    let tokens = read_cmdline(proc_path);
    if let Some(first) = tokens.first() {
        if let Some(name) = Path::new(first).file_name() {
            return name.to_str().map(|s| s.to_string());
        }
    }
    None
}

/// Reads the NUL-separated command line as a token vector.
/// An unreadable or empty cmdline yields an empty vector.
pub fn read_cmdline(proc_path: &Path) -> Vec<String> {
    match fs::read(proc_path.join("cmdline")) {
        Ok(content) => content
            .split(|&b| b == 0u8)
            .filter(|s| !s.is_empty())
            .filter_map(|s| std::str::from_utf8(s).ok())
            .map(|s| s.to_string())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Live snapshot source backed by the /proc filesystem.
///
/// Owns the per-pid CPU baseline cache and a uid→username cache; both are
/// internal to sampling and never observed across the cycle boundary by
/// anything else.
pub struct ProcSampler {
    proc_root: String,
    cpu: CpuTracker,
    usernames: HashMap<u32, String>,
}

impl ProcSampler {
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    /// Sampler rooted at an arbitrary directory, for tests with synthetic
    /// /proc trees.
    pub fn with_root(root: &str) -> Self {
        Self {
            proc_root: root.to_string(),
            cpu: CpuTracker::new(),
            usernames: HashMap::new(),
        }
    }

    fn username_for_uid(&mut self, uid: u32) -> String {
        if let Some(name) = self.usernames.get(&uid) {
            return name.clone();
        }
        let name = match User::from_uid(Uid::from_raw(uid)) {
            Ok(Some(user)) => user.name,
            _ => uid.to_string(),
        };
        self.usernames.insert(uid, name.clone());
        name
    }

    /// Assembles a record for one /proc entry. Returns None when any required
    /// file has gone away or is unreadable (process exited, access denied).
    fn build_record(&mut self, entry: &ProcEntry, uptime_secs: f64) -> Option<ProcessRecord> {
        let path = &entry.proc_path;

        let name = read_process_name(path)?;
        let cmdline = read_cmdline(path);

        let uid = match parse_owner_uid(path) {
            Ok(v) => v,
            Err(e) => {
                debug!("Skipping pid {}: cannot read owner: {}", entry.pid, e);
                return None;
            }
        };
        let user = self.username_for_uid(uid);

        let runtime_secs = match parse_runtime_seconds(path, uptime_secs) {
            Ok(v) => v,
            Err(e) => {
                debug!("Skipping pid {}: cannot read stat: {}", entry.pid, e);
                return None;
            }
        };

        let cpu_time = match parse_cpu_time_seconds(path) {
            Ok(v) => v,
            Err(e) => {
                debug!("Skipping pid {}: cannot read CPU time: {}", entry.pid, e);
                return None;
            }
        };
        let cpu_percent = self.cpu.observe(entry.pid, cpu_time);

        // Absent memory info falls back to zero rather than dropping the record
        let rss_bytes = parse_rss_bytes(path).unwrap_or(0);

        Some(ProcessRecord {
            pid: entry.pid,
            name,
            user,
            cmdline,
            runtime_secs,
            cpu_percent,
            rss_bytes,
        })
    }
}

impl Default for ProcSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSource for ProcSampler {
    fn sample(&mut self) -> Vec<ProcessRecord> {
        let uptime_secs = match read_uptime(&self.proc_root) {
            Ok(v) => v,
            Err(e) => {
                debug!("Cannot read uptime, runtimes will read as zero: {}", e);
                0.0
            }
        };

        let entries = collect_proc_entries(&self.proc_root);
        let live: HashSet<u32> = entries.iter().map(|e| e.pid).collect();
        self.cpu.retain_pids(&live);

        entries
            .iter()
            .filter_map(|entry| self.build_record(entry, uptime_secs))
            .collect()
    }
}
