//! Filter engine reducing a raw snapshot to the processes of interest.
//!
//! Pure function of (record, config). Rules apply in order and short-circuit
//! on the first drop:
//! 1. the monitor's own pid is dropped;
//! 2. the process name must contain the runtime token (case-insensitive);
//! 3. an owner filter, when set, must match exactly;
//! 4. the script label must not start with a system-script prefix;
//! 5. a pattern filter, when set, must match the script label
//!    (case-insensitive substring).

use crate::config::{MonitorConfig, RUNTIME_TOKEN};
use crate::process::ProcessRecord;

/// Placeholder label for processes without a resolvable script path or
/// command line.
pub const NOT_AVAILABLE: &str = "N/A";

/// A record that survived filtering, with its resolved command labels.
#[derive(Debug, Clone, PartialEq)]
pub struct KeptProcess {
    pub record: ProcessRecord,
    /// Second cmdline token, or "N/A" when the command line has fewer than
    /// two tokens.
    pub script_label: String,
    /// Space-joined command line, or "N/A" when empty.
    pub full_command: String,
}

/// Resolves the script label for a command-line token vector.
pub fn script_label(cmdline: &[String]) -> String {
    if cmdline.len() < 2 {
        NOT_AVAILABLE.to_string()
    } else {
        cmdline[1].clone()
    }
}

/// True when the script label points at a system-owned script that is never
/// interesting on the dashboard. "N/A" labels are not system scripts.
pub fn is_system_script(label: &str, prefixes: &[String]) -> bool {
    if label == NOT_AVAILABLE {
        return false;
    }
    prefixes.iter().any(|p| label.starts_with(p.as_str()))
}

/// Applies the filter rules to one record. Returns the kept process with its
/// resolved labels, or None when any rule drops it.
pub fn evaluate(record: &ProcessRecord, cfg: &MonitorConfig) -> Option<KeptProcess> {
    if record.pid == cfg.own_pid {
        return None;
    }

    if !record.name.to_lowercase().contains(RUNTIME_TOKEN) {
        return None;
    }

    if let Some(user) = &cfg.user {
        if &record.user != user {
            return None;
        }
    }

    let label = script_label(&record.cmdline);
    if is_system_script(&label, &cfg.system_prefixes) {
        return None;
    }

    if let Some(pattern) = &cfg.pattern {
        if !label.to_lowercase().contains(&pattern.to_lowercase()) {
            return None;
        }
    }

    let full_command = if record.cmdline.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        record.cmdline.join(" ")
    };

    Some(KeptProcess {
        record: record.clone(),
        script_label: label,
        full_command,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    fn config(argv: &[&str]) -> MonitorConfig {
        let args = Args::parse_from(std::iter::once("pywatch").chain(argv.iter().copied()));
        MonitorConfig::from_args(&args).expect("config valid")
    }

    fn record(pid: u32, name: &str, user: &str, cmdline: &[&str]) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: name.to_string(),
            user: user.to_string(),
            cmdline: cmdline.iter().map(|s| s.to_string()).collect(),
            runtime_secs: 10.0,
            cpu_percent: 1.0,
            rss_bytes: 1024,
        }
    }

    #[test]
    fn test_own_pid_dropped() {
        let cfg = config(&[]);
        let rec = record(cfg.own_pid, "python3", "alice", &["python3", "app.py"]);
        assert!(evaluate(&rec, &cfg).is_none());
    }

    #[test]
    fn test_non_runtime_name_dropped() {
        let cfg = config(&[]);
        assert!(evaluate(&record(1, "nginx", "alice", &["nginx"]), &cfg).is_none());
    }

    #[test]
    fn test_runtime_name_match_is_case_insensitive() {
        let cfg = config(&[]);
        let rec = record(1, "Python3.12", "alice", &["python3", "app.py"]);
        assert!(evaluate(&rec, &cfg).is_some());
    }

    #[test]
    fn test_user_filter_exact_match() {
        let cfg = config(&["-u", "bob"]);
        let rec = record(1, "python3", "alice", &["python3", "app.py"]);
        assert!(evaluate(&rec, &cfg).is_none());

        let rec = record(1, "python3", "bob", &["python3", "app.py"]);
        assert!(evaluate(&rec, &cfg).is_some());
    }

    #[test]
    fn test_user_filter_is_case_sensitive() {
        let cfg = config(&["-u", "Alice"]);
        let rec = record(1, "python3", "alice", &["python3", "app.py"]);
        assert!(evaluate(&rec, &cfg).is_none());
    }

    #[test]
    fn test_system_script_dropped() {
        let cfg = config(&[]);
        let rec = record(1, "python3", "root", &["python3", "/usr/share/tool.py"]);
        assert!(evaluate(&rec, &cfg).is_none());

        let rec = record(1, "python3", "root", &["python3", "/usr/bin/networkd-dispatcher"]);
        assert!(evaluate(&rec, &cfg).is_none());
    }

    #[test]
    fn test_system_prefix_match_is_case_sensitive() {
        let cfg = config(&[]);
        let rec = record(1, "python3", "root", &["python3", "/USR/SHARE/tool.py"]);
        assert!(evaluate(&rec, &cfg).is_some());
    }

    #[test]
    fn test_short_cmdline_yields_na_label_and_survives_prefix_rule() {
        let cfg = config(&[]);
        let kept = evaluate(&record(1, "python3", "alice", &["python3"]), &cfg)
            .expect("record should be kept");
        assert_eq!(kept.script_label, NOT_AVAILABLE);
        assert_eq!(kept.full_command, "python3");
    }

    #[test]
    fn test_empty_cmdline_full_command_is_na() {
        let cfg = config(&[]);
        let kept = evaluate(&record(1, "python3", "alice", &[]), &cfg)
            .expect("record should be kept");
        assert_eq!(kept.script_label, NOT_AVAILABLE);
        assert_eq!(kept.full_command, NOT_AVAILABLE);
    }

    #[test]
    fn test_pattern_filter_case_insensitive() {
        let cfg = config(&["-p", "MAIN.PY"]);
        let kept = evaluate(
            &record(1, "python3", "alice", &["python3", "/home/alice/main.py"]),
            &cfg,
        );
        assert!(kept.is_some());

        let dropped = evaluate(
            &record(1, "python3", "alice", &["python3", "/home/alice/other.py"]),
            &cfg,
        );
        assert!(dropped.is_none());
    }

    #[test]
    fn test_pattern_filter_applies_to_label_not_full_command() {
        // Label is "N/A" when cmdline is short; pattern matches against it
        let cfg = config(&["-p", "python"]);
        assert!(evaluate(&record(1, "python3", "alice", &["python3"]), &cfg).is_none());
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let cfg = config(&["-u", "alice", "-p", "app"]);
        let rec = record(1, "python3", "alice", &["python3", "/home/alice/app.py"]);
        assert_eq!(evaluate(&rec, &cfg), evaluate(&rec, &cfg));
    }

    #[test]
    fn test_kept_record_carries_labels() {
        let cfg = config(&[]);
        let kept = evaluate(
            &record(7, "python3", "alice", &["python3", "/home/alice/app.py", "-v"]),
            &cfg,
        )
        .expect("record should be kept");
        assert_eq!(kept.script_label, "/home/alice/app.py");
        assert_eq!(kept.full_command, "python3 /home/alice/app.py -v");
        assert_eq!(kept.record.pid, 7);
    }
}
