//! Report Metadata
//!
//! Stamps a report with the tool version, the revision of the working tree
//! and the host it ran on. Anything that cannot be determined is left as
//! `None` or "Unknown" instead of failing the run.

use chrono::Utc;
use loupebench_report::{REPORT_SCHEMA_VERSION, ReportConfig, ReportMeta, SystemInfo};
use std::process::Command;

/// Build report metadata for a run with `config`
pub fn build_report_meta(config: ReportConfig) -> ReportMeta {
    let revision = Revision::of_working_tree();
    ReportMeta {
        schema_version: REPORT_SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        git_commit: revision.commit,
        git_branch: revision.branch,
        system: host_info(),
        config,
    }
}

struct Revision {
    commit: Option<String>,
    branch: Option<String>,
}

impl Revision {
    fn of_working_tree() -> Self {
        Self {
            commit: command_output("git", &["rev-parse", "HEAD"]),
            branch: command_output("git", &["rev-parse", "--abbrev-ref", "HEAD"])
                .filter(|b| b != "HEAD"),
        }
    }
}

fn host_info() -> SystemInfo {
    let cpu_cores = std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1);
    SystemInfo {
        os: std::env::consts::OS.to_string(),
        os_version: command_output("uname", &["-r"])
            .unwrap_or_else(|| std::env::consts::ARCH.to_string()),
        cpu: cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores,
    }
}

/// Trimmed stdout of a successful command
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(target_os = "linux")]
fn cpu_model() -> Option<String> {
    let cpuinfo = std::fs::read_to_string("/proc/cpuinfo").ok()?;
    cpuinfo.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        (key.trim() == "model name").then(|| value.trim().to_string())
    })
}

#[cfg(not(target_os = "linux"))]
fn cpu_model() -> Option<String> {
    None
}
