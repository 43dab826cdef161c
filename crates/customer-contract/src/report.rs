// crates/customer-contract/src/report.rs
// ============================================================================
// Module: Report Artifacts
// Description: Artifact writers for suite summaries and transcripts.
// Purpose: Persist deterministic run summaries, even when a run panics.
// Dependencies: serde, serde_jcs
// ============================================================================

//! ## Overview
//! Reports land in a per-run directory: `summary.json` (canonical JSON),
//! `summary.md`, and `transcript.json`. [`ReportGuard`] writes a fallback
//! summary from `Drop` if the run never reached [`ReportGuard::finish`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::config::SuiteConfig;
use crate::scenarios::ScenarioStatus;
use crate::suite::SuiteReport;

// ============================================================================
// SECTION: Artifacts
// ============================================================================

/// Summary file name.
pub const SUMMARY_JSON: &str = "summary.json";
/// Markdown summary file name.
pub const SUMMARY_MD: &str = "summary.md";
/// Transcript file name.
pub const TRANSCRIPT_JSON: &str = "transcript.json";

/// Returns the current time in milliseconds since the epoch.
fn now_millis() -> u64 {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

/// Returns the default run root under `target/`.
fn default_run_root() -> PathBuf {
    PathBuf::from("target/customer-contract").join(format!("run_{}", now_millis()))
}

/// Artifact directory for one run.
#[derive(Debug, Clone)]
pub struct ReportArtifacts {
    /// Directory holding the artifacts.
    root: PathBuf,
}

impl ReportArtifacts {
    /// Creates the artifact directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn new(root: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
        })
    }

    /// Creates the directory named by `run_root`, or a timestamped default.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn for_config(config: &SuiteConfig) -> io::Result<Self> {
        Self::new(config.run_root.clone().unwrap_or_else(default_run_root))
    }

    /// Returns the artifact directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a JSON artifact using canonical JCS serialization.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the write fails.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        let bytes = serde_jcs::to_vec(value).map_err(|err| io::Error::other(err.to_string()))?;
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Writes a UTF-8 text artifact.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    pub fn write_text(&self, name: &str, value: &str) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        fs::write(&path, value.as_bytes())?;
        Ok(path)
    }

    /// Writes the summary, markdown summary, and transcript.
    ///
    /// # Errors
    ///
    /// Returns an error when any artifact cannot be written.
    pub fn write_report(&self, report: &SuiteReport) -> io::Result<Vec<PathBuf>> {
        Ok(vec![
            self.write_json(SUMMARY_JSON, report)?,
            self.write_text(SUMMARY_MD, &summary_markdown(report))?,
            self.write_json(TRANSCRIPT_JSON, &report.transcript)?,
        ])
    }
}

// ============================================================================
// SECTION: Guard
// ============================================================================

/// Fallback summary written when a run ends without a report.
#[derive(Debug, Serialize)]
struct IncompleteSummary {
    /// `panic` or `unknown`.
    status: &'static str,
    /// Guard creation time (milliseconds since epoch).
    started_at_ms: u64,
    /// Guard drop time (milliseconds since epoch).
    ended_at_ms: u64,
    /// Explanation.
    notes: Vec<String>,
}

/// Writes the run report once, or a fallback summary on drop.
pub struct ReportGuard {
    /// Artifact directory.
    artifacts: ReportArtifacts,
    /// Guard creation time.
    started_at_ms: u64,
    /// Whether [`ReportGuard::finish`] succeeded.
    finalized: bool,
}

impl ReportGuard {
    /// Creates a guard over an artifact directory.
    #[must_use]
    pub fn new(artifacts: ReportArtifacts) -> Self {
        Self {
            artifacts,
            started_at_ms: now_millis(),
            finalized: false,
        }
    }

    /// Returns the artifact directory.
    #[must_use]
    pub const fn artifacts(&self) -> &ReportArtifacts {
        &self.artifacts
    }

    /// Writes the final report.
    ///
    /// # Errors
    ///
    /// Returns an error when any artifact cannot be written.
    pub fn finish(&mut self, report: &SuiteReport) -> io::Result<Vec<PathBuf>> {
        let paths = self.artifacts.write_report(report)?;
        self.finalized = true;
        Ok(paths)
    }
}

impl Drop for ReportGuard {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        let status = if std::thread::panicking() { "panic" } else { "unknown" };
        let summary = IncompleteSummary {
            status,
            started_at_ms: self.started_at_ms,
            ended_at_ms: now_millis(),
            notes: vec!["run terminated without a suite report".to_string()],
        };
        let _ = self.artifacts.write_json(SUMMARY_JSON, &summary);
    }
}

// ============================================================================
// SECTION: Markdown
// ============================================================================

/// Renders a human-readable summary.
#[must_use]
pub fn summary_markdown(report: &SuiteReport) -> String {
    let mut out = String::new();
    out.push_str("# Customer Contract Summary\n\n");
    out.push_str("## Run\n\n");
    let _ = writeln!(out, "- Base URL: {}", report.base_url);
    let _ = writeln!(out, "- Mode: {}", report.mode);
    let _ = writeln!(out, "- Result: {}", if report.passed() { "pass" } else { "fail" });
    let _ = writeln!(
        out,
        "- Duration (ms): {}",
        report.ended_at_ms.saturating_sub(report.started_at_ms)
    );
    out.push_str("\n## Scenarios\n\n");
    if report.outcomes.is_empty() {
        out.push_str("- None\n");
    }
    for outcome in &report.outcomes {
        let status = match outcome.status {
            ScenarioStatus::Pass => "pass",
            ScenarioStatus::Fail => "FAIL",
        };
        let _ = write!(out, "- {}: {status}", outcome.scenario);
        if let Some(error) = &outcome.error {
            let _ = write!(out, " ({error})");
        }
        out.push('\n');
        for record in outcome.observations() {
            let _ = writeln!(
                out,
                "  - observed {}: expected {}, got {}",
                record.check, record.expected, record.actual
            );
        }
    }
    out.push_str("\n## Notes\n\n");
    if report.notes.is_empty() {
        out.push_str("- None\n");
    }
    for note in &report.notes {
        let _ = writeln!(out, "- {note}");
    }
    out
}
