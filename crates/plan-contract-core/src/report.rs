// crates/plan-contract-core/src/report.rs
// ============================================================================
// Module: Run Artifacts
// Description: Per-scenario summaries and transcripts on disk.
// Purpose: Leave a deterministic record of every scenario run.
// Dependencies: serde, serde_jcs, serde_json
// ============================================================================

//! ## Overview
//! A run root holds one directory per scenario:
//!
//! ```text
//! <run root>/<scenario>/summary.json     canonical JSON (JCS)
//! <run root>/<scenario>/summary.md       human-readable summary
//! <run root>/<scenario>/transcript.json  exchanges per client
//! ```
//!
//! The default run root is `target/plan-contract/run_<unix ms>`.

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

use crate::fixtures::CleanupReport;
use crate::scenarios::ScenarioId;
use crate::scenarios::ScenarioOutcome;

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Serialized form of one scenario outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSummary {
    /// Scenario name.
    pub scenario: ScenarioId,
    /// Scenario description.
    pub description: String,
    /// `pass` or `fail`.
    pub status: String,
    /// Failure kind label, when failed.
    pub error_kind: Option<String>,
    /// Failure text, when failed.
    pub error: Option<String>,
    /// Checks that passed.
    pub checks: Vec<String>,
    /// Fixture release report.
    pub cleanup: CleanupReport,
    /// Number of recorded exchanges.
    pub request_count: u64,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Unix timestamp the summary was written at, in milliseconds.
    pub written_at_ms: u64,
}

impl ScenarioSummary {
    /// Builds the summary for an outcome.
    #[must_use]
    pub fn from_outcome(outcome: &ScenarioOutcome) -> Self {
        Self {
            scenario: outcome.scenario,
            description: outcome.scenario.description().to_string(),
            status: if outcome.passed() { "pass" } else { "fail" }.to_string(),
            error_kind: outcome.error().map(|err| err.kind().to_string()),
            error: outcome.error().map(ToString::to_string),
            checks: outcome.checks.clone(),
            cleanup: outcome.cleanup.clone(),
            request_count: u64::try_from(outcome.request_count()).unwrap_or(u64::MAX),
            duration_ms: u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
            written_at_ms: now_millis(),
        }
    }
}

// ============================================================================
// SECTION: Artifacts
// ============================================================================

/// Artifact root for one harness run.
#[derive(Debug, Clone)]
pub struct RunArtifacts {
    root: PathBuf,
}

impl RunArtifacts {
    /// Creates the run root, defaulting to `target/plan-contract/run_<ms>`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created.
    pub fn new(run_root: Option<&Path>) -> io::Result<Self> {
        let root = run_root.map_or_else(default_run_root, Path::to_path_buf);
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
        })
    }

    /// Returns the run root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes summary and transcript files for one outcome.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when a file cannot be serialized or written.
    pub fn write_outcome(&self, outcome: &ScenarioOutcome) -> io::Result<Vec<PathBuf>> {
        let dir = self.root.join(outcome.scenario.as_str());
        fs::create_dir_all(&dir)?;
        let summary = ScenarioSummary::from_outcome(outcome);

        let summary_json = dir.join("summary.json");
        let bytes = serde_jcs::to_vec(&summary).map_err(|err| io::Error::other(err.to_string()))?;
        fs::write(&summary_json, bytes)?;

        let summary_md = dir.join("summary.md");
        fs::write(&summary_md, summary_markdown(&summary))?;

        let transcript_json = dir.join("transcript.json");
        let bytes = serde_json::to_vec_pretty(&outcome.transcript)
            .map_err(|err| io::Error::other(err.to_string()))?;
        fs::write(&transcript_json, bytes)?;

        Ok(vec![summary_json, summary_md, transcript_json])
    }
}

fn now_millis() -> u64 {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

fn default_run_root() -> PathBuf {
    PathBuf::from("target/plan-contract").join(format!("run_{}", now_millis()))
}

/// Renders the Markdown summary.
#[must_use]
pub fn summary_markdown(summary: &ScenarioSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Contract Scenario Summary\n");
    out.push_str("## Status\n\n");
    let _ = writeln!(out, "- Scenario: {}", summary.scenario.as_str());
    let _ = writeln!(out, "- Description: {}", summary.description);
    let _ = writeln!(out, "- Status: {}", summary.status);
    let _ = writeln!(out, "- Duration (ms): {}", summary.duration_ms);
    let _ = writeln!(out, "- Requests: {}", summary.request_count);
    if let Some(error) = &summary.error {
        out.push_str("\n## Failure\n\n");
        let _ = writeln!(out, "- Kind: {}", summary.error_kind.as_deref().unwrap_or("unknown"));
        let _ = writeln!(out, "- Detail: {error}");
    }
    out.push_str("\n## Checks\n\n");
    push_list(&mut out, summary.checks.iter().map(String::as_str));
    out.push_str("\n## Cleanup\n\n");
    let deleted: Vec<String> =
        summary.cleanup.deleted.iter().map(|id| format!("deleted {id}")).collect();
    let failed: Vec<String> = summary
        .cleanup
        .failed
        .iter()
        .map(|(id, reason)| format!("FAILED {id}: {reason}"))
        .collect();
    push_list(&mut out, deleted.iter().chain(failed.iter()).map(String::as_str));
    out
}

fn push_list<'a>(out: &mut String, items: impl Iterator<Item = &'a str>) {
    let mut empty = true;
    for item in items {
        empty = false;
        let _ = writeln!(out, "- {item}");
    }
    if empty {
        out.push_str("- None\n");
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
