//! Check results and the validation report.
//!
//! Every verification step records exactly one [`CheckResult`] (sometimes
//! two, when a fallback tool is tried). The [`ValidationReport`] is the
//! accumulator for one validation run: checks are appended in execution
//! order, breaking changes and the semver recommendation are set along the
//! way, and the finished report is read-only from the caller's point of
//! view.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::fmt;

use crate::ecosystem::ProjectType;

/// Maximum length of long-form detail text kept on a check result.
pub const DETAIL_LIMIT: usize = 500;

/// The outcome of a single verification step.
///
/// Only `Failed` blocks a release; `Warning` and `Skipped` are advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckOutcome {
    /// The check ran and succeeded.
    Passed,
    /// The check ran and found a blocking problem.
    Failed,
    /// The check did not apply (missing config, no history, etc.).
    Skipped,
    /// The check found something worth reviewing, non-blocking.
    Warning,
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// One verification step's recorded outcome.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Display name of the check (e.g. `"tests+coverage"`, `"lint (ruff)"`).
    pub name: String,
    /// The outcome.
    pub outcome: CheckOutcome,
    /// Human-readable summary.
    pub message: String,
    /// Long-form detail (tool output), truncated to [`DETAIL_LIMIT`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Coverage percentage, for checks that parse one from tool output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<f64>,
}

impl CheckResult {
    /// Create a result with the given outcome.
    pub fn new(name: impl Into<String>, outcome: CheckOutcome, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome,
            message: message.into(),
            details: None,
            coverage: None,
        }
    }

    /// Create a `passed` result.
    pub fn passed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckOutcome::Passed, message)
    }

    /// Create a `failed` result.
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckOutcome::Failed, message)
    }

    /// Create a `skipped` result.
    pub fn skipped(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckOutcome::Skipped, message)
    }

    /// Create a `warning` result.
    pub fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckOutcome::Warning, message)
    }

    /// Attach detail text, truncated to [`DETAIL_LIMIT`] characters.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        let details = details.into();
        self.details = Some(truncate_chars(&details, DETAIL_LIMIT));
        self
    }

    /// Attach a parsed coverage percentage.
    #[must_use]
    pub const fn with_coverage(mut self, coverage: f64) -> Self {
        self.coverage = Some(coverage);
        self
    }
}

/// Suggested next version bump category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SemverBump {
    /// Breaking changes detected.
    Major,
    /// New features shipped.
    Minor,
    /// Fixes and internal changes only.
    #[default]
    Patch,
}

impl fmt::Display for SemverBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
        }
    }
}

/// The aggregate result of one validation run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// The detected (or forced) project type.
    pub project_type: ProjectType,
    /// The validated project root.
    pub project_path: Utf8PathBuf,
    /// Check results, in execution order.
    pub checks: Vec<CheckResult>,
    /// Breaking-change descriptions (`DELETED: …` / `RENAMED: …`).
    pub breaking_changes: Vec<String>,
    /// Suggested version bump.
    pub semver_recommendation: SemverBump,
}

impl ValidationReport {
    /// Create an empty report for a run.
    pub fn new(project_type: ProjectType, project_path: &Utf8Path) -> Self {
        Self {
            project_type,
            project_path: project_path.to_path_buf(),
            checks: Vec::new(),
            breaking_changes: Vec::new(),
            semver_recommendation: SemverBump::default(),
        }
    }

    /// Append a check result.
    pub fn record(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// `true` iff no check failed. Warnings and skips never block.
    pub fn passed(&self) -> bool {
        !self
            .checks
            .iter()
            .any(|c| c.outcome == CheckOutcome::Failed)
    }

    /// `true` iff at least one check produced a warning.
    pub fn has_warnings(&self) -> bool {
        self.checks
            .iter()
            .any(|c| c.outcome == CheckOutcome::Warning)
    }

    /// Number of failed checks.
    pub fn failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.outcome == CheckOutcome::Failed)
            .count()
    }
}

/// Truncate to at most `limit` characters on a char boundary.
fn truncate_chars(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_report() -> ValidationReport {
        ValidationReport::new(ProjectType::Generic, Utf8Path::new("/tmp/project"))
    }

    #[test]
    fn new_report_passes_with_patch_recommendation() {
        let report = empty_report();
        assert!(report.passed());
        assert!(!report.has_warnings());
        assert_eq!(report.semver_recommendation, SemverBump::Patch);
        assert!(report.checks.is_empty());
        assert!(report.breaking_changes.is_empty());
    }

    #[test]
    fn passed_is_false_iff_any_check_failed() {
        let mut report = empty_report();
        report.record(CheckResult::passed("tests", "ok"));
        report.record(CheckResult::warning("lint", "nits"));
        report.record(CheckResult::skipped("changelog", "absent"));
        assert!(report.passed());

        report.record(CheckResult::failed("format", "unformatted"));
        assert!(!report.passed());
        assert_eq!(report.failed_count(), 1);
    }

    #[test]
    fn warnings_never_block() {
        let mut report = empty_report();
        for _ in 0..5 {
            report.record(CheckResult::warning("security", "findings"));
        }
        assert!(report.passed());
        assert!(report.has_warnings());
    }

    #[test]
    fn details_are_truncated() {
        let long = "x".repeat(2 * DETAIL_LIMIT);
        let check = CheckResult::failed("tests", "failed").with_details(long);
        assert_eq!(check.details.unwrap().chars().count(), DETAIL_LIMIT);
    }

    #[test]
    fn short_details_kept_whole() {
        let check = CheckResult::failed("tests", "failed").with_details("boom");
        assert_eq!(check.details.as_deref(), Some("boom"));
    }

    #[test]
    fn coverage_attaches() {
        let check = CheckResult::passed("tests+coverage", "ok").with_coverage(97.5);
        assert_eq!(check.coverage, Some(97.5));
    }

    #[test]
    fn semver_bump_display() {
        assert_eq!(SemverBump::Major.to_string(), "major");
        assert_eq!(SemverBump::Minor.to_string(), "minor");
        assert_eq!(SemverBump::Patch.to_string(), "patch");
    }

    #[test]
    fn report_serializes_lowercase_outcomes() {
        let mut report = empty_report();
        report.record(CheckResult::warning("ci-config", "No CI configuration found"));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"outcome\":\"warning\""));
        assert!(json.contains("\"semver_recommendation\":\"patch\""));
    }
}
