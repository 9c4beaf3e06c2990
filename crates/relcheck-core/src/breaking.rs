//! Breaking-change detection from git history.
//!
//! Compares the working tree against the most recent reachable tag and
//! flags deletions and renames of non-hidden, non-test paths. This is a
//! coarse heuristic for "public surface break": the projects relcheck
//! validates are libraries and plugins whose consumers may depend on any
//! non-hidden path by convention. It will misclassify internal refactors
//! as breaking and miss breaking changes that are not path deletions
//! (e.g. signature changes inside a file).

use camino::Utf8Path;
use tracing::{debug, instrument};

use crate::git;
use crate::report::{CheckResult, SemverBump, ValidationReport};

/// How many breaking-change examples to embed in the check detail text.
const DETAIL_EXAMPLES: usize = 10;

/// Scan for breaking changes since the last tag and record the findings.
///
/// With no reachable tag (or no usable git at all) the check is `skipped`
/// and the report is otherwise untouched. Any findings set the semver
/// recommendation to [`SemverBump::Major`].
#[instrument(skip(report), fields(root = %root))]
pub fn detect_breaking_changes(root: &Utf8Path, report: &mut ValidationReport) {
    let tag = match git::latest_tag(root) {
        Ok(Some(tag)) => tag,
        Ok(None) => {
            report.record(CheckResult::skipped(
                "breaking-changes",
                "No previous tags found",
            ));
            return;
        }
        Err(e) => {
            debug!(error = %e, "git unavailable, skipping breaking-change scan");
            report.record(CheckResult::skipped(
                "breaking-changes",
                "No previous tags found",
            ));
            return;
        }
    };

    record_diff(report, &tag, git::diff_name_status(root, &tag));
}

/// Record the outcome of the diff stage. An unusable diff still leaves a
/// `skipped` entry so the report never silently drops the dimension.
fn record_diff(report: &mut ValidationReport, tag: &str, diff: git::GitResult<String>) {
    match diff {
        Ok(diff) => {
            let breaking = classify_breaking(&diff);
            debug!(count = breaking.len(), %tag, "breaking-change scan complete");
            record_findings(report, breaking);
        }
        Err(e) => {
            debug!(error = %e, %tag, "diff against tag failed");
            report.record(CheckResult::skipped(
                "breaking-changes",
                format!("Could not diff against tag {tag}"),
            ));
        }
    }
}

/// Record classified findings on the report and adjust the recommendation.
fn record_findings(report: &mut ValidationReport, breaking: Vec<String>) {
    report.breaking_changes = breaking;

    if report.breaking_changes.is_empty() {
        report.record(CheckResult::passed(
            "breaking-changes",
            "No breaking changes detected",
        ));
    } else {
        let examples = report
            .breaking_changes
            .iter()
            .take(DETAIL_EXAMPLES)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");
        report.record(
            CheckResult::warning(
                "breaking-changes",
                format!(
                    "Found {} potential breaking change(s)",
                    report.breaking_changes.len()
                ),
            )
            .with_details(examples),
        );
        report.semver_recommendation = SemverBump::Major;
    }
}

/// Classify a `git diff --name-status` listing into breaking-change
/// descriptions.
///
/// Deletions become `DELETED: <path>`, renames `RENAMED: <old> -> <new>`.
/// Paths with a leading `.` (hidden) or a leading `test` prefix are
/// excluded from the heuristic.
pub fn classify_breaking(diff: &str) -> Vec<String> {
    let mut breaking = Vec::new();

    for line in diff.lines() {
        let mut parts = line.split('\t');
        let Some(status) = parts.next() else {
            continue;
        };

        if status.starts_with('D') {
            if let Some(path) = parts.next()
                && is_public_path(path)
            {
                breaking.push(format!("DELETED: {path}"));
            }
        } else if status.starts_with('R') {
            let old = parts.next();
            let new = parts.next().unwrap_or("unknown");
            if let Some(old) = old
                && is_public_path(old)
            {
                breaking.push(format!("RENAMED: {old} -> {new}"));
            }
        }
    }

    breaking
}

/// Whether a repo-relative path counts as public surface for the heuristic.
fn is_public_path(path: &str) -> bool {
    !path.starts_with('.') && !path.starts_with("test")
}
