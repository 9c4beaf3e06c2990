//! Top-level validation orchestration.
//!
//! [`validate_project`] ties the pieces together: resolve the project
//! type, run the common checks, scan git history for breaking changes,
//! dispatch the ecosystem pipeline, and settle on a semver
//! recommendation.

use camino::Utf8Path;
use tracing::{debug, info, instrument};

use crate::breaking::detect_breaking_changes;
use crate::checks::common::{changelog_check, ci_config_check};
use crate::checks::run_ecosystem_checks;
use crate::detect::detect_project_type;
use crate::ecosystem::ProjectType;
use crate::error::ValidateError;
use crate::report::{CheckOutcome, SemverBump, ValidationReport};
use crate::threshold::{DEFAULT_COVERAGE_THRESHOLD, resolve_threshold};

/// Knobs for a validation run.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Minimum acceptable test coverage percentage, used when the
    /// project's own tool configuration declares none.
    pub coverage_threshold: f64,
    /// Skip detection and validate as this project type.
    pub project_type: Option<ProjectType>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            coverage_threshold: DEFAULT_COVERAGE_THRESHOLD,
            project_type: None,
        }
    }
}

/// Validate a project for release readiness.
///
/// Returns the full report; callers decide how to render it and whether
/// a non-passing report is fatal. The only hard error is a root path
/// that does not exist.
#[instrument(skip(options), fields(root = %root))]
pub fn validate_project(
    root: &Utf8Path,
    options: &ValidationOptions,
) -> Result<ValidationReport, ValidateError> {
    if !root.exists() {
        return Err(ValidateError::PathNotFound(root.to_path_buf()));
    }

    let project_type = options
        .project_type
        .unwrap_or_else(|| detect_project_type(root));
    info!(%project_type, "validating project");

    let mut report = ValidationReport::new(project_type, root);

    report.record(changelog_check(root));
    detect_breaking_changes(root, &mut report);
    report.record(ci_config_check(root));

    let threshold = resolve_threshold(root, project_type, options.coverage_threshold);
    run_ecosystem_checks(root, project_type, &mut report, threshold);

    report.semver_recommendation = recommend_semver(&report);
    debug!(
        checks = report.checks.len(),
        failed = report.failed_count(),
        recommendation = ?report.semver_recommendation,
        "validation complete"
    );
    Ok(report)
}

/// Settle the semver recommendation from the finished report.
///
/// Breaking changes force a major bump. Otherwise a passing check whose
/// name suggests new features yields minor; everything else is patch.
fn recommend_semver(report: &ValidationReport) -> SemverBump {
    if !report.breaking_changes.is_empty() {
        return SemverBump::Major;
    }
    let has_features = report.checks.iter().any(|check| {
        check.outcome == CheckOutcome::Passed && check.name.to_lowercase().contains("feat")
    });
    if has_features {
        SemverBump::Minor
    } else {
        SemverBump::Patch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CheckResult;
    use std::fs;
    use tempfile::TempDir;

    fn utf8_tmp(tmp: &TempDir) -> &Utf8Path {
        Utf8Path::from_path(tmp.path()).expect("tempdir is UTF-8")
    }

    #[test]
    fn missing_root_is_an_error() {
        let result = validate_project(
            Utf8Path::new("/nonexistent/project"),
            &ValidationOptions::default(),
        );
        assert!(matches!(result, Err(ValidateError::PathNotFound(_))));
    }

    #[test]
    fn generic_project_with_changelog_passes() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("CHANGELOG.md"),
            "# Changelog\n\n## [Unreleased]\n\n- pending\n",
        )
        .unwrap();
        let root = utf8_tmp(&tmp);

        let report = validate_project(root, &ValidationOptions::default()).unwrap();

        assert_eq!(report.project_type, ProjectType::Generic);
        // changelog, breaking-changes, ci-config, project-type
        assert_eq!(report.checks.len(), 4);
        assert_eq!(report.checks[0].name, "changelog");
        assert_eq!(report.checks[0].outcome, CheckOutcome::Passed);
        assert_eq!(report.checks[1].outcome, CheckOutcome::Skipped);
        assert_eq!(report.checks[2].outcome, CheckOutcome::Warning);
        assert!(report.passed());
        assert!(report.has_warnings());
        assert_eq!(report.semver_recommendation, SemverBump::Patch);
    }

    #[test]
    fn forced_type_skips_detection() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Cargo.toml"), "[package]").unwrap();
        let root = utf8_tmp(&tmp);

        let options = ValidationOptions {
            project_type: Some(ProjectType::Generic),
            ..ValidationOptions::default()
        };
        let report = validate_project(root, &options).unwrap();

        assert_eq!(report.project_type, ProjectType::Generic);
    }

    #[test]
    fn breaking_changes_force_major() {
        let mut report = ValidationReport::new(ProjectType::Generic, Utf8Path::new("/tmp/demo"));
        report.breaking_changes.push("DELETED: src/api.rs".into());
        report.record(CheckResult::passed("feat-gate", "ok"));

        assert_eq!(recommend_semver(&report), SemverBump::Major);
    }

    #[test]
    fn feature_named_check_yields_minor() {
        let mut report = ValidationReport::new(ProjectType::Generic, Utf8Path::new("/tmp/demo"));
        report.record(CheckResult::passed("feature-flags", "ok"));

        assert_eq!(recommend_semver(&report), SemverBump::Minor);
    }

    #[test]
    fn quiet_report_defaults_to_patch() {
        let mut report = ValidationReport::new(ProjectType::Generic, Utf8Path::new("/tmp/demo"));
        report.record(CheckResult::passed("tests", "ok"));
        report.record(CheckResult::failed("features", "broken"));

        // A failed check never counts toward minor.
        assert_eq!(recommend_semver(&report), SemverBump::Patch);
    }
}
