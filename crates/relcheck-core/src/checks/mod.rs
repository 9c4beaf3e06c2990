//! Per-ecosystem check pipelines and common checks.
//!
//! Each ecosystem submodule exposes a `run` entry point that executes a
//! fixed ordered sequence of verification steps against the project root
//! and appends one [`CheckResult`](crate::report::CheckResult) per step.
//! Severity is deliberately asymmetric per ecosystem: only checks that
//! indicate the artifact is actually broken record `failed`; style and
//! advisory tooling records `warning`.
//!
//! Every pipeline appends at least one result — a dimension the report
//! was asked to evaluate is never silently omitted.

pub mod common;

mod golang;

mod node;

mod plugin;

mod python;

mod rust;

use camino::Utf8Path;
use tracing::{debug, instrument};

use crate::ecosystem::ProjectType;
use crate::report::{CheckResult, ValidationReport};

/// Run the check pipeline matching `project_type`.
#[instrument(skip(report), fields(root = %root, %project_type))]
pub fn run_ecosystem_checks(
    root: &Utf8Path,
    project_type: ProjectType,
    report: &mut ValidationReport,
    coverage_threshold: f64,
) {
    debug!(coverage_threshold, "dispatching ecosystem pipeline");
    match project_type {
        ProjectType::ClaudePlugin => plugin::run(root, report),
        ProjectType::Python => python::run(root, report, coverage_threshold),
        ProjectType::Nodejs => node::run(root, report),
        ProjectType::Go => golang::run(root, report, coverage_threshold),
        ProjectType::Rust => rust::run(root, report),
        ProjectType::Generic => report.record(CheckResult::warning(
            "project-type",
            "Generic project - minimal validation available",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CheckOutcome;
    use tempfile::TempDir;

    #[test]
    fn generic_pipeline_records_single_warning_without_tools() {
        let tmp = TempDir::new().unwrap();
        let root = Utf8Path::from_path(tmp.path()).unwrap();
        let mut report = ValidationReport::new(ProjectType::Generic, root);

        run_ecosystem_checks(root, ProjectType::Generic, &mut report, 95.0);

        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].name, "project-type");
        assert_eq!(report.checks[0].outcome, CheckOutcome::Warning);
        assert!(report.checks[0].message.contains("minimal validation"));
    }
}
