//! Node.js pipeline: declared npm scripts plus a production dependency
//! audit.
//!
//! A missing `package.json` makes the rest of the pipeline meaningless,
//! so it records a single failure and stops early — the only pipeline
//! with an early exit.

use std::collections::BTreeSet;
use std::fs;

use camino::Utf8Path;
use tracing::{debug, instrument};

use crate::process::{ProcessOutput, run_command};
use crate::report::{CheckResult, ValidationReport};

/// Run the nodejs pipeline.
#[instrument(skip(report), fields(root = %root))]
pub fn run(root: &Utf8Path, report: &mut ValidationReport) {
    let Ok(raw) = fs::read_to_string(root.join("package.json")) else {
        report.record(CheckResult::failed(
            "package.json",
            "package.json not found",
        ));
        return;
    };

    let scripts = match parse_scripts(&raw) {
        Ok(scripts) => scripts,
        Err(e) => {
            report.record(CheckResult::failed(
                "package.json",
                format!("Invalid JSON: {e}"),
            ));
            return;
        }
    };
    debug!(script_count = scripts.len(), "parsed npm scripts");

    if scripts.contains("test") {
        let output = run_command(&["npm", "test"], root);
        report.record(tests_check(&output));
    } else {
        report.record(CheckResult::skipped("tests", "No test script defined"));
    }

    if scripts.contains("lint") {
        let output = run_command(&["npm", "run", "lint"], root);
        report.record(if output.success() {
            CheckResult::passed("lint", "No lint errors")
        } else {
            CheckResult::failed("lint", "Lint errors found").with_details(&output.stdout)
        });
    } else {
        // No declared script; try eslint directly before giving up.
        let eslint = run_command(&["npx", "eslint", "."], root);
        report.record(if eslint.success() {
            CheckResult::passed("lint (eslint)", "No lint errors")
        } else {
            CheckResult::skipped("lint", "No lint configuration")
        });
    }

    let audit = run_command(&["npm", "audit", "--production"], root);
    report.record(audit_check(&audit));
}

fn tests_check(output: &ProcessOutput) -> CheckResult {
    if output.success() {
        CheckResult::passed("tests", "Tests passed")
    } else {
        CheckResult::failed("tests", "Tests failed").with_details(output.detail())
    }
}

fn audit_check(output: &ProcessOutput) -> CheckResult {
    if output.success() {
        CheckResult::passed("security (npm audit)", "No vulnerabilities")
    } else {
        CheckResult::warning("security", "Vulnerabilities found").with_details(&output.stdout)
    }
}

/// Collect the names of declared npm scripts.
fn parse_scripts(raw: &str) -> Result<BTreeSet<String>, serde_json::Error> {
    let pkg: serde_json::Value = serde_json::from_str(raw)?;
    Ok(pkg
        .get("scripts")
        .and_then(|s| s.as_object())
        .map(|scripts| scripts.keys().cloned().collect())
        .unwrap_or_default())
}
