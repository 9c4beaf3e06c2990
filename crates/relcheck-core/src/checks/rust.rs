//! Rust pipeline: cargo test, clippy, audit, and rustfmt.
//!
//! Tests and formatting block the release; clippy and audit findings are
//! advisory.

use camino::Utf8Path;
use tracing::instrument;

use crate::process::{ProcessOutput, run_command};
use crate::report::{CheckResult, ValidationReport};

/// Run the rust pipeline.
#[instrument(skip(report), fields(root = %root))]
pub fn run(root: &Utf8Path, report: &mut ValidationReport) {
    let tests = run_command(&["cargo", "test"], root);
    report.record(tests_check(&tests));

    let clippy = run_command(&["cargo", "clippy", "--", "-D", "warnings"], root);
    report.record(lint_check(&clippy));

    let audit = run_command(&["cargo", "audit"], root);
    report.record(audit_check(&audit));

    let fmt = run_command(&["cargo", "fmt", "--check"], root);
    report.record(format_check(&fmt));
}

fn tests_check(output: &ProcessOutput) -> CheckResult {
    if output.success() {
        CheckResult::passed("tests", "Tests passed")
    } else {
        CheckResult::failed("tests", "Tests failed").with_details(output.detail())
    }
}

fn lint_check(output: &ProcessOutput) -> CheckResult {
    if output.success() {
        CheckResult::passed("lint (clippy)", "No clippy warnings")
    } else {
        CheckResult::warning("lint", "Clippy warnings found").with_details(output.detail())
    }
}

fn audit_check(output: &ProcessOutput) -> CheckResult {
    if output.success() {
        CheckResult::passed("security (cargo audit)", "No security advisories")
    } else {
        CheckResult::warning("security", "Security advisories found").with_details(&output.stdout)
    }
}

fn format_check(output: &ProcessOutput) -> CheckResult {
    if output.success() {
        CheckResult::passed("format", "Code is formatted")
    } else {
        CheckResult::failed("format", "Code needs formatting (run: cargo fmt)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecosystem::ProjectType;
    use crate::report::{CheckOutcome, ValidationReport};
    use camino::Utf8Path;

    fn ok() -> ProcessOutput {
        ProcessOutput {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    fn fail(stderr: &str) -> ProcessOutput {
        ProcessOutput {
            exit_code: 1,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    #[test]
    fn test_failures_block() {
        let check = tests_check(&fail("test failed: report::passed"));
        assert_eq!(check.outcome, CheckOutcome::Failed);
        assert!(check.details.is_some());
    }

    #[test]
    fn clippy_and_audit_are_advisory() {
        assert_eq!(lint_check(&fail("warning")).outcome, CheckOutcome::Warning);
        assert_eq!(
            audit_check(&fail("RUSTSEC-0000-0000")).outcome,
            CheckOutcome::Warning
        );
    }

    #[test]
    fn formatting_blocks_with_remedy_in_message() {
        let check = format_check(&fail("Diff in src/lib.rs"));
        assert_eq!(check.outcome, CheckOutcome::Failed);
        assert!(check.message.contains("cargo fmt"));
    }

    #[test]
    fn passing_tests_with_failed_format_still_block_release() {
        let mut report = ValidationReport::new(ProjectType::Rust, Utf8Path::new("/tmp/demo"));
        report.record(tests_check(&ok()));
        report.record(format_check(&fail("")));

        assert!(!report.passed());
        assert_eq!(report.failed_count(), 1);
    }
}
