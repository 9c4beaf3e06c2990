//! Go pipeline: tests with race detector and coverage, plus advisory
//! lint and vet passes.

use camino::Utf8Path;
use regex::Regex;
use tracing::instrument;

use crate::process::{ProcessOutput, run_command};
use crate::report::{CheckResult, ValidationReport};

/// Run the go pipeline.
#[instrument(skip(report), fields(root = %root))]
pub fn run(root: &Utf8Path, report: &mut ValidationReport, coverage_threshold: f64) {
    let output = run_command(&["go", "test", "-cover", "-race", "./..."], root);
    report.record(tests_check(&output, coverage_threshold));

    let lint = run_command(&["golangci-lint", "run"], root);
    report.record(lint_check(&lint));

    let vet = run_command(&["go", "vet", "./..."], root);
    report.record(vet_check(&vet));
}

/// Map a `go test` run to a check result, gating on coverage when the
/// run reports it.
fn tests_check(output: &ProcessOutput, threshold: f64) -> CheckResult {
    if !output.success() {
        return CheckResult::failed("tests", "Tests failed").with_details(output.detail());
    }

    match parse_go_coverage(&output.stdout) {
        Some(coverage) if coverage < threshold => CheckResult::failed(
            "tests+coverage",
            format!("Coverage {coverage:.1}% below threshold {threshold:.1}%"),
        )
        .with_coverage(coverage),
        Some(coverage) => CheckResult::passed(
            "tests+coverage",
            format!("Tests passed, coverage: {coverage:.1}%"),
        )
        .with_coverage(coverage),
        None => CheckResult::passed("tests+coverage", "Tests passed"),
    }
}

fn lint_check(output: &ProcessOutput) -> CheckResult {
    if output.success() {
        CheckResult::passed("lint (golangci-lint)", "No lint errors")
    } else {
        CheckResult::warning("lint", "Lint issues found").with_details(&output.stdout)
    }
}

fn vet_check(output: &ProcessOutput) -> CheckResult {
    if output.success() {
        CheckResult::passed("vet", "No vet issues")
    } else {
        CheckResult::warning("vet", "Vet issues found").with_details(output.detail())
    }
}

/// Extract the lowest per-package coverage percentage from `go test`
/// output. Multiple packages each print their own `coverage:` line; the
/// weakest one gates the release.
fn parse_go_coverage(stdout: &str) -> Option<f64> {
    let re = Regex::new(r"coverage: (\d+\.?\d*)% of statements").ok()?;
    re.captures_iter(stdout)
        .filter_map(|cap| cap.get(1)?.as_str().parse::<f64>().ok())
        .fold(None, |min, v| match min {
            Some(m) if m <= v => Some(m),
            _ => Some(v),
        })
}
