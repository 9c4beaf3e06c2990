//! Ecosystem-independent checks: changelog hygiene and CI configuration.

use std::fs;

use camino::Utf8Path;
use tracing::instrument;

use crate::report::CheckResult;

/// Heading that marks pending release notes in a Keep-a-Changelog file.
const UNRELEASED_HEADING: &str = "## [Unreleased]";

/// CI marker paths probed in order; first match wins.
const CI_MARKERS: &[&str] = &[
    ".github/workflows",
    ".gitlab-ci.yml",
    "Jenkinsfile",
    ".circleci",
];

/// Check that a changelog exists and carries an unreleased section.
///
/// A missing changelog or a missing `[Unreleased]` heading is advisory,
/// never blocking.
#[instrument(fields(root = %root))]
pub fn changelog_check(root: &Utf8Path) -> CheckResult {
    let changelog = root.join("CHANGELOG.md");
    let Ok(content) = fs::read_to_string(&changelog) else {
        return CheckResult::warning("changelog", "CHANGELOG.md not found");
    };

    if content.contains(UNRELEASED_HEADING) {
        CheckResult::passed("changelog", "CHANGELOG.md has [Unreleased] section")
    } else {
        CheckResult::warning("changelog", "CHANGELOG.md missing [Unreleased] section")
    }
}

/// Check for a recognized CI configuration.
#[instrument(fields(root = %root))]
pub fn ci_config_check(root: &Utf8Path) -> CheckResult {
    for &marker in CI_MARKERS {
        let path = root.join(marker);
        if !path.exists() {
            continue;
        }

        if path.is_dir() {
            let count = count_workflow_files(&path);
            let name = path.file_name().unwrap_or(marker);
            return CheckResult::passed(
                "ci-config",
                format!("Found {count} CI workflow(s) in {name}"),
            );
        }
        let name = path.file_name().unwrap_or(marker);
        return CheckResult::passed("ci-config", format!("Found CI config: {name}"));
    }

    CheckResult::warning("ci-config", "No CI configuration found")
}

/// Count `*.yml` / `*.yaml` files directly inside a directory.
fn count_workflow_files(dir: &Utf8Path) -> usize {
    let Ok(entries) = dir.read_dir_utf8() else {
        return 0;
    };
    entries
        .flatten()
        .filter(|entry| {
            matches!(entry.path().extension(), Some("yml" | "yaml")) && entry.path().is_file()
        })
        .count()
}
