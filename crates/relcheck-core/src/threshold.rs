//! Coverage threshold resolution.
//!
//! Projects can declare their own coverage gate in ecosystem config; this
//! module digs it out and otherwise falls back to the caller-supplied
//! default. Resolution is best-effort: malformed config, a missing field,
//! or an unreadable file silently yields the default.

use std::fs;

use camino::Utf8Path;
use regex::Regex;
use tracing::{debug, instrument};

use crate::ecosystem::ProjectType;

/// Default minimum coverage percentage when the project declares none.
pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 95.0;

/// Resolve the coverage threshold for a project.
///
/// - python: `fail_under = N` in `pyproject.toml` (pytest-cov config).
/// - nodejs: `jest.coverageThreshold.global.lines` in `package.json`.
/// - everything else: `default`.
///
/// Never fails.
#[instrument(fields(root = %project_root, %project_type))]
pub fn resolve_threshold(project_root: &Utf8Path, project_type: ProjectType, default: f64) -> f64 {
    let resolved = match project_type {
        ProjectType::Python => python_threshold(project_root),
        ProjectType::Nodejs => node_threshold(project_root),
        _ => None,
    };

    match resolved {
        Some(value) => {
            debug!(threshold = value, "project-declared coverage threshold");
            value
        }
        None => default,
    }
}

fn python_threshold(project_root: &Utf8Path) -> Option<f64> {
    let content = fs::read_to_string(project_root.join("pyproject.toml")).ok()?;
    parse_fail_under(&content)
}

/// Extract `fail_under = N` from pyproject text.
fn parse_fail_under(content: &str) -> Option<f64> {
    let re = Regex::new(r"fail_under\s*=\s*(\d+(?:\.\d+)?)").ok()?;
    re.captures(content)?.get(1)?.as_str().parse().ok()
}

fn node_threshold(project_root: &Utf8Path) -> Option<f64> {
    let raw = fs::read_to_string(project_root.join("package.json")).ok()?;
    let pkg: serde_json::Value = serde_json::from_str(&raw).ok()?;
    pkg.get("jest")?
        .get("coverageThreshold")?
        .get("global")?
        .get("lines")?
        .as_f64()
}
