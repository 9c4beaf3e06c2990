//! Claude Code plugin pipeline.
//!
//! Plugins are validated structurally — manifest fields, agent
//! frontmatter, skill layout — without invoking external tools.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, instrument};

use crate::report::{CheckResult, ValidationReport};

/// Fields a plugin manifest must declare.
const REQUIRED_FIELDS: &[&str] = &["name", "version", "description"];

/// How many agent files to sample for frontmatter validation.
const AGENT_SAMPLE: usize = 10;

/// Run the claude-plugin pipeline.
#[instrument(skip(report), fields(root = %root))]
pub fn run(root: &Utf8Path, report: &mut ValidationReport) {
    report.record(manifest_check(root));

    if let Some(check) = agents_check(root) {
        report.record(check);
    }
    if let Some(check) = skills_check(root) {
        report.record(check);
    }
    if let Some(check) = commands_check(root) {
        report.record(check);
    }
}

/// Validate the plugin manifest.
///
/// Prefers `.claude-plugin/plugin.json`, falls back to `plugin.json` at
/// the root. A missing manifest, unparseable JSON, or missing required
/// fields all block the release.
fn manifest_check(root: &Utf8Path) -> CheckResult {
    let mut manifest = root.join(".claude-plugin/plugin.json");
    if !manifest.is_file() {
        manifest = root.join("plugin.json");
    }

    let Ok(raw) = fs::read_to_string(&manifest) else {
        return CheckResult::failed("plugin.json", "plugin.json not found");
    };

    let data: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(data) => data,
        Err(e) => return CheckResult::failed("plugin.json", format!("Invalid JSON: {e}")),
    };

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| data.get(field).is_none())
        .collect();

    if missing.is_empty() {
        let version = data
            .get("version")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        CheckResult::passed("plugin.json", format!("Valid plugin.json (v{version})"))
    } else {
        CheckResult::failed(
            "plugin.json",
            format!("Missing required fields: {}", missing.join(", ")),
        )
    }
}

/// Sample agent definitions for a frontmatter header.
///
/// Returns `None` when there is no `agents/` directory or it holds no
/// markdown files — nothing to evaluate.
fn agents_check(root: &Utf8Path) -> Option<CheckResult> {
    let agents_dir = root.join("agents");
    if !agents_dir.is_dir() {
        return None;
    }

    let agent_files = collect_md_files(&agents_dir);
    if agent_files.is_empty() {
        return None;
    }

    let valid = agent_files
        .iter()
        .take(AGENT_SAMPLE)
        .filter(|path| {
            fs::read_to_string(path)
                .map(|content| content.starts_with("---"))
                .unwrap_or(false)
        })
        .count();
    debug!(total = agent_files.len(), valid, "sampled agent files");

    let message = format!(
        "Found {} agents, {valid} with valid frontmatter",
        agent_files.len()
    );
    Some(if valid > 0 {
        CheckResult::passed("agents", message)
    } else {
        CheckResult::warning("agents", message)
    })
}

/// Count skill directories carrying a `SKILL.md` marker.
fn skills_check(root: &Utf8Path) -> Option<CheckResult> {
    let skills_dir = root.join("skills");
    let entries = skills_dir.read_dir_utf8().ok()?;

    let skill_dirs: Vec<Utf8PathBuf> = entries
        .flatten()
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| path.is_dir())
        .collect();
    let valid = skill_dirs
        .iter()
        .filter(|dir| dir.join("SKILL.md").is_file())
        .count();

    let message = format!(
        "Found {} skill directories, {valid} with SKILL.md",
        skill_dirs.len()
    );
    Some(if valid > 0 {
        CheckResult::passed("skills", message)
    } else {
        CheckResult::warning("skills", message)
    })
}

/// Count command definitions.
fn commands_check(root: &Utf8Path) -> Option<CheckResult> {
    let commands_dir = root.join("commands");
    let entries = commands_dir.read_dir_utf8().ok()?;

    let count = entries
        .flatten()
        .filter(|entry| entry.path().extension() == Some("md") && entry.path().is_file())
        .count();

    Some(CheckResult::passed(
        "commands",
        format!("Found {count} commands"),
    ))
}

/// Recursively collect `*.md` files, sorted for deterministic sampling.
fn collect_md_files(dir: &Utf8Path) -> Vec<Utf8PathBuf> {
    let mut files = Vec::new();
    collect_md_into(dir, &mut files);
    files.sort();
    files
}

fn collect_md_into(dir: &Utf8Path, out: &mut Vec<Utf8PathBuf>) {
    let Ok(entries) = dir.read_dir_utf8() else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_md_into(path, out);
        } else if path.extension() == Some("md") {
            out.push(path.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecosystem::ProjectType;
    use crate::report::CheckOutcome;
    use std::fs;
    use tempfile::TempDir;

    fn utf8_tmp(tmp: &TempDir) -> &Utf8Path {
        Utf8Path::from_path(tmp.path()).expect("tempdir is UTF-8")
    }

    fn write_manifest(tmp: &TempDir, body: &str) {
        let dir = tmp.path().join(".claude-plugin");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("plugin.json"), body).unwrap();
    }

    #[test]
    fn valid_manifest_passes_with_version() {
        let tmp = TempDir::new().unwrap();
        write_manifest(
            &tmp,
            r#"{"name": "demo", "version": "1.2.0", "description": "a plugin"}"#,
        );

        let check = manifest_check(utf8_tmp(&tmp));
        assert_eq!(check.outcome, CheckOutcome::Passed);
        assert!(check.message.contains("v1.2.0"));
    }

    #[test]
    fn manifest_missing_fields_fails_and_names_them() {
        let tmp = TempDir::new().unwrap();
        write_manifest(&tmp, r#"{"name": "demo"}"#);

        let check = manifest_check(utf8_tmp(&tmp));
        assert_eq!(check.outcome, CheckOutcome::Failed);
        assert!(check.message.contains("version"));
        assert!(check.message.contains("description"));
    }

    #[test]
    fn manifest_invalid_json_fails() {
        let tmp = TempDir::new().unwrap();
        write_manifest(&tmp, "{not json");

        let check = manifest_check(utf8_tmp(&tmp));
        assert_eq!(check.outcome, CheckOutcome::Failed);
        assert!(check.message.contains("Invalid JSON"));
    }

    #[test]
    fn absent_manifest_fails() {
        let tmp = TempDir::new().unwrap();
        let check = manifest_check(utf8_tmp(&tmp));
        assert_eq!(check.outcome, CheckOutcome::Failed);
        assert!(check.message.contains("not found"));
    }

    #[test]
    fn root_manifest_is_fallback() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("plugin.json"),
            r#"{"name": "demo", "version": "0.1.0", "description": "d"}"#,
        )
        .unwrap();

        let check = manifest_check(utf8_tmp(&tmp));
        assert_eq!(check.outcome, CheckOutcome::Passed);
    }

    #[test]
    fn agents_with_frontmatter_pass() {
        let tmp = TempDir::new().unwrap();
        let agents = tmp.path().join("agents");
        fs::create_dir_all(agents.join("nested")).unwrap();
        fs::write(agents.join("reviewer.md"), "---\nname: reviewer\n---\n").unwrap();
        fs::write(agents.join("nested/helper.md"), "no frontmatter").unwrap();

        let check = agents_check(utf8_tmp(&tmp)).unwrap();
        assert_eq!(check.outcome, CheckOutcome::Passed);
        assert!(check.message.contains("2 agents"));
        assert!(check.message.contains("1 with valid frontmatter"));
    }

    #[test]
    fn agents_without_frontmatter_warn() {
        let tmp = TempDir::new().unwrap();
        let agents = tmp.path().join("agents");
        fs::create_dir_all(&agents).unwrap();
        fs::write(agents.join("a.md"), "just prose").unwrap();

        let check = agents_check(utf8_tmp(&tmp)).unwrap();
        assert_eq!(check.outcome, CheckOutcome::Warning);
    }

    #[test]
    fn missing_agents_dir_is_skipped_silently() {
        let tmp = TempDir::new().unwrap();
        assert!(agents_check(utf8_tmp(&tmp)).is_none());
    }

    #[test]
    fn skills_counted_by_marker_file() {
        let tmp = TempDir::new().unwrap();
        let skills = tmp.path().join("skills");
        fs::create_dir_all(skills.join("release")).unwrap();
        fs::create_dir_all(skills.join("empty")).unwrap();
        fs::write(skills.join("release/SKILL.md"), "# Release").unwrap();

        let check = skills_check(utf8_tmp(&tmp)).unwrap();
        assert_eq!(check.outcome, CheckOutcome::Passed);
        assert!(check.message.contains("2 skill directories"));
        assert!(check.message.contains("1 with SKILL.md"));
    }

    #[test]
    fn skills_without_markers_warn() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("skills/bare")).unwrap();

        let check = skills_check(utf8_tmp(&tmp)).unwrap();
        assert_eq!(check.outcome, CheckOutcome::Warning);
    }

    #[test]
    fn commands_always_pass_when_dir_exists() {
        let tmp = TempDir::new().unwrap();
        let commands = tmp.path().join("commands");
        fs::create_dir_all(&commands).unwrap();
        fs::write(commands.join("deploy.md"), "").unwrap();
        fs::write(commands.join("notes.txt"), "").unwrap();

        let check = commands_check(utf8_tmp(&tmp)).unwrap();
        assert_eq!(check.outcome, CheckOutcome::Passed);
        assert!(check.message.contains("1 commands"));
    }

    #[test]
    fn full_pipeline_always_records_manifest_check() {
        let tmp = TempDir::new().unwrap();
        let root = utf8_tmp(&tmp);
        let mut report = ValidationReport::new(ProjectType::ClaudePlugin, root);

        run(root, &mut report);

        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].name, "plugin.json");
    }
}
