//! Git queries for release validation.
//!
//! Shells out to `git` for all operations. This ensures we inherit the
//! user's SSH keys, hooks, and other configuration. All queries take the
//! project root explicitly so one process can validate any directory.

use std::process::Command;

use camino::Utf8Path;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// Failed to execute the `git` command.
    #[error("failed to run git: {0}")]
    Exec(#[from] std::io::Error),

    /// `git` returned a non-zero exit code.
    #[error("git {command} failed: {stderr}")]
    Command {
        /// The git subcommand that failed (e.g., "describe").
        command: String,
        /// Captured stderr.
        stderr: String,
    },

    /// Not inside a git repository.
    #[error("not a git repository (or any parent up to mount point)")]
    NotARepo,
}

/// Result alias for git operations.
pub type GitResult<T> = Result<T, GitError>;

/// Check if `root` is inside a git repository.
#[instrument(fields(root = %root))]
pub fn is_inside_repo(root: &Utf8Path) -> GitResult<bool> {
    let result = git(root, &["rev-parse", "--is-inside-work-tree"]);
    match result {
        Ok(output) => Ok(output.trim() == "true"),
        Err(GitError::Command { .. } | GitError::NotARepo) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Get the most recent reachable tag, if any.
///
/// Uses `git describe --tags --abbrev=0`. Returns `None` when the
/// repository has no tags (or no commits at all) — absent history is not
/// an error.
#[instrument(fields(root = %root))]
pub fn latest_tag(root: &Utf8Path) -> GitResult<Option<String>> {
    let result = git(root, &["describe", "--tags", "--abbrev=0"]);
    match result {
        Ok(output) => {
            let tag = output.trim().to_string();
            debug!(%tag, "latest tag");
            Ok(Some(tag))
        }
        Err(GitError::Command { .. } | GitError::NotARepo) => {
            debug!("no reachable tag");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Diff the working tree against `since`, one `STATUS\tPATH[\tPATH]` line
/// per changed file.
#[instrument(fields(root = %root, since))]
pub fn diff_name_status(root: &Utf8Path, since: &str) -> GitResult<String> {
    let range = format!("{since}..HEAD");
    git(root, &["diff", "--name-status", &range])
}

/// Run a git command in `root` and return its stdout.
fn git(root: &Utf8Path, args: &[&str]) -> GitResult<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root.as_std_path())
        .output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        // Detect "not a git repo" specifically
        if stderr.contains("not a git repository") {
            return Err(GitError::NotARepo);
        }

        Err(GitError::Command {
            command: args.first().unwrap_or(&"").to_string(),
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_tmp(tmp: &TempDir) -> &Utf8Path {
        Utf8Path::from_path(tmp.path()).expect("tempdir is UTF-8")
    }

    // Tests run `git` against throwaway repos under tempdirs so they hold
    // regardless of the state of the relcheck checkout itself.

    fn git_init(root: &Utf8Path) -> bool {
        Command::new("git")
            .args(["init", "--quiet"])
            .current_dir(root.as_std_path())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[test]
    fn non_repo_is_not_inside() {
        let tmp = TempDir::new().unwrap();
        assert!(!is_inside_repo(utf8_tmp(&tmp)).unwrap_or(false));
    }

    #[test]
    fn fresh_repo_is_inside_with_no_tags() {
        let tmp = TempDir::new().unwrap();
        let root = utf8_tmp(&tmp);
        if !git_init(root) {
            return; // git unavailable in this environment
        }

        assert!(is_inside_repo(root).unwrap());
        assert_eq!(latest_tag(root).unwrap(), None);
    }
}
