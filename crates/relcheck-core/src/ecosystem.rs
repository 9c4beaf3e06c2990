//! Project type enumeration.
//!
//! Defines the closed set of ecosystems relcheck knows how to validate.
//! Detection logic lives in the [`detect`](crate::detect) module — this
//! module is pure types and data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recognized project ecosystem.
///
/// Immutable once detected for a validation run. Selects which check
/// pipeline applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    /// Claude Code plugin (detected via `plugin.json`).
    ClaudePlugin,
    /// Python project (detected via `pyproject.toml` or `setup.py`).
    Python,
    /// Node.js project (detected via `package.json`).
    Nodejs,
    /// Go module (detected via `go.mod`).
    Go,
    /// Rust package (detected via `Cargo.toml`).
    Rust,
    /// No recognized ecosystem; minimal validation only.
    Generic,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClaudePlugin => write!(f, "claude-plugin"),
            Self::Python => write!(f, "python"),
            Self::Nodejs => write!(f, "nodejs"),
            Self::Go => write!(f, "go"),
            Self::Rust => write!(f, "rust"),
            Self::Generic => write!(f, "generic"),
        }
    }
}

impl ProjectType {
    /// Marker files that signal this ecosystem, in the order they are probed.
    ///
    /// `Generic` has no markers — it is the fallback when nothing matches.
    pub const fn marker_files(self) -> &'static [&'static str] {
        match self {
            Self::ClaudePlugin => &[".claude-plugin/plugin.json", "plugin.json"],
            Self::Python => &["pyproject.toml", "setup.py"],
            Self::Nodejs => &["package.json"],
            Self::Go => &["go.mod"],
            Self::Rust => &["Cargo.toml"],
            Self::Generic => &[],
        }
    }

    /// All recognized ecosystems, in detection priority order.
    pub const ALL: &[Self] = &[
        Self::ClaudePlugin,
        Self::Python,
        Self::Nodejs,
        Self::Go,
        Self::Rust,
        Self::Generic,
    ];
}
