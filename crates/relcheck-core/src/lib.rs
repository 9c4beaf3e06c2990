//! Core library for relcheck.
//!
//! This crate provides the validation engine used by the `relcheck` CLI
//! and any downstream consumers: it classifies a project directory into
//! an ecosystem, runs that ecosystem's verification pipeline, scans git
//! history for breaking changes, and assembles a go/no-go report with a
//! semver bump recommendation.
//!
//! # Modules
//!
//! - [`breaking`] - Breaking-change detection from git diffs
//! - [`checks`] - Per-ecosystem check pipelines and common checks
//! - [`config`] - Configuration loading and management
//! - [`detect`] - Project type detection
//! - [`ecosystem`] - Project type enumeration
//! - [`error`] - Error types and result aliases
//! - [`git`] - Git queries for tag and diff inspection
//! - [`process`] - Bounded external command execution
//! - [`report`] - Check results and the validation report
//! - [`runner`] - Validation orchestration
//! - [`threshold`] - Coverage threshold resolution
//!
//! # Quick Start
//!
//! ```no_run
//! use camino::Utf8Path;
//! use relcheck_core::runner::{ValidationOptions, validate_project};
//!
//! let report = validate_project(Utf8Path::new("."), &ValidationOptions::default())
//!     .expect("project path exists");
//!
//! println!("ready: {}, bump: {}", report.passed(), report.semver_recommendation);
//! ```
#![deny(unsafe_code)]

pub mod breaking;

pub mod checks;

pub mod config;

pub mod detect;

pub mod ecosystem;

pub mod error;

pub mod git;

pub mod process;

pub mod report;

pub mod runner;

pub mod threshold;

pub use config::{Config, ConfigLoader, LogLevel};

pub use ecosystem::ProjectType;

pub use error::{ConfigError, ConfigResult, ValidateError};

pub use report::{CheckOutcome, CheckResult, SemverBump, ValidationReport};
