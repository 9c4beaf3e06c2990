//! Check command — validate release readiness.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use relcheck_core::ProjectType;
use relcheck_core::config::Config;
use relcheck_core::detect::detect_project_type;
use relcheck_core::report::{CheckOutcome, ValidationReport};
use relcheck_core::runner::{ValidationOptions, validate_project};
use relcheck_core::threshold::DEFAULT_COVERAGE_THRESHOLD;

/// Arguments for the `check` subcommand.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Project directory to validate (default: current directory)
    pub path: Option<Utf8PathBuf>,

    /// Validate as this project type instead of auto-detecting
    #[arg(long = "type", value_enum, value_name = "TYPE")]
    pub project_type: Option<ProjectType>,

    /// Minimum acceptable test coverage percentage
    #[arg(long, value_name = "PERCENT")]
    pub coverage_threshold: Option<f64>,
}

/// Run release-readiness checks and display the report.
#[instrument(name = "cmd_check", skip_all, fields(json_output))]
pub fn cmd_check(
    args: CheckArgs,
    global_json: bool,
    config: &Config,
    cwd: &Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing check command");

    let root = resolve_root(args.path.as_deref(), cwd);
    let mut options = build_options(&args, config);

    // When detection would land on generic, give an interactive user the
    // chance to pick the type explicitly.
    if options.project_type.is_none()
        && !global_json
        && root.exists()
        && detect_project_type(&root) == ProjectType::Generic
        && std::io::IsTerminal::is_terminal(&std::io::stdin())
        && let Ok(project_type) = super::prompt_project_type_selection()
    {
        options.project_type = Some(project_type);
    }

    let report = if global_json {
        validate_project(&root, &options)?
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("valid template"),
        );
        spinner.set_message("Running checks...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        let report = validate_project(&root, &options);
        spinner.finish_and_clear();
        report?
    };

    if global_json {
        let mut json = serde_json::to_value(&report)?;
        if let Some(obj) = json.as_object_mut() {
            obj.insert("passed".into(), report.passed().into());
            obj.insert("has_warnings".into(), report.has_warnings().into());
        }
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        print_report(&report);
    }

    if report.passed() {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "{} check(s) failed",
            report.failed_count()
        ))
    }
}

/// Resolve the project root from the optional positional path.
fn resolve_root(path: Option<&Utf8Path>, cwd: &Utf8Path) -> Utf8PathBuf {
    match path {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => cwd.join(p),
        None => cwd.to_path_buf(),
    }
}

/// Merge CLI flags over config values over built-in defaults.
fn build_options(args: &CheckArgs, config: &Config) -> ValidationOptions {
    let project = config.project.as_ref();
    ValidationOptions {
        project_type: args
            .project_type
            .or_else(|| project.and_then(|p| p.project_type)),
        coverage_threshold: args
            .coverage_threshold
            .or_else(|| project.and_then(|p| p.coverage_threshold))
            .unwrap_or(DEFAULT_COVERAGE_THRESHOLD),
    }
}

fn print_report(report: &ValidationReport) {
    println!("{}", "Release Readiness".bold().underline());
    println!(
        "  {}: {} ({})",
        "Project".dimmed(),
        report.project_path.cyan(),
        report.project_type
    );
    println!();

    for check in &report.checks {
        let icon = match check.outcome {
            CheckOutcome::Passed => "✓".green().to_string(),
            CheckOutcome::Failed => "✗".red().to_string(),
            CheckOutcome::Warning => "!".yellow().to_string(),
            CheckOutcome::Skipped => "○".dimmed().to_string(),
        };
        println!("  {icon} {}: {}", check.name.bold(), check.message);
        if check.outcome == CheckOutcome::Failed
            && let Some(ref details) = check.details
        {
            for line in details.lines().take(8) {
                println!("      {}", line.dimmed());
            }
        }
    }

    if !report.breaking_changes.is_empty() {
        println!();
        println!("{}", "Breaking Changes".bold().underline());
        for change in &report.breaking_changes {
            println!("  {} {change}", "!".yellow());
        }
    }

    println!();
    println!(
        "  {}: {}",
        "Suggested bump".dimmed(),
        report.semver_recommendation.to_string().bold()
    );
    if report.passed() {
        println!("  {} 🚀", "Ready to release!".green().bold());
    } else {
        println!(
            "  {} — fix issues above before releasing",
            format!("{} check(s) failed", report.failed_count())
                .red()
                .bold(),
        );
    }
}
