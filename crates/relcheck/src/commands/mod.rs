//! Command implementations

pub mod check;

pub mod doctor;

use anyhow::Context;
use inquire::Select;
use owo_colors::OwoColorize;
use relcheck_core::ProjectType;

/// Prompt the user to pick a project type when detection found nothing
/// better than generic.
pub fn prompt_project_type_selection() -> anyhow::Result<ProjectType> {
    println!("\n{}", "Could not auto-detect project type.".yellow().bold());
    println!(
        "{}",
        "No Cargo.toml, package.json, or other marker file found.".dimmed()
    );
    println!();

    let options = vec![
        "Generic (marker checks only)".to_string(),
        "Rust".to_string(),
        "Python".to_string(),
        "Node.js".to_string(),
        "Go".to_string(),
        "Claude plugin".to_string(),
        "Exit".to_string(),
    ];

    let selection = Select::new("Select project type:", options)
        .with_starting_cursor(0)
        .prompt()
        .context("project type selection cancelled")?;

    match selection.as_str() {
        s if s.starts_with("Generic") => Ok(ProjectType::Generic),
        "Rust" => Ok(ProjectType::Rust),
        "Python" => Ok(ProjectType::Python),
        "Node.js" => Ok(ProjectType::Nodejs),
        "Go" => Ok(ProjectType::Go),
        "Claude plugin" => Ok(ProjectType::ClaudePlugin),
        "Exit" => {
            println!("{}", "Cancelled.".yellow());
            std::process::exit(0);
        }
        _ => anyhow::bail!("unexpected selection: {selection}"),
    }
}
