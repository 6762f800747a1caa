use anyhow::{Context, Result};
use colored::Colorize;
use histfab_core::history::read_history;
use std::path::PathBuf;

pub fn run(config_path: Option<PathBuf>, repo: Option<PathBuf>, limit: usize) -> Result<()> {
    let config = super::load_config(config_path)?;
    let repo_path = repo.unwrap_or(config.repo_path);

    let entries = read_history(&repo_path, Some(limit))
        .with_context(|| format!("Could not read history at {}", repo_path.display()))?;

    if entries.is_empty() {
        println!("{}", "No commits yet".yellow());
        return Ok(());
    }

    println!("{}", "Commit History".bold().cyan());
    println!();

    for entry in &entries {
        println!("{} {}", "commit".yellow().bold(), entry.id.yellow());
        println!(
            "{}: {} <{}>",
            "Author".bold(),
            entry.author,
            entry.author_email
        );
        println!(
            "{}: {}",
            "Date".bold(),
            entry.authored_at.format("%Y-%m-%d %H:%M:%S")
        );
        if entry.committed_at != entry.authored_at {
            println!(
                "{}: {}",
                "Committed".bold(),
                entry.committed_at.format("%Y-%m-%d %H:%M:%S")
            );
        }
        println!();
        println!("    {}", entry.summary);
        println!();
    }

    if entries.len() == limit {
        println!("Use {} to see more", "--limit N".cyan());
    }

    Ok(())
}
