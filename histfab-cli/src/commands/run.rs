use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use histfab_core::{Config, Fabricator, IterationOutcome, PublishOutcome, Resolution};
use std::path::PathBuf;

/// Command-line values that take precedence over the config file.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Local repository path
    #[arg(short, long)]
    pub repo: Option<PathBuf>,

    /// Remote URL to clone from when the repository is missing
    #[arg(long)]
    pub remote_url: Option<String>,

    /// Number of commits to create
    #[arg(short = 'n', long)]
    pub commits: Option<u32>,

    /// Spread commits over this many days back
    #[arg(short, long)]
    pub days_back: Option<u32>,

    /// Destination branch on the remote
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Seed for reproducible content and dates
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Overrides {
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(repo) = self.repo {
            config.repo_path = repo;
        }
        if let Some(url) = self.remote_url {
            config.remote_url = Some(url);
        }
        if let Some(commits) = self.commits {
            config.commits_per_run = commits;
        }
        if let Some(days) = self.days_back {
            config.days_back = days;
        }
        if let Some(branch) = self.branch {
            config.branch = Some(branch);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config
    }
}

pub fn run(
    config_path: Option<PathBuf>,
    overrides: Overrides,
    push: bool,
    strict: bool,
) -> Result<()> {
    let config = overrides.apply(super::load_config(config_path)?);
    let repo_path = config.repo_path.clone();

    let mut fabricator = Fabricator::new(config).context("Invalid configuration")?;

    println!("{}", "Fabricating history...".bold());
    println!("  {}: {}", "Repository".bold(), repo_path.display());
    println!(
        "  {}: {}",
        "Commits".bold(),
        fabricator.config().commits_per_run
    );
    println!();

    let report = fabricator
        .run(push)
        .with_context(|| format!("Could not prepare repository at {}", repo_path.display()))?;

    if report.resolution == Resolution::Cloned {
        println!("{}", "Cloned remote repository".cyan());
    }

    for outcome in &report.iterations {
        match outcome {
            IterationOutcome::Committed(record) => {
                println!(
                    "  {} {} {}",
                    "✓".green(),
                    record.timestamp.datetime().format("%Y-%m-%d %H:%M"),
                    record.path.display()
                );
            }
            IterationOutcome::Failed { stage, error } => {
                println!("  {} {} failed: {}", "✗".red(), stage, error);
            }
        }
    }
    println!();

    match &report.publish {
        PublishOutcome::Published { remote, refspec } => {
            println!(
                "{}",
                format!("✓ Pushed {} to {}", refspec, remote).green().bold()
            );
        }
        PublishOutcome::Skipped => {
            println!("{}", "Push skipped".yellow());
        }
        PublishOutcome::Failed(error) => {
            println!("{} {}", "✗ Push failed:".red().bold(), error);
        }
    }

    println!(
        "  {}: {}/{}",
        "Committed".bold(),
        report.committed_count(),
        report.iterations.len()
    );

    if strict && report.has_failures() {
        anyhow::bail!(
            "{} commit(s) failed or push did not succeed",
            report.failed_count()
        );
    }

    Ok(())
}
