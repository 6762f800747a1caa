use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{config, log, preview, run};

#[derive(Parser)]
#[command(name = "histfab")]
#[command(version, about = "Backdated commit history generator", long_about = None)]
struct Cli {
    /// Config file (defaults to ./histfab.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate backdated commits and push them
    Run {
        #[command(flatten)]
        overrides: run::Overrides,

        /// Do not push after committing
        #[arg(long)]
        no_push: bool,

        /// Exit with an error if any commit or the push failed
        #[arg(long)]
        strict: bool,
    },

    /// Print one generated file without touching any repository
    Preview {
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show recent commits of the target repository
    Log {
        /// Repository path (overrides the config file)
        #[arg(short, long)]
        repo: Option<PathBuf>,

        /// Number of commits to show (at least 1)
        #[arg(
            short,
            long,
            default_value = "10",
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        limit: usize,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Write the configuration to this file instead of printing it
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            overrides,
            no_push,
            strict,
        } => {
            run::run(cli.config, overrides, !no_push, strict)?;
        }
        Commands::Preview { seed } => {
            preview::run(cli.config, seed)?;
        }
        Commands::Log { repo, limit } => {
            log::run(cli.config, repo, limit)?;
        }
        Commands::Config { write } => {
            config::run(cli.config, write)?;
        }
    }

    Ok(())
}
