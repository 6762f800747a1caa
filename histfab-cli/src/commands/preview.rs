use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use histfab_core::Fabricator;
use std::path::PathBuf;

pub fn run(config_path: Option<PathBuf>, seed: Option<u64>) -> Result<()> {
    let mut config = super::load_config(config_path)?;
    if seed.is_some() {
        config.seed = seed;
    }

    let mut fabricator = Fabricator::new(config)?;
    let (timestamp, unit) = fabricator.next_unit(Utc::now())?;

    println!("{}", "Preview".bold().cyan());
    println!("  {}: {}", "Path".bold(), unit.path.display());
    println!("  {}: {}", "Date".bold(), timestamp);
    println!();
    print!("{}", unit.content);

    Ok(())
}
