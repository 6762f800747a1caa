use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

pub fn run(config_path: Option<PathBuf>, write: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let text = config.to_toml_string()?;

    match write {
        Some(path) => {
            if path.exists() {
                anyhow::bail!("{} already exists; not overwriting", path.display());
            }
            std::fs::write(&path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} {}",
                "✓ Wrote configuration to".green().bold(),
                path.display()
            );
        }
        None => print!("{}", text),
    }

    Ok(())
}
