use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder in `file_template` replaced by the timestamp token.
pub const DATE_PLACEHOLDER: &str = "{date}";

/// True for a relative path made only of named segments: no empty, `.` or
/// `..` segment anywhere. git refuses to stage anything else.
pub fn is_plain_relative(path: &Path) -> bool {
    path.is_relative()
        && path.to_str().map_or(false, |s| {
            s.split(['/', '\\'])
                .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
        })
}

/// Settings for one fabrication run.
///
/// Every field has a default so a partial TOML file is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub repo_path: PathBuf,
    pub remote_url: Option<String>,
    pub remote_name: String,
    /// Destination branch. `None` pushes the checked-out branch to the same name.
    pub branch: Option<String>,
    pub file_template: String,
    pub commits_per_run: u32,
    pub days_back: u32,
    pub work_hours_start: u32,
    pub work_hours_end: u32,
    pub author_name: String,
    pub author_email: String,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_path: PathBuf::from("."),
            remote_url: None,
            remote_name: "origin".to_string(),
            branch: None,
            file_template: format!("code_gen/code_{}.py", DATE_PLACEHOLDER),
            commits_per_run: 3,
            days_back: 365,
            work_hours_start: 9,
            work_hours_end: 18,
            author_name: "Commit Bot".to_string(),
            author_email: "bot@example.com".to_string(),
            seed: None,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn work_hours(&self) -> (u32, u32) {
        (self.work_hours_start, self.work_hours_end)
    }

    pub fn validate(&self) -> Result<()> {
        if self.days_back == 0 {
            return Err(Error::InvalidConfig(
                "days_back must be at least 1".to_string(),
            ));
        }

        if self.work_hours_start > self.work_hours_end || self.work_hours_end > 23 {
            return Err(Error::InvalidConfig(format!(
                "work hours {}..={} must satisfy start <= end <= 23",
                self.work_hours_start, self.work_hours_end
            )));
        }

        if !self.file_template.contains(DATE_PLACEHOLDER) {
            return Err(Error::InvalidConfig(format!(
                "file_template {:?} has no {} placeholder",
                self.file_template, DATE_PLACEHOLDER
            )));
        }

        if !is_plain_relative(Path::new(&self.file_template)) {
            return Err(Error::InvalidConfig(format!(
                "file_template {:?} must be a plain relative path inside the repository",
                self.file_template
            )));
        }

        if self.author_name.trim().is_empty() || self.author_email.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "author name and email must not be empty".to_string(),
            ));
        }

        if self.remote_name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "remote_name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
