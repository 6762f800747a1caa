use crate::error::{Error, Result};
use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A backdated point in time used to name a generated file and stamp its commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SyntheticTimestamp(DateTime<Utc>);

impl SyntheticTimestamp {
    /// Draws a timestamp strictly inside `(now - days_back days, now)`.
    ///
    /// The day offset is drawn from `1..=days_back`, then an hour inside
    /// `hours` (inclusive) and a minute are drawn among the slots of that day
    /// that fall inside the window. When the oldest day has no such slot, the
    /// next more recent day is used.
    pub fn generate<R: Rng>(
        rng: &mut R,
        now: DateTime<Utc>,
        days_back: u32,
        hours: (u32, u32),
    ) -> Result<Self> {
        let (start, end) = hours;
        if days_back == 0 || start > end || end > 23 {
            return Err(Error::InvalidConfig(format!(
                "cannot draw a timestamp from {} days back within hours {}..={}",
                days_back, start, end
            )));
        }

        let lower = now - Duration::days(i64::from(days_back));
        let days_ago = rng.gen_range(1..=days_back);

        for offset in [days_ago, days_ago - 1] {
            let day = (now - Duration::days(i64::from(offset))).date_naive();
            let slots: Vec<DateTime<Utc>> = (start..=end)
                .flat_map(|hour| (0..60).map(move |minute| (hour, minute)))
                .filter_map(|(hour, minute)| day.and_hms_opt(hour, minute, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
                .filter(|t| *t > lower && *t < now)
                .collect();

            if let Some(slot) = slots.choose(rng) {
                return Ok(Self(*slot));
            }
        }

        Err(Error::InvalidConfig(format!(
            "no time within hours {}..={} falls in the last {} days",
            start, end, days_back
        )))
    }

    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn epoch_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    /// Fixed-width `YYYYMMDD_HHMM` token embedded in generated file names.
    pub fn file_token(&self) -> String {
        self.0.format("%Y%m%d_%H%M").to_string()
    }

    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, false)
    }

    /// Signature time for git: epoch seconds at offset zero.
    pub fn git_time(&self) -> git2::Time {
        git2::Time::new(self.epoch_seconds(), 0)
    }
}

impl fmt::Display for SyntheticTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

/// A generated source-like blob and the repository-relative path it goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUnit {
    pub path: PathBuf,
    pub content: String,
}

/// The commit produced by one successful iteration.
#[derive(Debug, Clone, Serialize)]
pub struct CommitRecord {
    pub id: String,
    pub path: PathBuf,
    pub message: String,
    pub timestamp: SyntheticTimestamp,
}

/// A commit as read back from repository history.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: String,
    pub summary: String,
    pub author: String,
    pub author_email: String,
    pub authored_at: DateTime<Utc>,
    pub committed_at: DateTime<Utc>,
}

/// How the repository handle was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Opened,
    Cloned,
}

/// Step of an iteration that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Synthesize,
    Write,
    Stage,
    Commit,
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Synthesize => "synthesize",
            Stage::Write => "write",
            Stage::Stage => "stage",
            Stage::Commit => "commit",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum IterationOutcome {
    Committed(CommitRecord),
    Failed { stage: Stage, error: Error },
}

impl IterationOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, IterationOutcome::Committed(_))
    }
}

#[derive(Debug)]
pub enum PublishOutcome {
    Published { remote: String, refspec: String },
    Skipped,
    Failed(Error),
}

/// Result of a run that got past repository resolution.
#[derive(Debug)]
pub struct RunReport {
    pub resolution: Resolution,
    pub iterations: Vec<IterationOutcome>,
    pub publish: PublishOutcome,
}

impl RunReport {
    pub fn commits(&self) -> impl Iterator<Item = &CommitRecord> {
        self.iterations.iter().filter_map(|outcome| match outcome {
            IterationOutcome::Committed(record) => Some(record),
            IterationOutcome::Failed { .. } => None,
        })
    }

    pub fn committed_count(&self) -> usize {
        self.commits().count()
    }

    pub fn failed_count(&self) -> usize {
        self.iterations.len() - self.committed_count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0 || matches!(self.publish, PublishOutcome::Failed(_))
    }
}
