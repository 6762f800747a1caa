use crate::error::{Error, Result};
use crate::models::HistoryEntry;
use chrono::{DateTime, Utc};
use git2::{Repository, Sort};
use std::path::Path;

fn to_utc(time: git2::Time) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(time.seconds(), 0).ok_or(Error::TimeOutOfRange(time.seconds()))
}

/// Commits reachable from HEAD, newest commit time first.
///
/// An empty repository yields an empty list.
pub fn recent_commits(repo: &Repository, limit: Option<usize>) -> Result<Vec<HistoryEntry>> {
    match repo.head() {
        Ok(_) => {}
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    }

    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME)?;
    revwalk.push_head()?;

    let mut entries = Vec::new();
    for oid in revwalk.take(limit.unwrap_or(usize::MAX)) {
        let commit = repo.find_commit(oid?)?;
        let author = commit.author();
        let committer = commit.committer();

        entries.push(HistoryEntry {
            id: commit.id().to_string(),
            summary: commit.summary().unwrap_or("").to_string(),
            author: author.name().unwrap_or("").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            authored_at: to_utc(author.when())?,
            committed_at: to_utc(committer.when())?,
        });
    }

    Ok(entries)
}

/// Opens the repository at `path` and reads its most recent commits.
pub fn read_history(path: &Path, limit: Option<usize>) -> Result<Vec<HistoryEntry>> {
    let repo = Repository::open(path).map_err(|e| {
        if e.code() == git2::ErrorCode::NotFound {
            Error::NotARepository(path.display().to_string())
        } else {
            Error::Git(e)
        }
    })?;
    recent_commits(&repo, limit)
}

/// Number of commits reachable from HEAD.
pub fn commit_count(repo: &Repository) -> Result<usize> {
    Ok(recent_commits(repo, None)?.len())
}
