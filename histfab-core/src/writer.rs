use crate::config::is_plain_relative;
use crate::error::{Error, Result};
use crate::models::{CommitRecord, ContentUnit, Stage, SyntheticTimestamp};
use git2::{Repository, Signature};
use std::path::Path;
use tracing::{debug, warn};

/// Author and committer identity stamped on generated commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    fn signature_at(&self, timestamp: &SyntheticTimestamp) -> Result<Signature<'static>> {
        Ok(Signature::new(&self.name, &self.email, &timestamp.git_time())?)
    }
}

/// Commit message for a generated file: `Add <file name>`.
pub fn commit_message(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    format!("Add {}", name)
}

/// Writes `unit` into the working tree, stages that one file and commits it
/// with author and committer dates set to `timestamp`.
///
/// Errors carry the stage they happened in so the caller can keep going.
pub fn write_commit(
    repo: &Repository,
    unit: &ContentUnit,
    timestamp: &SyntheticTimestamp,
    identity: &Identity,
) -> std::result::Result<CommitRecord, (Stage, Error)> {
    write_file(repo, unit).map_err(|e| (Stage::Write, e))?;

    let mut index = repo.index().map_err(|e| (Stage::Stage, Error::Git(e)))?;
    let tree_id = match stage_file(&mut index, &unit.path) {
        Ok(tree_id) => tree_id,
        Err(e) => {
            discard_staged(&mut index);
            return Err((Stage::Stage, e));
        }
    };

    let message = commit_message(&unit.path);
    let oid = match commit_tree(repo, tree_id, &message, timestamp, identity) {
        Ok(oid) => oid,
        Err(e) => {
            discard_staged(&mut index);
            return Err((Stage::Commit, e));
        }
    };

    // HEAD already points at the commit; an unwritten index is not fatal.
    if let Err(e) = index.write() {
        warn!(oid = %oid, "Failed to write index: {}", e);
    }
    debug!(oid = %oid, path = ?unit.path, "commit written");

    Ok(CommitRecord {
        id: oid.to_string(),
        path: unit.path.clone(),
        message,
        timestamp: *timestamp,
    })
}

fn workdir(repo: &Repository) -> Result<&Path> {
    repo.workdir()
        .ok_or_else(|| Error::InvalidPath("repository has no working directory".to_string()))
}

fn write_file(repo: &Repository, unit: &ContentUnit) -> Result<()> {
    if !is_plain_relative(&unit.path) {
        return Err(Error::InvalidPath(unit.path.display().to_string()));
    }

    let full_path = workdir(repo)?.join(&unit.path);
    if let Some(parent) = full_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&full_path, &unit.content)?;
    Ok(())
}

/// Adds `path` to the in-memory index and writes the tree. The index file on
/// disk is only updated once the commit exists.
fn stage_file(index: &mut git2::Index, path: &Path) -> Result<git2::Oid> {
    index.add_path(path)?;
    Ok(index.write_tree()?)
}

/// Drops in-memory staging by reloading the index from disk.
fn discard_staged(index: &mut git2::Index) {
    if let Err(e) = index.read(true) {
        warn!("Failed to reload index: {}", e);
    }
}

fn commit_tree(
    repo: &Repository,
    tree_id: git2::Oid,
    message: &str,
    timestamp: &SyntheticTimestamp,
    identity: &Identity,
) -> Result<git2::Oid> {
    let tree = repo.find_tree(tree_id)?;
    let signature = identity.signature_at(timestamp)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
        Err(e) => return Err(Error::Git(e)),
    };
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    Ok(repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )?)
}
