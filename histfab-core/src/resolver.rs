use crate::credentials::remote_callbacks;
use crate::error::{Error, Result};
use crate::models::Resolution;
use git2::build::RepoBuilder;
use git2::{FetchOptions, Repository};
use std::path::Path;
use tracing::info;

/// Opens the repository at `path`, cloning `remote_url` into it when the path
/// is missing or an empty directory.
///
/// A non-empty directory that is not a repository is refused rather than
/// cloned over.
pub fn resolve(path: &Path, remote_url: Option<&str>) -> Result<(Repository, Resolution)> {
    match Repository::open(path) {
        Ok(repo) => {
            info!("Opened existing repository at {:?}", path);
            return Ok((repo, Resolution::Opened));
        }
        Err(e) if e.code() != git2::ErrorCode::NotFound => return Err(Error::Git(e)),
        Err(_) => {}
    }

    if !is_missing_or_empty(path)? {
        return Err(Error::NotARepository(path.display().to_string()));
    }

    let url = remote_url.ok_or_else(|| Error::MissingRemoteUrl(path.display().to_string()))?;
    let repo = clone_remote(url, path)?;
    Ok((repo, Resolution::Cloned))
}

pub fn clone_remote(url: &str, path: &Path) -> Result<Repository> {
    info!("Cloning {} into {:?}", url, path);

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(remote_callbacks());

    RepoBuilder::new()
        .fetch_options(fetch_options)
        .clone(url, path)
        .map_err(|source| Error::CloneFailed {
            url: url.to_string(),
            source,
        })
}

fn is_missing_or_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    if !path.is_dir() {
        return Ok(false);
    }
    Ok(std::fs::read_dir(path)?.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_opens_existing_repository() {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();

        let (_, resolution) = resolve(dir.path(), None).unwrap();
        assert_eq!(resolution, Resolution::Opened);
    }

    #[test]
    fn test_refuses_non_empty_plain_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        let result = resolve(dir.path(), Some("https://example.invalid/repo.git"));
        assert!(matches!(result, Err(Error::NotARepository(_))));
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_missing_path_without_url() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("checkout");

        let result = resolve(&target, None);
        assert!(matches!(result, Err(Error::MissingRemoteUrl(_))));
    }

    #[test]
    fn test_unreachable_remote_is_clone_error() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("checkout");
        let bogus = dir.path().join("no-such-remote");

        let result = resolve(&target, bogus.to_str());
        assert!(matches!(result, Err(Error::CloneFailed { .. })));
    }
}
