use chrono::{DateTime, Duration, Utc};
use git2::{Repository, Signature};
use histfab_core::history::{commit_count, recent_commits};
use histfab_core::{
    Config, Error, Fabricator, IterationOutcome, PublishOutcome, Resolution, Stage,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Bare repository with one commit on `main`, standing in for the remote.
fn create_bare_remote(path: &Path) -> Repository {
    let repo = Repository::init_bare(path).unwrap();
    {
        let sig = Signature::now("Seed", "seed@example.com").unwrap();
        let tree_id = repo.treebuilder(None).unwrap().write().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some("refs/heads/main"), &sig, &sig, "seed", &tree, &[])
            .unwrap();
    }
    repo.set_head("refs/heads/main").unwrap();
    repo
}

fn config_for(checkout: PathBuf, remote: &Path, commits: u32) -> Config {
    Config {
        repo_path: checkout,
        remote_url: Some(remote.to_str().unwrap().to_string()),
        branch: Some("main".to_string()),
        commits_per_run: commits,
        days_back: 365,
        ..Config::default()
    }
}

fn main_commit_count(repo: &Repository) -> usize {
    let mut revwalk = repo.revwalk().unwrap();
    revwalk.push_ref("refs/heads/main").unwrap();
    revwalk.count()
}

fn header_timestamp(repo: &Repository, commit_id: &str, path: &Path) -> DateTime<Utc> {
    let commit = repo
        .find_commit(git2::Oid::from_str(commit_id).unwrap())
        .unwrap();
    let entry = commit.tree().unwrap().get_path(path).unwrap();
    let blob = repo.find_blob(entry.id()).unwrap();
    let content = std::str::from_utf8(blob.content()).unwrap();
    let stamp = content
        .lines()
        .next()
        .unwrap()
        .strip_prefix("# Auto-generated at ")
        .unwrap();
    DateTime::parse_from_rfc3339(stamp).unwrap().with_timezone(&Utc)
}

#[test]
fn test_two_runs_clone_once_and_push() {
    let dir = TempDir::new().unwrap();
    let remote_path = dir.path().join("remote.git");
    let remote = create_bare_remote(&remote_path);
    let checkout = dir.path().join("checkout");
    let config = config_for(checkout.clone(), &remote_path, 3);

    let mut file_paths = HashSet::new();

    for (run, expected_resolution) in [(1, Resolution::Cloned), (2, Resolution::Opened)] {
        let started = Utc::now();

        let report = Fabricator::new(config.clone()).unwrap().run(true).unwrap();
        assert_eq!(report.resolution, expected_resolution);
        assert_eq!(report.committed_count(), 3);
        assert!(!report.has_failures(), "run {} failed: {:?}", run, report);
        assert!(matches!(report.publish, PublishOutcome::Published { .. }));

        let repo = Repository::open(&checkout).unwrap();
        for record in report.commits() {
            file_paths.insert(record.path.clone());

            let commit = repo
                .find_commit(git2::Oid::from_str(&record.id).unwrap())
                .unwrap();
            let date = record.timestamp.datetime();
            assert_eq!(commit.author().when().seconds(), date.timestamp());
            assert_eq!(commit.committer().when().seconds(), date.timestamp());
            assert!(date < started - Duration::seconds(5));
            assert!(date > started - Duration::days(365));
            assert_eq!(header_timestamp(&repo, &record.id, &record.path), date);
        }

        assert_eq!(commit_count(&repo).unwrap(), 1 + 3 * run);
        assert_eq!(main_commit_count(&remote), 1 + 3 * run);
    }

    assert_eq!(file_paths.len(), 6);
}

#[test]
fn test_existing_checkout_does_not_contact_remote() {
    let dir = TempDir::new().unwrap();
    let remote_path = dir.path().join("remote.git");
    create_bare_remote(&remote_path);
    let checkout = dir.path().join("checkout");
    let config = config_for(checkout.clone(), &remote_path, 1);

    let first = Fabricator::new(config.clone()).unwrap().run(false).unwrap();
    assert_eq!(first.resolution, Resolution::Cloned);

    std::fs::remove_dir_all(&remote_path).unwrap();

    let second = Fabricator::new(config).unwrap().run(false).unwrap();
    assert_eq!(second.resolution, Resolution::Opened);
    assert_eq!(second.committed_count(), 1);
    assert!(matches!(second.publish, PublishOutcome::Skipped));
}

#[test]
fn test_write_failures_do_not_stop_the_loop() {
    let dir = TempDir::new().unwrap();
    let remote_path = dir.path().join("remote.git");
    create_bare_remote(&remote_path);
    let checkout = dir.path().join("checkout");
    let config = config_for(checkout.clone(), &remote_path, 4);

    // Clone first, then block the output directory with a plain file.
    Fabricator::new(Config {
        commits_per_run: 0,
        ..config.clone()
    })
    .unwrap()
    .run(false)
    .unwrap();
    std::fs::write(checkout.join("code_gen"), "blocking file").unwrap();

    let report = Fabricator::new(config).unwrap().run(false).unwrap();
    assert_eq!(report.iterations.len(), 4);
    assert_eq!(report.failed_count(), 4);
    for outcome in &report.iterations {
        assert!(matches!(
            outcome,
            IterationOutcome::Failed {
                stage: Stage::Write,
                ..
            }
        ));
    }

    let repo = Repository::open(&checkout).unwrap();
    assert_eq!(commit_count(&repo).unwrap(), 1);
}

#[test]
fn test_push_without_remote_is_reported() {
    let dir = TempDir::new().unwrap();
    Repository::init(dir.path()).unwrap();
    let config = Config {
        repo_path: dir.path().to_path_buf(),
        commits_per_run: 2,
        ..Config::default()
    };

    let report = Fabricator::new(config).unwrap().run(true).unwrap();
    assert_eq!(report.resolution, Resolution::Opened);
    assert_eq!(report.committed_count(), 2);
    assert!(matches!(
        report.publish,
        PublishOutcome::Failed(Error::RemoteNotFound(_))
    ));
    assert!(report.has_failures());
}

#[test]
fn test_non_fast_forward_push_is_reported() {
    let dir = TempDir::new().unwrap();
    let remote_path = dir.path().join("remote.git");
    create_bare_remote(&remote_path);

    let first = config_for(dir.path().join("first"), &remote_path, 1);
    let second = config_for(dir.path().join("second"), &remote_path, 1);

    // Both checkouts start from the same seed commit.
    Fabricator::new(Config {
        commits_per_run: 0,
        ..second.clone()
    })
    .unwrap()
    .run(false)
    .unwrap();

    let report = Fabricator::new(first).unwrap().run(true).unwrap();
    assert!(matches!(report.publish, PublishOutcome::Published { .. }));

    let report = Fabricator::new(second).unwrap().run(true).unwrap();
    assert_eq!(report.committed_count(), 1);
    assert!(matches!(report.publish, PublishOutcome::Failed(_)));
}

#[test]
fn test_zero_commits_leaves_history_alone() {
    let dir = TempDir::new().unwrap();
    let remote_path = dir.path().join("remote.git");
    create_bare_remote(&remote_path);
    let checkout = dir.path().join("checkout");

    let report = Fabricator::new(config_for(checkout.clone(), &remote_path, 0))
        .unwrap()
        .run(true)
        .unwrap();
    assert!(report.iterations.is_empty());

    let repo = Repository::open(&checkout).unwrap();
    assert_eq!(recent_commits(&repo, None).unwrap().len(), 1);
}

#[test]
fn test_resolution_errors_are_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("README"), "not a repository").unwrap();
    let config = Config {
        repo_path: dir.path().to_path_buf(),
        remote_url: Some("https://example.invalid/activity.git".to_string()),
        ..Config::default()
    };

    let result = Fabricator::new(config).unwrap().run(true);
    assert!(matches!(result, Err(Error::NotARepository(_))));
}
