use crate::config::Config;
use crate::error::Result;
use crate::models::{
    ContentUnit, IterationOutcome, PublishOutcome, RunReport, Stage, SyntheticTimestamp,
};
use crate::writer::{write_commit, Identity};
use crate::{publisher, resolver, synth};
use chrono::{DateTime, Utc};
use git2::Repository;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};

/// Runs the whole procedure: resolve the repository once, write
/// `commits_per_run` backdated commits, then push.
pub struct Fabricator {
    config: Config,
    identity: Identity,
    rng: StdRng,
}

impl Fabricator {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let identity = Identity::new(&config.author_name, &config.author_email);
        Ok(Self {
            config,
            identity,
            rng,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Draws a timestamp relative to `now` and synthesizes the matching file.
    pub fn next_unit(&mut self, now: DateTime<Utc>) -> Result<(SyntheticTimestamp, ContentUnit)> {
        let timestamp = SyntheticTimestamp::generate(
            &mut self.rng,
            now,
            self.config.days_back,
            self.config.work_hours(),
        )?;
        let unit = synth::synthesize(&mut self.rng, &timestamp, &self.config.file_template);
        Ok((timestamp, unit))
    }

    /// Resolution failures are returned as `Err`; everything after that is
    /// recorded in the report.
    pub fn run(&mut self, push: bool) -> Result<RunReport> {
        let (repo, resolution) = resolver::resolve(
            &self.config.repo_path,
            self.config.remote_url.as_deref(),
        )?;
        info!(?resolution, path = ?self.config.repo_path, "repository ready");

        let iterations = self.generate_commits(&repo);

        let publish = if push {
            self.publish(&repo)
        } else {
            info!("Push skipped");
            PublishOutcome::Skipped
        };

        Ok(RunReport {
            resolution,
            iterations,
            publish,
        })
    }

    /// Writes `commits_per_run` commits. A failed iteration is logged and the
    /// loop moves on.
    pub fn generate_commits(&mut self, repo: &Repository) -> Vec<IterationOutcome> {
        let now = Utc::now();
        let total = self.config.commits_per_run;
        let mut outcomes = Vec::with_capacity(total as usize);

        for iteration in 1..=total {
            let outcome = match self.next_unit(now) {
                Ok((timestamp, unit)) => {
                    match write_commit(repo, &unit, &timestamp, &self.identity) {
                        Ok(record) => {
                            info!(
                                iteration,
                                oid = %record.id,
                                path = ?record.path,
                                date = %record.timestamp,
                                "commit created"
                            );
                            IterationOutcome::Committed(record)
                        }
                        Err((stage, error)) => IterationOutcome::Failed { stage, error },
                    }
                }
                Err(error) => IterationOutcome::Failed {
                    stage: Stage::Synthesize,
                    error,
                },
            };

            if let IterationOutcome::Failed { stage, error } = &outcome {
                error!(iteration, %stage, "Error creating commit: {}", error);
            }
            outcomes.push(outcome);
        }

        outcomes
    }

    pub fn publish(&self, repo: &Repository) -> PublishOutcome {
        let remote = self.config.remote_name.clone();
        match publisher::publish(repo, &remote, self.config.branch.as_deref()) {
            Ok(refspec) => {
                info!("Successfully pushed {} to {}", refspec, remote);
                PublishOutcome::Published { remote, refspec }
            }
            Err(e) => {
                warn!("Error pushing changes: {}", e);
                PublishOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_rejects_invalid_config() {
        let config = Config {
            days_back: 0,
            ..Config::default()
        };
        assert!(matches!(Fabricator::new(config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_seeded_units_repeat() {
        let config = Config {
            seed: Some(5),
            ..Config::default()
        };
        let now = Utc::now();
        let mut a = Fabricator::new(config.clone()).unwrap();
        let mut b = Fabricator::new(config).unwrap();

        for _ in 0..3 {
            assert_eq!(a.next_unit(now).unwrap(), b.next_unit(now).unwrap());
        }
    }

    #[test]
    fn test_unit_path_matches_timestamp() {
        let mut fabricator = Fabricator::new(Config::default()).unwrap();
        let (timestamp, unit) = fabricator.next_unit(Utc::now()).unwrap();

        let expected = format!("code_gen/code_{}.py", timestamp.file_token());
        assert_eq!(unit.path, std::path::PathBuf::from(expected));
        assert!(unit.content.contains(&timestamp.to_rfc3339()));
    }
}
