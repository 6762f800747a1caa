//! # histfab-core
//!
//! Core library for histfab - backdated commit generation.
//!
//! This crate synthesizes source-like files, commits them into a git
//! repository with historical author and committer dates, and pushes the
//! result to a remote.

pub mod config;
pub mod credentials;
pub mod error;
pub mod fabricator;
pub mod history;
pub mod models;
pub mod publisher;
pub mod resolver;
pub mod synth;
pub mod writer;

pub use config::Config;
pub use error::{Error, Result};
pub use fabricator::Fabricator;
pub use models::{
    CommitRecord, ContentUnit, HistoryEntry, IterationOutcome, PublishOutcome, Resolution,
    RunReport, Stage, SyntheticTimestamp,
};
pub use writer::Identity;
