use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Path exists but is not a git repository: {0}")]
    NotARepository(String),

    #[error("No remote URL configured; cannot clone into {0}")]
    MissingRemoteUrl(String),

    #[error("Clone of {url} failed: {source}")]
    CloneFailed {
        url: String,
        #[source]
        source: git2::Error,
    },

    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    #[error("Push rejected for {reference}: {message}")]
    PushRejected { reference: String, message: String },

    #[error("HEAD is detached; configure a branch to push")]
    DetachedHead,

    #[error("Commit time out of range: {0} seconds since epoch")]
    TimeOutOfRange(i64),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}
