use thiserror::Error;

pub type AdcraftResult<T> = Result<T, AdcraftError>;

#[derive(Error, Debug)]
pub enum AdcraftError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Bulk commit of {attempted} ad records failed: {source}")]
    CommitFailed {
        attempted: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("A commit is already in flight for this session")]
    CommitInProgress,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
