use thiserror::Error;

#[derive(Debug, Error)]
pub enum PollError {
    #[error("transport error: {0}")]
    Transport(#[from] bucketwatch_store::StoreError),

    #[error("addition handler failed for {key}: {source:#}")]
    Addition {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("removal handler failed for {key}: {source:#}")]
    Removal {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type PollResult<T> = Result<T, PollError>;
