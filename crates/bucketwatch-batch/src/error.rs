use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("batch size must be positive, got {0}")]
    InvalidBatchSize(usize),

    #[error("downstream closed with {pending} items undelivered")]
    DownstreamClosed { pending: usize },
}

pub type BatchResult<T> = Result<T, BatchError>;
