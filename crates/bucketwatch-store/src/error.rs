/// Errors from listing or fetching objects.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend could not be reached or refused the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The listing request itself is malformed.
    #[error("invalid list request: {0}")]
    InvalidRequest(String),

    /// A truncated page gave no point to continue the listing from.
    #[error("truncated listing page after marker {marker:?} has no continuation")]
    IncompletePage { marker: String },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
