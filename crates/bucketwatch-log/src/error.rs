/// Errors from the logging layer.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// A severity name could not be parsed.
    #[error("unknown severity: {0}")]
    UnknownSeverity(String),

    /// The global `tracing` subscriber could not be installed.
    #[error("failed to install tracing subscriber: {0}")]
    Init(String),
}
