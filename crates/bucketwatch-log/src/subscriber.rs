use tracing_subscriber::fmt::writer::MakeWriterExt;

use crate::context::LogConfig;
use crate::error::LogError;

/// Install the global `tracing` subscriber for a bucketwatch binary.
///
/// `WARN` and `ERROR` go to stderr, everything else to stdout. The subscriber's
/// max level follows `config.level`; per-subsystem filtering is done by
/// [`Logger`](crate::Logger) before events reach `tracing`.
pub fn init_tracing(config: &LogConfig) -> Result<(), LogError> {
    let writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .or_else(std::io::stdout);

    tracing_subscriber::fmt()
        .with_max_level(config.level.to_level())
        .with_writer(writer)
        .with_target(false)
        .try_init()
        .map_err(|e| LogError::Init(e.to_string()))
}
