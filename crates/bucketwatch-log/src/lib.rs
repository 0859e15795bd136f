//! Logging context for bucketwatch.
//!
//! Components never reach for a process-wide logger registry. Instead a single
//! [`Logging`] context is built once from a [`LogConfig`] and handed to every
//! component, which derives a subsystem-scoped [`Logger`] from it. Messages are
//! forwarded to `tracing`, so whatever subscriber the embedding binary installs
//! (see [`init_tracing`]) receives them.
//!
//! # Key Types
//!
//! - [`Severity`] -- `Debug < Info < Warn < Error`
//! - [`LogConfig`] -- minimum severity and subsystem filter
//! - [`Logging`] -- shared context holding the config and the counters
//! - [`Logger`] -- subsystem-bound handle used by components
//! - [`LogStats`] -- snapshot of per-severity message counts

pub mod context;
pub mod error;
pub mod severity;
pub mod subscriber;

pub use context::{LogConfig, LogStats, Logger, Logging};
pub use error::LogError;
pub use severity::Severity;
pub use subscriber::init_tracing;
