//! Polling reconciler for object namespaces.
//!
//! A [`Poller`] keeps a [`SeenSet`] of every key it has successfully handed
//! to the addition handler, together with the change marker it saw at the
//! time. Each cycle it walks the full listing, dispatches additions for new or
//! changed keys, and dispatches removals for keys that disappeared.
//!
//! Nothing a cycle does is fatal. Failed fetches and failed handler calls are
//! logged and retried on the next cycle, because the SeenSet only changes
//! after a handler succeeds.

pub mod config;
pub mod error;
pub mod handler;
pub mod poller;
pub mod report;
pub mod seen;

pub use config::PollerConfig;
pub use error::{PollError, PollResult};
pub use handler::{AdditionHandler, RemovalHandler};
pub use poller::Poller;
pub use report::CycleReport;
pub use seen::SeenSet;
