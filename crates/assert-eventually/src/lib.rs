//! Assertions for conditions that become true eventually
//!
//! Tests of asynchronous or eventually-consistent code often need to wait
//! until something has happened. This crate polls a task until it passes, or
//! until it raises an expected error, and fails the test with a diagnostic
//! message when the timeout elapses first.
//!
//! ```rust,no_run
//! use assert_eventually::task::{ensure, TaskFailure};
//! use assert_eventually::{eventually, within};
//! use std::io;
//! use std::time::Duration;
//!
//! # fn queue_len() -> usize { 1 }
//! # fn connect() -> io::Result<()> { Err(io::ErrorKind::ConnectionRefused.into()) }
//! # fn main() -> assert_eventually::Result<()> {
//! eventually()
//!     .with_task(|| ensure(queue_len() > 0, "queue still empty"))
//!     .will_succeed()?;
//!
//! within(Duration::from_secs(5))?
//!     .with_task(|| connect().map_err(TaskFailure::from))
//!     .will_throw::<io::Error>()?;
//! # Ok(())
//! # }
//! ```

pub mod assertion;
pub mod config;
pub mod error;
pub mod observer;
pub mod task;
pub mod testing;
pub mod time;

pub use assertion::{AsyncTaskAssertion, ErrorKind, FailureReporter, PollSummary, Verdict};
pub use config::PollConfig;
pub use error::{Error, Result};
pub use time::{IntoTimeDelta, TimeConstraint};

/// Start an assertion that must hold within `timeout`
///
/// The check interval keeps its default of one second.
///
/// # Errors
///
/// Returns [`Error::InvalidTimeout`] if `timeout` is zero or negative.
pub fn within<'a>(timeout: impl IntoTimeDelta) -> Result<AsyncTaskAssertion<'a>> {
    AsyncTaskAssertion::new().with_timeout(timeout)
}

/// Start an assertion with the default 15 second timeout and 1 second check interval
pub fn eventually<'a>() -> AsyncTaskAssertion<'a> {
    AsyncTaskAssertion::new()
}

/// Start an assertion using a loaded [`PollConfig`]
pub fn from_config<'a>(config: &PollConfig) -> Result<AsyncTaskAssertion<'a>> {
    Ok(AsyncTaskAssertion::new().with_time_constraint(config.to_time_constraint()?))
}
