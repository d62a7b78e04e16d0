//! Polling assertions
//!
//! An [`AsyncTaskAssertion`] runs a task repeatedly until a [`Verdict`] holds
//! or its [`TimeConstraint`](crate::TimeConstraint) expires:
//!
//! - `will_succeed` passes once an execution completes without raising
//! - `will_throw::<E>` passes once an execution raises an `E`
//!
//! Assertion failures raised by the task mean "not yet" and are retried.
//! Other errors are retried in success mode and matched in failure mode. On
//! timeout the [`FailureReporter`] receives a message describing how often
//! the task ran and what it last raised.

mod engine;
mod report;
mod verdict;

pub use engine::{AsyncTaskAssertion, PollSummary};
pub use report::{FailureReporter, PanicReporter};
pub use verdict::{ErrorKind, Verdict};
