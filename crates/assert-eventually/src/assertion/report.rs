//! Run state, diagnostics and failure reporting

use std::error::Error;
use std::sync::Arc;

use crate::task::{AssertionFailure, TaskFailure, TaskResult};

/// Receives the verdict failure of an assertion
///
/// Called exactly once, and only when the assertion fails. Implementations
/// are expected to halt the current test; the default [`PanicReporter`]
/// does so by panicking, which is how the Rust test harness records a
/// failure.
pub trait FailureReporter: Send + Sync {
    fn report_failure(&self, message: &str);
}

/// Fails the current test by panicking with the diagnostic message
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicReporter;

impl FailureReporter for PanicReporter {
    fn report_failure(&self, message: &str) {
        panic!("{}", message);
    }
}

impl<T: FailureReporter + ?Sized> FailureReporter for Arc<T> {
    fn report_failure(&self, message: &str) {
        (**self).report_failure(message)
    }
}

/// What the polling loop has observed so far
///
/// Owned by a single evaluation and discarded with it.
#[derive(Debug, Default)]
pub(crate) struct RunState {
    pub(crate) task_execution_count: u32,
    pub(crate) succeeded: bool,
    pub(crate) last_assertion_failure: Option<AssertionFailure>,
    pub(crate) last_error: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl RunState {
    /// Fold the outcome of one execution into the state
    pub(crate) fn record(&mut self, result: TaskResult) {
        match result {
            Ok(()) => self.succeeded = true,
            Err(TaskFailure::Assertion(failure)) => self.last_assertion_failure = Some(failure),
            Err(TaskFailure::Error(err)) => self.last_error = Some(err),
        }
    }

    /// Build the full failure message: headline followed by diagnostics
    pub(crate) fn failure_message(&self, headline: &str) -> String {
        let count = self.task_execution_count;
        let mut parts = vec![
            headline.to_string(),
            format!("The task ran {} time{}", count, if count == 1 { "" } else { "s" }),
        ];

        parts.push(match &self.last_assertion_failure {
            Some(failure) => format!("The last AssertionError was {}", failure),
            None => "There were no AssertionErrors".to_string(),
        });

        parts.push(match &self.last_error {
            Some(err) => format!("The last Exception thrown was {}", err),
            None => "No other Exceptions were thrown".to_string(),
        });

        parts.join(". ")
    }
}
