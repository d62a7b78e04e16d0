//! The polling loop behind every assertion

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::report::{FailureReporter, PanicReporter, RunState};
use super::verdict::{ErrorKind, Verdict};
use crate::error::{Error, Result};
use crate::observer::{PollObserver, TracingObserver};
use crate::task::Task;
use crate::time::{
    saturating_add, Clock, IntoTimeDelta, Interrupted, Sleeper, SystemClock, ThreadSleeper,
    TimeConstraint,
};

/// How a passing assertion got there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    /// Number of times the task ran, including the satisfying attempt
    pub attempts: u32,
    /// Time between the first deadline computation and the satisfying attempt
    pub elapsed: Duration,
}

/// An assertion that a task will succeed, or raise a given error, within a timeout
///
/// Configure the assertion with the `with_*` methods, then trigger it exactly
/// once with a verdict method. Verdict methods take `self` by value, so an
/// assertion cannot be evaluated twice.
///
/// # Example
///
/// ```rust,no_run
/// use assert_eventually::{within, task::ensure};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::time::Duration;
///
/// # fn main() -> assert_eventually::Result<()> {
/// let flag = AtomicBool::new(false);
/// // ... something on another thread sets `flag` ...
///
/// within(Duration::from_secs(5))?
///     .with_task(|| ensure(flag.load(Ordering::SeqCst), "flag not set"))
///     .will_succeed()?;
/// # Ok(())
/// # }
/// ```
pub struct AsyncTaskAssertion<'a> {
    time_constraint: TimeConstraint,
    task: Option<Box<dyn Task + 'a>>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
    reporter: Arc<dyn FailureReporter>,
    observer: Arc<dyn PollObserver>,
}

impl Default for AsyncTaskAssertion<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AsyncTaskAssertion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncTaskAssertion")
            .field("time_constraint", &self.time_constraint)
            .field("has_task", &self.task.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a> AsyncTaskAssertion<'a> {
    /// Create an assertion with the default time constraint and collaborators
    pub fn new() -> Self {
        Self {
            time_constraint: TimeConstraint::default(),
            task: None,
            clock: Arc::new(SystemClock),
            sleeper: Arc::new(ThreadSleeper),
            reporter: Arc::new(PanicReporter),
            observer: Arc::new(TracingObserver::default()),
        }
    }

    /// Replace the time constraint with `timeout` and the default check interval
    pub fn with_timeout(mut self, timeout: impl IntoTimeDelta) -> Result<Self> {
        self.time_constraint = TimeConstraint::with_timeout(timeout)?;
        Ok(self)
    }

    /// Replace the whole time constraint
    pub fn with_time_constraint(mut self, time_constraint: TimeConstraint) -> Self {
        self.time_constraint = time_constraint;
        self
    }

    /// Set the task to poll; it is not run until a verdict method is called
    pub fn with_task(mut self, task: impl Task + 'a) -> Self {
        self.task = Some(Box::new(task));
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    pub fn with_reporter(mut self, reporter: impl FailureReporter + 'static) -> Self {
        self.reporter = Arc::new(reporter);
        self
    }

    pub fn with_observer(mut self, observer: impl PollObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    pub fn time_constraint(&self) -> &TimeConstraint {
        &self.time_constraint
    }

    /// Assert that the task completes without raising anything before the timeout
    pub fn will_succeed(self) -> Result<PollSummary> {
        self.evaluate(Verdict::ExpectSuccess)
    }

    /// Set the task and assert that it completes successfully
    pub fn run_task_expecting_success(self, task: impl Task + 'a) -> Result<PollSummary> {
        self.with_task(task).will_succeed()
    }

    /// Assert that the task raises an error of type `E` before the timeout
    ///
    /// Only the raised error itself is checked. To accept wrappers of `E`,
    /// pass [`ErrorKind::in_chain`] to [`will_throw_matching`](Self::will_throw_matching).
    pub fn will_throw<E>(self) -> Result<PollSummary>
    where
        E: StdError + 'static,
    {
        self.evaluate(Verdict::ExpectFailure(ErrorKind::of::<E>()))
    }

    /// Assert that the task raises an error accepted by `kind` before the timeout
    pub fn will_throw_matching(self, kind: ErrorKind) -> Result<PollSummary> {
        self.evaluate(Verdict::ExpectFailure(kind))
    }

    /// Run the polling loop under `verdict`
    ///
    /// # Errors
    ///
    /// - [`Error::MissingTask`] if no task was configured
    /// - [`Error::Interrupted`] if a wait between attempts was interrupted;
    ///   the reporter is not called
    /// - [`Error::VerdictFailed`] if the timeout elapsed and the reporter
    ///   returned instead of halting the test
    pub fn evaluate(mut self, verdict: Verdict) -> Result<PollSummary> {
        let mut task = self.task.take().ok_or(Error::MissingTask)?;
        let mut state = RunState::default();

        match self.poll(task.as_mut(), &verdict, &mut state) {
            Ok(Some(summary)) => Ok(summary),
            Ok(None) => {
                let timeout = self.time_constraint.timeout();
                self.observer.on_timeout(state.task_execution_count, timeout);

                let message = state.failure_message(&verdict.headline(timeout));
                self.reporter.report_failure(&message);
                Err(Error::verdict_failed(message))
            }
            Err(interrupted) => {
                self.observer.on_interrupted(state.task_execution_count);
                Err(interrupted.into())
            }
        }
    }

    /// Returns `Ok(None)` when the deadline passes without the verdict holding
    fn poll(
        &self,
        task: &mut (dyn Task + 'a),
        verdict: &Verdict,
        state: &mut RunState,
    ) -> std::result::Result<Option<PollSummary>, Interrupted> {
        let start = self.clock.now();
        let deadline = saturating_add(start, self.time_constraint.timeout());
        let check_interval = self.time_constraint.check_interval();

        while self.clock.now() < deadline {
            state.task_execution_count += 1;
            let attempt = state.task_execution_count;
            self.observer.on_attempt_start(attempt);

            let outcome = task.run();
            if let Err(failure) = &outcome {
                self.observer.on_task_failure(attempt, failure);
            }
            state.record(outcome);

            if verdict.is_satisfied(state) {
                let elapsed = self.clock.now().saturating_duration_since(start);
                self.observer.on_satisfied(attempt, elapsed);
                return Ok(Some(PollSummary {
                    attempts: attempt,
                    elapsed,
                }));
            }

            self.observer.on_retry_scheduled(attempt, check_interval);
            self.sleeper.sleep(check_interval)?;
        }

        Ok(None)
    }
}
