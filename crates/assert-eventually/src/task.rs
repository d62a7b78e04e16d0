//! The unit of work polled by an assertion
//!
//! A task either completes, fails an assertion ("not yet"), or fails with any
//! other error. The engine retries the first kind of failure silently and
//! records the second for diagnostics or for matching in
//! [`will_throw`](crate::AsyncTaskAssertion::will_throw).

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Outcome of a single task execution
pub type TaskResult = std::result::Result<(), TaskFailure>;

/// A condition that has not become true yet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssertionFailure {
    message: Option<String>,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// An assertion failure without a message
    pub fn unspecified() -> Self {
        Self::default()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        if let Some(message) = payload.downcast_ref::<&str>() {
            Self::new(*message)
        } else if let Some(message) = payload.downcast_ref::<String>() {
            Self::new(message.clone())
        } else {
            Self::unspecified()
        }
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "assertion failed: {}", message),
            None => write!(f, "assertion failed"),
        }
    }
}

/// Why a task execution did not complete
#[derive(Debug)]
pub enum TaskFailure {
    /// The checked condition is not true yet
    Assertion(AssertionFailure),

    /// Any other failure raised by the task
    Error(Box<dyn Error + Send + Sync + 'static>),
}

impl TaskFailure {
    /// Create an assertion failure with a message
    pub fn assertion(message: impl Into<String>) -> Self {
        TaskFailure::Assertion(AssertionFailure::new(message))
    }

    /// Wrap an already boxed error
    pub fn from_boxed(error: Box<dyn Error + Send + Sync + 'static>) -> Self {
        TaskFailure::Error(error)
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, TaskFailure::Assertion(_))
    }

    /// The general error, if this is not an assertion failure
    pub fn as_error(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match self {
            TaskFailure::Error(err) => Some(&**err),
            TaskFailure::Assertion(_) => None,
        }
    }
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskFailure::Assertion(failure) => write!(f, "{}", failure),
            TaskFailure::Error(err) => write!(f, "{}", err),
        }
    }
}

/// Lets tasks use `?` on any standard error
impl<E> From<E> for TaskFailure
where
    E: Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        TaskFailure::Error(Box::new(error))
    }
}

/// A unit of work that checks a condition or performs an action
///
/// Closures of the shape `FnMut() -> TaskResult` implement this trait, so most
/// callers never name it:
///
/// ```rust
/// use assert_eventually::task::{ensure, Task};
///
/// let mut ready = false;
/// let mut task = move || {
///     let was_ready = ready;
///     ready = true;
///     ensure(was_ready, "not ready yet")
/// };
/// assert!(task.run().is_err());
/// assert!(task.run().is_ok());
/// ```
pub trait Task {
    fn run(&mut self) -> TaskResult;
}

impl<F> Task for F
where
    F: FnMut() -> TaskResult,
{
    fn run(&mut self) -> TaskResult {
        self()
    }
}

/// Fail with an assertion failure unless `condition` holds
pub fn ensure(condition: bool, message: impl Into<String>) -> TaskResult {
    if condition {
        Ok(())
    } else {
        Err(TaskFailure::assertion(message))
    }
}

/// Adapt a closure that signals failure by panicking, as `assert!` does
///
/// Each panic is caught and treated as an assertion failure carrying the panic
/// message. The default panic hook still prints each caught panic.
pub fn from_assertions<F>(body: F) -> PanickingTask<F>
where
    F: FnMut(),
{
    PanickingTask { body }
}

/// Task returned by [`from_assertions`]
pub struct PanickingTask<F> {
    body: F,
}

impl<F> Task for PanickingTask<F>
where
    F: FnMut(),
{
    fn run(&mut self) -> TaskResult {
        let body = &mut self.body;
        panic::catch_unwind(AssertUnwindSafe(body))
            .map_err(|payload| TaskFailure::Assertion(AssertionFailure::from_panic(payload)))
    }
}
