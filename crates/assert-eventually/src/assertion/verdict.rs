//! Verdict modes and error-kind matching
//!
//! A verdict decides, after every attempt, whether the assertion has been
//! satisfied. It is evaluated against the run state once per iteration of the
//! polling loop.

use std::any::type_name;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::iter;
use std::time::Duration;

use super::report::RunState;
use crate::time::format;

/// Identifies the kind of error a task is expected to raise
///
/// # Example
///
/// ```rust
/// use assert_eventually::ErrorKind;
/// use std::io;
///
/// let kind = ErrorKind::of::<io::Error>();
/// let err = io::Error::new(io::ErrorKind::Other, "boom");
/// assert!(kind.matches(&err));
///
/// let refused = ErrorKind::matching("connection refused", |err| {
///     err.downcast_ref::<io::Error>()
///         .is_some_and(|e| e.kind() == io::ErrorKind::ConnectionRefused)
/// });
/// assert!(!refused.matches(&err));
/// ```
pub struct ErrorKind {
    name: Cow<'static, str>,
    predicate: Box<dyn Fn(&(dyn Error + 'static)) -> bool + Send + Sync>,
}

impl ErrorKind {
    /// Match errors of type `E`
    ///
    /// Only the raised error itself is checked; a wrapper whose source is an
    /// `E` does not match. Use [`in_chain`](Self::in_chain) for that.
    pub fn of<E: Error + 'static>() -> Self {
        Self {
            name: Cow::Borrowed(type_name::<E>()),
            predicate: Box::new(|err: &(dyn Error + 'static)| err.is::<E>()),
        }
    }

    /// Match errors that are an `E` or have an `E` anywhere in their `source()` chain
    pub fn in_chain<E: Error + 'static>() -> Self {
        Self {
            name: Cow::Borrowed(type_name::<E>()),
            predicate: Box::new(|err: &(dyn Error + 'static)| {
                source_chain(err).any(|e| e.is::<E>())
            }),
        }
    }

    /// Match errors accepted by a named predicate
    pub fn matching<F>(name: impl Into<Cow<'static, str>>, predicate: F) -> Self
    where
        F: Fn(&(dyn Error + 'static)) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Name used in failure messages
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, error: &(dyn Error + 'static)) -> bool {
        (self.predicate)(error)
    }
}

impl fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorKind").field("name", &self.name).finish()
    }
}

fn source_chain<'a>(
    error: &'a (dyn Error + 'static),
) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
    iter::successors(Some(error), |&e| e.source())
}

/// What an assertion expects from its task
#[derive(Debug)]
pub enum Verdict {
    /// The task eventually completes without raising anything
    ExpectSuccess,

    /// The task eventually raises an error of the given kind
    ExpectFailure(ErrorKind),
}

impl Verdict {
    pub(crate) fn is_satisfied(&self, state: &RunState) -> bool {
        match self {
            Verdict::ExpectSuccess => state.succeeded,
            Verdict::ExpectFailure(kind) => state
                .last_error
                .as_deref()
                .is_some_and(|err| kind.matches(err)),
        }
    }

    /// First sentence of the failure message
    pub(crate) fn headline(&self, timeout: Duration) -> String {
        match self {
            Verdict::ExpectSuccess => format!(
                "Operation did not complete successfully within the timeout interval of {}",
                format(timeout)
            ),
            Verdict::ExpectFailure(kind) => format!(
                "Operation did not throw {} within the timeout interval of {}",
                kind.name(),
                format(timeout)
            ),
        }
    }
}
