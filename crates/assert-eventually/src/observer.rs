//! Polling observation and logging
//!
//! This module provides the `PollObserver` trait for monitoring the attempts
//! made by an assertion, and a `TracingObserver` implementation that logs
//! using the `tracing` crate.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use crate::task::TaskFailure;

/// Observer trait for polling loop events
///
/// Implement this trait to receive callbacks while an assertion runs.
///
/// # Example
///
/// ```rust
/// use assert_eventually::observer::PollObserver;
/// use assert_eventually::task::TaskFailure;
/// use std::time::Duration;
///
/// struct PrintObserver;
///
/// impl PollObserver for PrintObserver {
///     fn on_attempt_start(&self, attempt: u32) {
///         println!("attempt {attempt}");
///     }
///
///     fn on_task_failure(&self, attempt: u32, failure: &TaskFailure) {
///         println!("attempt {attempt} raised {failure}");
///     }
///
///     fn on_retry_scheduled(&self, attempt: u32, delay: Duration) {
///         println!("attempt {attempt} not satisfied, waiting {delay:?}");
///     }
///
///     fn on_satisfied(&self, attempt: u32, elapsed: Duration) {
///         println!("satisfied on attempt {attempt} after {elapsed:?}");
///     }
///
///     fn on_timeout(&self, attempts: u32, timeout: Duration) {
///         println!("gave up after {attempts} attempts ({timeout:?})");
///     }
/// }
/// ```
pub trait PollObserver: Send + Sync {
    /// Called before each execution of the task
    ///
    /// * `attempt` - The attempt number (1-indexed)
    fn on_attempt_start(&self, attempt: u32);

    /// Called when an execution raised an assertion failure or an error
    ///
    /// Fires before the verdict is evaluated, so in expected-failure mode the
    /// attempt may still satisfy the assertion.
    fn on_task_failure(&self, attempt: u32, failure: &TaskFailure);

    /// Called when an attempt did not satisfy the verdict and the loop will wait
    ///
    /// * `delay` - The pause before the next deadline check
    fn on_retry_scheduled(&self, attempt: u32, delay: Duration);

    /// Called when the verdict is satisfied
    fn on_satisfied(&self, attempt: u32, elapsed: Duration);

    /// Called when the deadline passes without the verdict being satisfied
    fn on_timeout(&self, attempts: u32, timeout: Duration);

    /// Called when a wait between attempts was interrupted
    fn on_interrupted(&self, attempt: u32) {
        let _ = attempt;
    }
}

/// A no-op observer
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl PollObserver for NoOpObserver {
    fn on_attempt_start(&self, _attempt: u32) {}

    fn on_task_failure(&self, _attempt: u32, _failure: &TaskFailure) {}

    fn on_retry_scheduled(&self, _attempt: u32, _delay: Duration) {}

    fn on_satisfied(&self, _attempt: u32, _elapsed: Duration) {}

    fn on_timeout(&self, _attempts: u32, _timeout: Duration) {}
}

/// An observer that logs polling events using the `tracing` crate
///
/// # Log Levels
///
/// - `on_attempt_start`: TRACE
/// - `on_task_failure`: DEBUG
/// - `on_retry_scheduled`: TRACE
/// - `on_satisfied`: INFO (if > 1 attempt) or DEBUG (first attempt)
/// - `on_timeout`: WARN
/// - `on_interrupted`: WARN
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Name of the condition being awaited (for log context)
    operation: String,
}

impl TracingObserver {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("eventually")
    }
}

impl PollObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u32) {
        tracing::trace!(operation = %self.operation, attempt = attempt, "running task");
    }

    fn on_task_failure(&self, attempt: u32, failure: &TaskFailure) {
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            assertion = failure.is_assertion(),
            error = %failure,
            "task raised"
        );
    }

    fn on_retry_scheduled(&self, attempt: u32, delay: Duration) {
        tracing::trace!(
            operation = %self.operation,
            attempt = attempt,
            delay_ms = delay.as_millis() as u64,
            "condition not met, will poll again"
        );
    }

    fn on_satisfied(&self, attempt: u32, elapsed: Duration) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt = attempt,
                elapsed_ms = elapsed.as_millis() as u64,
                "condition met after polling"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                elapsed_ms = elapsed.as_millis() as u64,
                "condition met on first attempt"
            );
        }
    }

    fn on_timeout(&self, attempts: u32, timeout: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempts = attempts,
            timeout_ms = timeout.as_millis() as u64,
            "condition not met before timeout"
        );
    }

    fn on_interrupted(&self, attempt: u32) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            "polling interrupted"
        );
    }
}

/// An observer that counts polling events
///
/// Useful for testing.
#[derive(Debug, Default)]
pub struct StatsObserver {
    pub attempt_starts: AtomicU32,
    pub task_failures: AtomicU32,
    pub retries: AtomicU32,
    pub satisfied: AtomicU32,
    pub timeouts: AtomicU32,
    pub interruptions: AtomicU32,
}

impl StatsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt_starts(&self) -> u32 {
        self.attempt_starts.load(Ordering::SeqCst)
    }

    pub fn task_failures(&self) -> u32 {
        self.task_failures.load(Ordering::SeqCst)
    }

    pub fn retries(&self) -> u32 {
        self.retries.load(Ordering::SeqCst)
    }

    pub fn satisfied(&self) -> u32 {
        self.satisfied.load(Ordering::SeqCst)
    }

    pub fn timeouts(&self) -> u32 {
        self.timeouts.load(Ordering::SeqCst)
    }

    pub fn interruptions(&self) -> u32 {
        self.interruptions.load(Ordering::SeqCst)
    }
}

impl PollObserver for StatsObserver {
    fn on_attempt_start(&self, _attempt: u32) {
        self.attempt_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_task_failure(&self, _attempt: u32, _failure: &TaskFailure) {
        self.task_failures.fetch_add(1, Ordering::SeqCst);
    }

    fn on_retry_scheduled(&self, _attempt: u32, _delay: Duration) {
        self.retries.fetch_add(1, Ordering::SeqCst);
    }

    fn on_satisfied(&self, _attempt: u32, _elapsed: Duration) {
        self.satisfied.fetch_add(1, Ordering::SeqCst);
    }

    fn on_timeout(&self, _attempts: u32, _timeout: Duration) {
        self.timeouts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_interrupted(&self, _attempt: u32) {
        self.interruptions.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: PollObserver + ?Sized> PollObserver for std::sync::Arc<T> {
    fn on_attempt_start(&self, attempt: u32) {
        (**self).on_attempt_start(attempt)
    }

    fn on_task_failure(&self, attempt: u32, failure: &TaskFailure) {
        (**self).on_task_failure(attempt, failure)
    }

    fn on_retry_scheduled(&self, attempt: u32, delay: Duration) {
        (**self).on_retry_scheduled(attempt, delay)
    }

    fn on_satisfied(&self, attempt: u32, elapsed: Duration) {
        (**self).on_satisfied(attempt, elapsed)
    }

    fn on_timeout(&self, attempts: u32, timeout: Duration) {
        (**self).on_timeout(attempts, timeout)
    }

    fn on_interrupted(&self, attempt: u32) {
        (**self).on_interrupted(attempt)
    }
}

impl<T: PollObserver + ?Sized> PollObserver for Box<T> {
    fn on_attempt_start(&self, attempt: u32) {
        (**self).on_attempt_start(attempt)
    }

    fn on_task_failure(&self, attempt: u32, failure: &TaskFailure) {
        (**self).on_task_failure(attempt, failure)
    }

    fn on_retry_scheduled(&self, attempt: u32, delay: Duration) {
        (**self).on_retry_scheduled(attempt, delay)
    }

    fn on_satisfied(&self, attempt: u32, elapsed: Duration) {
        (**self).on_satisfied(attempt, elapsed)
    }

    fn on_timeout(&self, attempts: u32, timeout: Duration) {
        (**self).on_timeout(attempts, timeout)
    }

    fn on_interrupted(&self, attempt: u32) {
        (**self).on_interrupted(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_observer() {
        let observer = NoOpObserver;
        let failure = TaskFailure::assertion("not yet");

        observer.on_attempt_start(1);
        observer.on_task_failure(1, &failure);
        observer.on_retry_scheduled(1, Duration::from_secs(1));
        observer.on_satisfied(2, Duration::from_secs(1));
        observer.on_timeout(3, Duration::from_secs(3));
        observer.on_interrupted(3);
    }

    #[test]
    fn test_stats_observer() {
        let observer = StatsObserver::new();
        let failure = TaskFailure::assertion("not yet");

        observer.on_attempt_start(1);
        observer.on_task_failure(1, &failure);
        observer.on_retry_scheduled(1, Duration::from_secs(1));
        observer.on_attempt_start(2);
        observer.on_satisfied(2, Duration::from_secs(1));

        assert_eq!(observer.attempt_starts(), 2);
        assert_eq!(observer.task_failures(), 1);
        assert_eq!(observer.retries(), 1);
        assert_eq!(observer.satisfied(), 1);
        assert_eq!(observer.timeouts(), 0);
        assert_eq!(observer.interruptions(), 0);
    }

    #[test]
    fn test_stats_observer_through_arc() {
        let observer = std::sync::Arc::new(StatsObserver::new());
        let shared: Box<dyn PollObserver> = Box::new(observer.clone());

        shared.on_attempt_start(1);
        shared.on_retry_scheduled(1, Duration::from_millis(10));
        shared.on_timeout(1, Duration::from_millis(10));
        shared.on_interrupted(1);

        assert_eq!(observer.attempt_starts(), 1);
        assert_eq!(observer.task_failures(), 0);
        assert_eq!(observer.retries(), 1);
        assert_eq!(observer.timeouts(), 1);
        assert_eq!(observer.interruptions(), 1);
    }

    #[test]
    fn test_tracing_observer_creation() {
        let observer = TracingObserver::new("queue drained");
        assert_eq!(observer.operation(), "queue drained");

        let default_observer = TracingObserver::default();
        assert_eq!(default_observer.operation(), "eventually");
    }

    #[test]
    fn test_tracing_observer_does_not_panic_without_subscriber() {
        let observer = TracingObserver::default();
        let failure = TaskFailure::assertion("not yet");

        observer.on_attempt_start(1);
        observer.on_task_failure(1, &failure);
        observer.on_retry_scheduled(1, Duration::from_secs(1));
        observer.on_satisfied(1, Duration::ZERO);
        observer.on_satisfied(3, Duration::from_secs(2));
        observer.on_timeout(3, Duration::from_secs(3));
        observer.on_interrupted(3);
    }
}
