//! Deterministic collaborators for exercising assertions in tests
//!
//! [`VirtualTime`] stands in for both the clock and the sleeper so that a
//! polling loop with a fifteen second timeout finishes instantly, and
//! [`CollectingReporter`] records failure messages instead of panicking.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::assertion::FailureReporter;
use crate::time::{saturating_add, Clock, Interrupted, Sleeper};

/// How many of the most recent sleep durations a [`VirtualTime`] keeps
pub const RECENT_SLEEPS: usize = 64;

#[derive(Debug)]
struct VirtualState {
    origin: Instant,
    offset: Duration,
    sleep_count: usize,
    recent_sleeps: VecDeque<Duration>,
}

/// A clock that only moves when something sleeps on it or advances it
///
/// Clones share the same timeline.
#[derive(Debug, Clone)]
pub struct VirtualTime {
    state: Arc<Mutex<VirtualState>>,
}

impl Default for VirtualTime {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualTime {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(VirtualState {
                origin: Instant::now(),
                offset: Duration::ZERO,
                sleep_count: 0,
                recent_sleeps: VecDeque::with_capacity(RECENT_SLEEPS),
            })),
        }
    }

    /// Time passed since this timeline was created
    pub fn elapsed(&self) -> Duration {
        self.lock().offset
    }

    /// Move the timeline forward without counting a sleep
    pub fn advance(&self, duration: Duration) {
        let mut state = self.lock();
        state.offset = state.offset.saturating_add(duration);
    }

    /// Number of sleeps taken so far
    pub fn sleep_count(&self) -> usize {
        self.lock().sleep_count
    }

    /// The last [`RECENT_SLEEPS`] sleep durations, oldest first
    pub fn sleeps(&self) -> Vec<Duration> {
        self.lock().recent_sleeps.iter().copied().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VirtualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for VirtualTime {
    fn now(&self) -> Instant {
        let state = self.lock();
        saturating_add(state.origin, state.offset)
    }
}

impl Sleeper for VirtualTime {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let mut state = self.lock();
        state.offset = state.offset.saturating_add(duration);
        state.sleep_count += 1;
        if state.recent_sleeps.len() == RECENT_SLEEPS {
            state.recent_sleeps.pop_front();
        }
        state.recent_sleeps.push_back(duration);
        Ok(())
    }
}

/// A reporter that keeps every message instead of failing the test
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FailureReporter for CollectingReporter {
    fn report_failure(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_time_moves_only_on_sleep_or_advance() {
        let time = VirtualTime::new();
        let before = time.now();
        assert_eq!(time.now(), before);

        time.sleep(Duration::from_secs(1)).unwrap();
        time.advance(Duration::from_millis(500));

        assert_eq!(time.elapsed(), Duration::from_millis(1500));
        assert_eq!(time.now() - before, Duration::from_millis(1500));
        assert_eq!(time.sleep_count(), 1);
        assert_eq!(time.sleeps(), vec![Duration::from_secs(1)]);
    }

    #[test]
    fn test_only_recent_sleeps_are_kept() {
        let time = VirtualTime::new();
        for nanos in 0..(RECENT_SLEEPS as u64 + 10) {
            time.sleep(Duration::from_nanos(nanos)).unwrap();
        }

        assert_eq!(time.sleep_count(), RECENT_SLEEPS + 10);
        let recent = time.sleeps();
        assert_eq!(recent.len(), RECENT_SLEEPS);
        assert_eq!(recent[0], Duration::from_nanos(10));
        assert_eq!(
            recent[RECENT_SLEEPS - 1],
            Duration::from_nanos(RECENT_SLEEPS as u64 + 9)
        );
    }

    #[test]
    fn test_clones_share_timeline() {
        let time = VirtualTime::new();
        let other = time.clone();
        other.sleep(Duration::from_secs(2)).unwrap();
        assert_eq!(time.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn test_collecting_reporter() {
        let reporter = CollectingReporter::new();
        let shared = reporter.clone();
        shared.report_failure("first");
        shared.report_failure("second");
        assert_eq!(reporter.messages(), vec!["first", "second"]);
    }
}
