//! Time constraints and the clock/sleep collaborators

mod clock;
mod constraint;

pub use clock::{
    saturating_add, Clock, InterruptHandle, Interrupted, InterruptibleSleeper, Sleeper,
    SystemClock, ThreadSleeper,
};
pub use constraint::{
    format, IntoTimeDelta, TimeConstraint, DEFAULT_CHECK_INTERVAL, DEFAULT_TIMEOUT,
};
