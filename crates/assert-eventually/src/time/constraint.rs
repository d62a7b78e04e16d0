//! Timeout and check interval for a polling assertion

use std::time::Duration;

use chrono::TimeDelta;

use crate::error::{Error, Result};

/// Default overall timeout for an assertion
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default pause between unsuccessful attempts
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// A length of time that may be zero or negative before validation
///
/// `std::time::Duration` is unsigned, so callers that need to express a
/// negative span (for instance when computing one from two timestamps) pass a
/// `chrono::TimeDelta` instead. Both are accepted wherever a duration is
/// validated.
pub trait IntoTimeDelta {
    fn into_time_delta(self) -> TimeDelta;
}

impl IntoTimeDelta for TimeDelta {
    fn into_time_delta(self) -> TimeDelta {
        self
    }
}

impl IntoTimeDelta for Duration {
    fn into_time_delta(self) -> TimeDelta {
        // Saturate: anything beyond TimeDelta's range is still a valid positive span.
        TimeDelta::from_std(self).unwrap_or(TimeDelta::MAX)
    }
}

/// Render a duration as whole seconds, e.g. `"1 second"` or `"-1 seconds"`
///
/// Fractional seconds are truncated toward zero.
pub fn format(duration: impl IntoTimeDelta) -> String {
    let seconds = duration.into_time_delta().num_seconds();
    format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" })
}

/// An immutable timeout and check interval pair
///
/// Both values are strictly positive; construction rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeConstraint {
    timeout: Duration,
    check_interval: Duration,
}

impl Default for TimeConstraint {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }
}

impl TimeConstraint {
    /// Create a constraint from a timeout and a check interval
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeout`] or [`Error::InvalidCheckInterval`]
    /// when the respective value is zero or negative. The timeout is checked
    /// first.
    pub fn new(timeout: impl IntoTimeDelta, check_interval: impl IntoTimeDelta) -> Result<Self> {
        let timeout = timeout.into_time_delta();
        let check_interval = check_interval.into_time_delta();

        let timeout = positive(timeout).ok_or_else(|| Error::invalid_timeout(format(timeout)))?;
        let check_interval = positive(check_interval)
            .ok_or_else(|| Error::invalid_check_interval(format(check_interval)))?;

        Ok(Self {
            timeout,
            check_interval,
        })
    }

    /// Create a constraint with the given timeout and the default check interval
    pub fn with_timeout(timeout: impl IntoTimeDelta) -> Result<Self> {
        Self::new(timeout, DEFAULT_CHECK_INTERVAL)
    }

    /// Create a constraint from values that may be absent
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDuration`] when either value is `None`, before
    /// any range validation takes place.
    pub fn from_parts<T, C>(timeout: Option<T>, check_interval: Option<C>) -> Result<Self>
    where
        T: IntoTimeDelta,
        C: IntoTimeDelta,
    {
        let timeout = timeout.ok_or_else(|| Error::missing_duration("timeout"))?;
        let check_interval =
            check_interval.ok_or_else(|| Error::missing_duration("check interval"))?;
        Self::new(timeout, check_interval)
    }

    /// Overall time allowed for the polling loop
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Pause between unsuccessful attempts
    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }
}

fn positive(delta: TimeDelta) -> Option<Duration> {
    delta.to_std().ok().filter(|d| !d.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let constraint = TimeConstraint::default();
        assert_eq!(constraint.check_interval(), Duration::from_secs(1));
        assert_eq!(constraint.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_single_arg_constructor() {
        let timeout = Duration::from_secs(10);
        let constraint = TimeConstraint::with_timeout(timeout).unwrap();
        assert_eq!(constraint.check_interval(), DEFAULT_CHECK_INTERVAL);
        assert_eq!(constraint.timeout(), timeout);
    }

    #[test]
    fn test_double_arg_constructor() {
        let timeout = Duration::from_secs(10);
        let check_interval = Duration::from_secs(2);
        let constraint = TimeConstraint::new(timeout, check_interval).unwrap();
        assert_eq!(constraint.check_interval(), check_interval);
        assert_eq!(constraint.timeout(), timeout);
    }

    #[test]
    fn test_sub_second_values_are_kept_exactly() {
        let constraint =
            TimeConstraint::new(Duration::from_millis(1500), Duration::from_nanos(1)).unwrap();
        assert_eq!(constraint.timeout(), Duration::from_millis(1500));
        assert_eq!(constraint.check_interval(), Duration::from_nanos(1));
    }

    #[test]
    fn test_negative_timeout() {
        let err = TimeConstraint::new(TimeDelta::seconds(-1), Duration::from_secs(1)).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "Invalid timeout interval: -1 seconds");
    }

    #[test]
    fn test_zero_timeout() {
        let err = TimeConstraint::new(Duration::ZERO, Duration::from_secs(1)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid timeout interval: 0 seconds");
    }

    #[test]
    fn test_negative_check_interval() {
        let err =
            TimeConstraint::new(Duration::from_secs(10), TimeDelta::seconds(-1)).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "Invalid check interval: -1 seconds");
    }

    #[test]
    fn test_zero_check_interval() {
        let err = TimeConstraint::new(Duration::from_secs(10), Duration::ZERO).unwrap_err();
        assert_eq!(err.to_string(), "Invalid check interval: 0 seconds");
    }

    #[test]
    fn test_timeout_validated_before_check_interval() {
        let err = TimeConstraint::new(Duration::ZERO, Duration::ZERO).unwrap_err();
        assert!(matches!(err, Error::InvalidTimeout { .. }));
    }

    #[test]
    fn test_missing_timeout() {
        let err = TimeConstraint::from_parts(None::<Duration>, Some(Duration::from_secs(1)))
            .unwrap_err();
        assert!(err.is_missing());
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_missing_check_interval() {
        let err = TimeConstraint::from_parts(Some(Duration::from_secs(10)), None::<Duration>)
            .unwrap_err();
        assert!(matches!(err, Error::MissingDuration { ref field } if field == "check interval"));
    }

    #[test]
    fn test_from_parts_still_validates_range() {
        let err = TimeConstraint::from_parts(Some(Duration::ZERO), Some(Duration::from_secs(1)))
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_format_pluralization() {
        assert_eq!(format(Duration::from_secs(0)), "0 seconds");
        assert_eq!(format(Duration::from_secs(1)), "1 second");
        assert_eq!(format(Duration::from_secs(2)), "2 seconds");
        assert_eq!(format(TimeDelta::seconds(-1)), "-1 seconds");
    }

    #[test]
    fn test_format_truncates_fractions() {
        assert_eq!(format(Duration::from_millis(1999)), "1 second");
        assert_eq!(format(Duration::from_millis(999)), "0 seconds");
        assert_eq!(format(TimeDelta::milliseconds(-1500)), "-1 seconds");
    }

    #[test]
    fn test_format_is_pure() {
        let duration = Duration::from_secs(7);
        assert_eq!(format(duration), format(duration));
    }

    #[test]
    fn test_huge_std_duration_saturates() {
        let constraint = TimeConstraint::with_timeout(Duration::MAX).unwrap();
        assert!(constraint.timeout() > Duration::from_secs(60 * 60 * 24 * 365));
    }
}
