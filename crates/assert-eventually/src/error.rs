//! Error types for assert-eventually

use thiserror::Error;

/// Result type alias using assert-eventually's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the code that configures or triggers an assertion
///
/// Failures raised by the task under test never appear here directly; they
/// are recorded by the engine and folded into the diagnostic message handed
/// to the [`FailureReporter`](crate::FailureReporter).
#[derive(Error, Debug)]
pub enum Error {
    /// Timeout was zero or negative
    #[error("Invalid timeout interval: {formatted}")]
    InvalidTimeout { formatted: String },

    /// Check interval was zero or negative
    #[error("Invalid check interval: {formatted}")]
    InvalidCheckInterval { formatted: String },

    /// A required duration was not supplied
    #[error("Missing required duration: {field}")]
    MissingDuration { field: String },

    /// A verdict method was called before a task was configured
    #[error("No task was configured before evaluating the assertion")]
    MissingTask,

    /// The task did not behave as expected before the timeout elapsed
    ///
    /// Only returned when the configured reporter does not halt the test
    /// itself. The default reporter panics instead.
    #[error("{message}")]
    VerdictFailed { message: String },

    /// The wait between attempts was interrupted
    #[error("Main thread was interrupted while waiting for asynchronous task to complete")]
    Interrupted(#[from] crate::time::Interrupted),

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),
}

impl Error {
    /// Create an invalid timeout error from an already formatted duration
    pub fn invalid_timeout(formatted: impl Into<String>) -> Self {
        Self::InvalidTimeout {
            formatted: formatted.into(),
        }
    }

    /// Create an invalid check interval error from an already formatted duration
    pub fn invalid_check_interval(formatted: impl Into<String>) -> Self {
        Self::InvalidCheckInterval {
            formatted: formatted.into(),
        }
    }

    /// Create a missing duration error
    pub fn missing_duration(field: impl Into<String>) -> Self {
        Self::MissingDuration {
            field: field.into(),
        }
    }

    /// Create a verdict failure error
    pub fn verdict_failed(message: impl Into<String>) -> Self {
        Self::VerdictFailed {
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error rejects a supplied argument value
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidTimeout { .. } | Error::InvalidCheckInterval { .. }
        )
    }

    /// Whether this error reports a required value that was never supplied
    pub fn is_missing(&self) -> bool {
        matches!(self, Error::MissingDuration { .. } | Error::MissingTask)
    }

    /// Whether the evaluation was aborted by an interrupted wait
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Error::Interrupted(_))
    }
}
