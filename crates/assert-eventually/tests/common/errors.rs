//! Error types raised by test tasks

use thiserror::Error;

/// Stands in for a rejected argument
#[derive(Error, Debug)]
#[error("invalid argument: {0}")]
pub struct InvalidArgument(pub String);

/// Stands in for a missing value
#[derive(Error, Debug)]
#[error("missing value: {0}")]
pub struct MissingValue(pub String);

/// Wraps another error as its source
#[derive(Error, Debug)]
#[error("request failed")]
pub struct RequestFailed(#[source] pub InvalidArgument);
