//! Common test infrastructure for assert-eventually tests
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `errors`: Error types used as expected and unexpected failures
//! - `tasks`: Tasks whose behavior changes at a point on a virtual timeline

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod errors;
pub mod tasks;

pub use errors::*;
pub use tasks::*;
