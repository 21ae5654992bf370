//! # Lingo Common
//!
//! Shared types, utilities, and common functionality for the lingo workspace.
//!
//! This crate provides the locale type every other crate keys on, the
//! workspace-wide error type, and the logging bootstrap used by hosting
//! applications.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::LingoError;
pub use types::*;
