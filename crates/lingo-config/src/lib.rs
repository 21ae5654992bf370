//! # Lingo Config
//!
//! Structured language-file loading and library settings.
//!
//! This crate turns one locale's YAML file into a read-only [`ConfigTree`],
//! and loads and validates the [`LanguageSettings`] that tune the locale
//! cache.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod tree;
pub mod validator;

pub use loader::*;
pub use schema::*;
pub use tree::*;
pub use validator::*;
