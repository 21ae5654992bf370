//! Error types for contract registration and provider lookup

use crate::contract::SlotId;
use lingo_common::LingoError;
use std::path::PathBuf;
use thiserror::Error;

/// A contract declaration that cannot be registered.
///
/// These are programming errors in the caller's setup code and are meant to
/// fail loudly at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractShapeError {
    /// The contract has no name to register it under
    #[error("Contract name cannot be empty")]
    EmptyName,

    /// No folder was declared for the contract's language files
    #[error("Contract '{contract}' does not declare a folder name")]
    MissingFolder {
        /// Contract name
        contract: String,
    },

    /// The folder is not a single relative directory name
    #[error("Contract '{contract}' has an invalid folder name: {folder:?}")]
    InvalidFolder {
        /// Contract name
        contract: String,
        /// The rejected folder
        folder: String,
    },

    /// A bundled language code cannot name a file
    #[error("Contract '{contract}' declares an invalid language code: {code:?}")]
    InvalidLanguageCode {
        /// Contract name
        contract: String,
        /// The rejected code
        code: String,
    },

    /// A configured slot has no configuration path
    #[error("Slot {slot} of contract '{contract}' has an empty path")]
    EmptyPath {
        /// Contract name
        contract: String,
        /// Offending slot
        slot: SlotId,
    },

    /// Two slots share a name and arity
    #[error("Slot {slot} is declared more than once in contract '{contract}'")]
    DuplicateSlot {
        /// Contract name
        contract: String,
        /// Slot declared twice
        slot: SlotId,
    },

    /// `prefix()` or `unknown()` declared with the wrong shape
    #[error("Reserved slot {slot} of contract '{contract}' {reason}")]
    ReservedSlot {
        /// Contract name
        contract: String,
        /// Offending slot
        slot: SlotId,
        /// Which rule the declaration breaks
        reason: &'static str,
    },

    /// A variable path needs more arguments than the slot accepts
    #[error(
        "Slot {slot} of contract '{contract}' has {placeholders} path placeholders \
         but only {arity} arguments"
    )]
    UnresolvablePath {
        /// Contract name
        contract: String,
        /// Offending slot
        slot: SlotId,
        /// `%s` markers in the path
        placeholders: usize,
        /// Arguments the slot accepts
        arity: usize,
    },
}

/// Errors that can occur while registering contracts or looking them up
#[derive(Error, Debug)]
pub enum I18nError {
    /// The contract declaration is malformed
    #[error(transparent)]
    ContractShape(#[from] ContractShapeError),

    /// The contract's language directory could not be created
    #[error("Unable to create language file storage in {}: {source}", .path.display())]
    Storage {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A declared language has no bundled default file
    #[error("Bundled language resource not found: {resource}")]
    MissingBundledResource {
        /// Resource path looked up on the host
        resource: String,
    },

    /// A bundled default file could not be written
    #[error("Failed to write bundled language file {}: {source}", .path.display())]
    Provisioning {
        /// File that could not be written
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// No contract is registered under the requested name
    #[error("No contract registered under '{contract}'")]
    UnregisteredContract {
        /// Name that was looked up
        contract: String,
    },
}

/// Result type for i18n operations
pub type I18nResult<T> = Result<T, I18nError>;

impl From<I18nError> for LingoError {
    fn from(err: I18nError) -> Self {
        LingoError::localization_with_source(err.to_string(), err)
    }
}
