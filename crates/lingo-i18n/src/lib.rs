//! # Lingo I18n
//!
//! Locale-keyed message providers for applications that ship editable
//! language files.
//!
//! A [`Contract`] declares the messages an application uses and where their
//! language files live. The [`LanguageManager`] registers contracts and hands
//! out a shared [`Provider`] per locale, built lazily from the locale's YAML
//! file and dropped again after a configurable idle window.
//!
//! ```no_run
//! use lingo_i18n::{args, Contract, LanguageManager, SlotDescriptor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let contract = Contract::builder("greetings")
//!     .folder("greetings")
//!     .message("player", 1, SlotDescriptor::text("greetings.player"))
//!     .build()?;
//!
//! let manager = LanguageManager::default();
//! manager.register("data/languages", contract)?;
//!
//! let provider = manager.provider_for("greetings", "en_US")?;
//! println!("{}", provider.text("player", &args!["Chris"]));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod color;
pub mod contract;
pub mod error;
pub mod format;
pub mod manager;
pub mod provisioning;
pub mod resolver;

pub use cache::{CacheMetrics, LocaleCache, LocaleCacheBuilder};
pub use color::{AlternateColorCodes, ColorTranslator};
pub use contract::{
    CapabilitySet, ConfigSource, Contract, ContractBuilder, DerivedSlot, ReturnShape, Slot,
    SlotDescriptor, SlotId,
};
pub use error::{ContractShapeError, I18nError, I18nResult};
pub use format::{Arg, FormatPreset};
pub use manager::LanguageManager;
pub use provisioning::{DirectoryHost, EmbeddedHost, HostApp};
pub use resolver::{MessageResolver, Provider, Reply};

pub use lingo_common::Locale;
pub use lingo_config::LanguageSettings;
