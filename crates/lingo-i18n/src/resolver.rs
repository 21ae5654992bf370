//! Message resolution against one locale's tree

use crate::color::ColorTranslator;
use crate::contract::{
    Contract, DerivedSlot, ReturnShape, Slot, SlotDescriptor, SlotId, POSSESSIVE_SLOT,
    PREFIX_SLOT, UNKNOWN_SLOT,
};
use crate::format::{count_placeholders, substitute, Arg, FormatPreset};
use lingo_common::Locale;
use lingo_config::ConfigTree;
use std::any::Any;
use std::borrow::Cow;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

/// The value a slot call produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A single message.
    Text(String),
    /// One message per list element.
    List(Vec<String>),
}

impl Reply {
    /// The message text; lists are joined with newlines.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::List(lines) => lines.join("\n"),
        }
    }

    /// The message lines; a single message becomes a one-element list.
    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::Text(text) => vec![text],
            Self::List(lines) => lines,
        }
    }

    /// Borrowed text, if this is a single message.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List(_) => None,
        }
    }

    /// Whether this is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    fn empty(shape: ReturnShape) -> Self {
        match shape {
            ReturnShape::Text => Self::Text(String::new()),
            ReturnShape::List => Self::List(Vec::new()),
        }
    }
}

/// A contract bound to one locale's tree.
///
/// Providers are immutable once built and are shared between callers through
/// `Arc`. Every call resolves against the tree the provider was built with.
#[derive(Debug)]
pub struct Provider {
    locale: Locale,
    tree: ConfigTree,
    contract: Arc<Contract>,
    colors: Arc<dyn ColorTranslator>,
}

impl Provider {
    /// Binds `contract` to `tree` for `locale`.
    pub fn new(
        locale: Locale,
        tree: ConfigTree,
        contract: Arc<Contract>,
        colors: Arc<dyn ColorTranslator>,
    ) -> Self {
        Self {
            locale,
            tree,
            contract,
            colors,
        }
    }

    /// Locale this provider serves.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The tree messages are read from.
    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    /// The contract this provider implements.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Color translator applied to every message.
    pub fn colors(&self) -> &dyn ColorTranslator {
        self.colors.as_ref()
    }

    /// Invokes `slot` with `args`. The slot is selected by name and
    /// `args.len()`; an undeclared slot yields `unknown()`.
    pub fn call(&self, slot: &str, args: &[Arg]) -> Reply {
        MessageResolver::resolve(self, slot, args).unwrap_or_else(|| Reply::Text(self.unknown()))
    }

    /// Invokes `slot` and returns its text. List slots are joined with newlines.
    pub fn text(&self, slot: &str, args: &[Arg]) -> String {
        self.call(slot, args).into_text()
    }

    /// Invokes `slot` and returns its lines. An undeclared slot yields an
    /// empty list.
    pub fn list(&self, slot: &str, args: &[Arg]) -> Vec<String> {
        MessageResolver::resolve(self, slot, args)
            .map(Reply::into_list)
            .unwrap_or_default()
    }

    /// The locale's prefix, color-translated. Empty when not configured.
    pub fn prefix(&self) -> String {
        self.text(PREFIX_SLOT, &[])
    }

    /// The locale's fallback message. Empty when not configured.
    pub fn unknown(&self) -> String {
        self.text(UNKNOWN_SLOT, &[])
    }

    /// Possessive form of `name`.
    pub fn possessive(&self, name: &str) -> String {
        self.text(POSSESSIVE_SLOT, &[Arg::from(name)])
    }

    /// Color-translates `raw` without a prefix, or returns `unknown()`.
    pub fn color<'a>(&self, raw: impl Into<Option<&'a str>>) -> String {
        self.format_raw(FormatPreset::Plain, raw.into())
    }

    /// Prefixes and color-translates `raw`, or returns `unknown()`.
    pub fn titled<'a>(&self, raw: impl Into<Option<&'a str>>) -> String {
        self.format_raw(FormatPreset::Titled, raw.into())
    }

    /// Prefixes `raw` and colors it with the error marker, or returns
    /// `unknown()`. Unlike the ERROR preset, the marker precedes the text.
    pub fn error<'a>(&self, raw: impl Into<Option<&'a str>>) -> String {
        let Some(raw) = raw.into() else {
            return self.unknown();
        };
        let marker = self.colors.error_marker();
        self.colors.translate(&format!("{}{}{}", self.prefix(), marker, raw))
    }

    fn format_raw(&self, preset: FormatPreset, raw: Option<&str>) -> String {
        let Some(raw) = raw else {
            return self.unknown();
        };
        let prefix = if preset.uses_prefix() {
            self.prefix()
        } else {
            String::new()
        };
        preset.apply(&prefix, raw, self.colors())
    }
}

/// Stateless resolution of slot calls.
pub struct MessageResolver;

impl MessageResolver {
    /// Resolves `name/args.len()` on `provider`. Returns `None`, after
    /// logging, when the contract does not declare the slot.
    pub fn resolve(provider: &Provider, name: &str, args: &[Arg]) -> Option<Reply> {
        let id = SlotId::new(name, args.len());
        let Some(slot) = provider.contract().capabilities().get(&id) else {
            warn!(
                "Contract '{}' has no slot {}, returning the unknown message",
                provider.contract().name(),
                id
            );
            return None;
        };

        Some(match slot {
            Slot::Derived(derived) => Self::resolve_derived(provider, &id, derived, args),
            Slot::Configured(descriptor) => {
                Self::resolve_configured(provider, &id, descriptor, args)
            }
        })
    }

    /// Path to read and the arguments left for the message body.
    ///
    /// With a variable path, the first `min(placeholders, args.len())`
    /// arguments fill the path and the rest go to the message.
    pub fn concrete_path<'a, 'd>(
        descriptor: &'d SlotDescriptor,
        args: &'a [Arg],
    ) -> (Cow<'d, str>, &'a [Arg]) {
        if !descriptor.has_variable_path() {
            return (Cow::Borrowed(descriptor.path()), args);
        }

        let consumed = count_placeholders(descriptor.path()).min(args.len());
        let (path_args, body_args) = args.split_at(consumed);
        (Cow::Owned(substitute(descriptor.path(), path_args)), body_args)
    }

    fn resolve_derived(
        provider: &Provider,
        id: &SlotId,
        derived: &DerivedSlot,
        args: &[Arg],
    ) -> Reply {
        let failure = match catch_unwind(AssertUnwindSafe(|| derived.invoke(provider, args))) {
            Ok(Ok(reply)) => return reply,
            Ok(Err(err)) => format!("{:#}", err),
            Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
        };
        warn!(
            "Derived slot {} failed for {} in contract '{}': {}",
            id,
            provider.locale(),
            provider.contract().name(),
            failure
        );
        Reply::empty(derived.shape())
    }

    fn resolve_configured(
        provider: &Provider,
        id: &SlotId,
        descriptor: &SlotDescriptor,
        args: &[Arg],
    ) -> Reply {
        let (path, body_args) = Self::concrete_path(descriptor, args);
        let preset = descriptor.format_preset();
        let prefix = if preset.uses_prefix() {
            provider.prefix()
        } else {
            String::new()
        };

        if descriptor.returns_list() {
            let lines = provider
                .tree()
                .get_string_list(&path)
                .iter()
                .map(|raw| preset.apply(&prefix, raw, provider.colors()))
                .collect();
            return Reply::List(lines);
        }

        match provider.tree().get_string(&path).filter(|raw| !raw.is_empty()) {
            Some(raw) => {
                let colored = preset.apply(&prefix, &raw, provider.colors());
                Reply::Text(substitute(&colored, body_args))
            }
            None if id.is_reserved() => Reply::Text(String::new()),
            None => {
                debug!(
                    "No message at '{}' for slot {} in {}, returning the unknown message",
                    path,
                    id,
                    provider.locale()
                );
                Reply::Text(provider.unknown())
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
