//! Declarative message contracts
//!
//! A [`Contract`] names a folder of language files and the set of message
//! slots callers may invoke on a provider. Each slot is either *configured*
//! (looked up in the locale's tree by a [`SlotDescriptor`]) or *derived*
//! (computed by a function from other slots).
//!
//! Every contract carries three implicit slots, added at build time when the
//! caller does not declare them:
//!
//! | slot         | arity | behaviour                                         |
//! |--------------|-------|---------------------------------------------------|
//! | `prefix`     | 0     | `PLAIN` lookup of `prefix`                        |
//! | `unknown`    | 0     | `ERROR` lookup of `unknown`                       |
//! | `possessive` | 1     | appends `'` or `'s`, honouring `apostrophe_possession` |

use crate::error::ContractShapeError;
use crate::format::{count_placeholders, Arg, FormatPreset};
use crate::resolver::{Provider, Reply};
use anyhow::Context;
use lingo_config::SettingsValidator;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Slot read by every `TITLED` and `ERROR` message.
pub const PREFIX_SLOT: &str = "prefix";
/// Slot returned whenever a message cannot be resolved.
pub const UNKNOWN_SLOT: &str = "unknown";
/// Built-in derived slot forming possessive names.
pub const POSSESSIVE_SLOT: &str = "possessive";
/// Tree key that turns possessive suffixes off for a locale.
pub const APOSTROPHE_POSSESSION_KEY: &str = "apostrophe_possession";

/// Where a contract's language files live and which languages ship bundled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    folder_name: String,
    language_codes: Vec<String>,
}

impl ConfigSource {
    /// Creates a source. Duplicate language codes are dropped, keeping the
    /// first occurrence.
    pub fn new<I, S>(folder_name: impl Into<String>, language_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut codes: Vec<String> = Vec::new();
        for code in language_codes {
            let code = code.into();
            if !codes.contains(&code) {
                codes.push(code);
            }
        }

        Self {
            folder_name: folder_name.into(),
            language_codes: codes,
        }
    }

    /// Folder under the languages directory holding this contract's files.
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    /// Language codes with a bundled default file.
    pub fn language_codes(&self) -> &[String] {
        &self.language_codes
    }

    /// Whether `code` ships a bundled default.
    pub fn bundles(&self, code: &str) -> bool {
        self.language_codes.iter().any(|c| c == code)
    }
}

/// Identity of a slot: its name plus the number of arguments it takes.
///
/// `item/0` and `item/1` are distinct slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId {
    name: String,
    arity: usize,
}

impl SlotId {
    /// Creates an identity.
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }

    /// The slot name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of arguments.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Whether this is `prefix/0` or `unknown/0`.
    pub fn is_reserved(&self) -> bool {
        self.arity == 0 && (self.name == PREFIX_SLOT || self.name == UNKNOWN_SLOT)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// Whether a slot yields one string or a list of strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReturnShape {
    /// A single message.
    #[default]
    Text,
    /// One message per element of a YAML sequence.
    List,
}

/// How a configured slot maps onto the locale's tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDescriptor {
    path: String,
    preset: FormatPreset,
    variable_path: bool,
    shape: ReturnShape,
}

impl SlotDescriptor {
    /// A `TITLED` text slot read from `path`.
    pub fn text(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            preset: FormatPreset::default(),
            variable_path: false,
            shape: ReturnShape::Text,
        }
    }

    /// A `TITLED` list slot read from the sequence at `path`.
    pub fn list(path: impl Into<String>) -> Self {
        Self {
            shape: ReturnShape::List,
            ..Self::text(path)
        }
    }

    /// Uses `preset` instead of `TITLED`.
    pub fn preset(mut self, preset: FormatPreset) -> Self {
        self.preset = preset;
        self
    }

    /// Treats `%s` in the path as placeholders filled from the leading
    /// arguments.
    pub fn variable_path(mut self) -> Self {
        self.variable_path = true;
        self
    }

    /// Path template.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Format preset.
    pub fn format_preset(&self) -> FormatPreset {
        self.preset
    }

    /// Whether path placeholders consume arguments.
    pub fn has_variable_path(&self) -> bool {
        self.variable_path
    }

    /// Result shape.
    pub fn shape(&self) -> ReturnShape {
        self.shape
    }

    /// Whether the slot yields a list.
    pub fn returns_list(&self) -> bool {
        self.shape == ReturnShape::List
    }
}

/// Signature of a derived slot's implementation.
pub type DerivedFn = dyn Fn(&Provider, &[Arg]) -> anyhow::Result<Reply> + Send + Sync;

/// A slot computed from the provider rather than read from the tree.
///
/// A failing implementation is logged and resolves to an empty value.
#[derive(Clone)]
pub struct DerivedSlot {
    shape: ReturnShape,
    func: Arc<DerivedFn>,
}

impl DerivedSlot {
    /// Wraps `func` as a slot of the given shape.
    pub fn new<F>(shape: ReturnShape, func: F) -> Self
    where
        F: Fn(&Provider, &[Arg]) -> anyhow::Result<Reply> + Send + Sync + 'static,
    {
        Self {
            shape,
            func: Arc::new(func),
        }
    }

    /// Result shape.
    pub fn shape(&self) -> ReturnShape {
        self.shape
    }

    pub(crate) fn invoke(&self, provider: &Provider, args: &[Arg]) -> anyhow::Result<Reply> {
        (self.func)(provider, args)
    }
}

impl fmt::Debug for DerivedSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedSlot")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// One entry of a capability set.
#[derive(Debug, Clone)]
pub enum Slot {
    /// Read from the locale's tree.
    Configured(SlotDescriptor),
    /// Computed by a function.
    Derived(DerivedSlot),
}

impl Slot {
    /// Result shape.
    pub fn shape(&self) -> ReturnShape {
        match self {
            Self::Configured(descriptor) => descriptor.shape(),
            Self::Derived(derived) => derived.shape(),
        }
    }
}

/// Slots of a contract, kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct CapabilitySet {
    order: Vec<SlotId>,
    slots: HashMap<SlotId, Slot>,
}

impl CapabilitySet {
    /// Slot registered under `id`.
    pub fn get(&self, id: &SlotId) -> Option<&Slot> {
        self.slots.get(id)
    }

    /// Slot registered under `name` with `arity` arguments.
    pub fn find(&self, name: &str, arity: usize) -> Option<&Slot> {
        self.get(&SlotId::new(name, arity))
    }

    /// Whether `name/arity` is declared.
    pub fn contains(&self, name: &str, arity: usize) -> bool {
        self.find(name, arity).is_some()
    }

    /// Slots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&SlotId, &Slot)> {
        self.order
            .iter()
            .filter_map(|id| self.slots.get(id).map(|slot| (id, slot)))
    }

    /// Number of slots, implicit ones included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no slots are declared.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn insert(&mut self, id: SlotId, slot: Slot) -> bool {
        if self.slots.contains_key(&id) {
            return false;
        }
        self.order.push(id.clone());
        self.slots.insert(id, slot);
        true
    }
}

/// A named, validated set of message slots bound to a folder of language files.
#[derive(Debug, Clone)]
pub struct Contract {
    name: String,
    source: ConfigSource,
    capabilities: CapabilitySet,
}

impl Contract {
    /// Starts declaring a contract registered under `name`.
    pub fn builder(name: impl Into<String>) -> ContractBuilder {
        ContractBuilder::new(name)
    }

    /// Registration name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Folder and bundled languages.
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// All slots, implicit ones included.
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }
}

/// Builder for [`Contract`]. Shape checks run in [`ContractBuilder::build`].
#[derive(Debug)]
pub struct ContractBuilder {
    name: String,
    folder: Option<String>,
    languages: Vec<String>,
    slots: Vec<(SlotId, Slot)>,
}

impl ContractBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folder: None,
            languages: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Folder holding this contract's language files.
    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Adds language codes with bundled defaults.
    pub fn languages<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Declares a configured slot taking `arity` arguments.
    pub fn message(
        mut self,
        name: impl Into<String>,
        arity: usize,
        descriptor: SlotDescriptor,
    ) -> Self {
        self.slots
            .push((SlotId::new(name, arity), Slot::Configured(descriptor)));
        self
    }

    /// Declares a derived slot taking `arity` arguments.
    pub fn derived<F>(
        mut self,
        name: impl Into<String>,
        arity: usize,
        shape: ReturnShape,
        func: F,
    ) -> Self
    where
        F: Fn(&Provider, &[Arg]) -> anyhow::Result<Reply> + Send + Sync + 'static,
    {
        self.slots
            .push((SlotId::new(name, arity), Slot::Derived(DerivedSlot::new(shape, func))));
        self
    }

    /// Validates the declaration and adds the implicit slots.
    pub fn build(self) -> Result<Contract, ContractShapeError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ContractShapeError::EmptyName);
        }

        let folder = self.folder.ok_or_else(|| ContractShapeError::MissingFolder {
            contract: name.clone(),
        })?;
        if !is_plain_name(&folder) {
            return Err(ContractShapeError::InvalidFolder {
                contract: name,
                folder,
            });
        }

        if let Some(code) = self.languages.iter().find(|code| !is_plain_name(code)) {
            return Err(ContractShapeError::InvalidLanguageCode {
                contract: name.clone(),
                code: code.clone(),
            });
        }

        let mut capabilities = CapabilitySet::default();
        for (id, slot) in self.slots {
            check_slot(&name, &id, &slot)?;
            if !capabilities.insert(id.clone(), slot) {
                return Err(ContractShapeError::DuplicateSlot {
                    contract: name,
                    slot: id,
                });
            }
        }

        capabilities.insert(
            SlotId::new(PREFIX_SLOT, 0),
            Slot::Configured(SlotDescriptor::text(PREFIX_SLOT).preset(FormatPreset::Plain)),
        );
        capabilities.insert(
            SlotId::new(UNKNOWN_SLOT, 0),
            Slot::Configured(SlotDescriptor::text(UNKNOWN_SLOT).preset(FormatPreset::Error)),
        );
        capabilities.insert(
            SlotId::new(POSSESSIVE_SLOT, 1),
            Slot::Derived(DerivedSlot::new(ReturnShape::Text, possessive)),
        );

        Ok(Contract {
            name,
            source: ConfigSource::new(folder, self.languages),
            capabilities,
        })
    }
}

fn is_plain_name(name: &str) -> bool {
    SettingsValidator::check_dir_name("name", name).is_none()
}

fn check_slot(contract: &str, id: &SlotId, slot: &Slot) -> Result<(), ContractShapeError> {
    let reserved = |reason| ContractShapeError::ReservedSlot {
        contract: contract.to_string(),
        slot: id.clone(),
        reason,
    };

    if id.name() == PREFIX_SLOT || id.name() == UNKNOWN_SLOT {
        let descriptor = match slot {
            Slot::Derived(_) => return Err(reserved("cannot be derived")),
            Slot::Configured(descriptor) => descriptor,
        };
        if id.arity() != 0 {
            return Err(reserved("cannot take arguments"));
        }
        if descriptor.returns_list() {
            return Err(reserved("must return a single message"));
        }
        if descriptor.has_variable_path() {
            return Err(reserved("cannot use a variable path"));
        }
        if id.name() == PREFIX_SLOT && descriptor.format_preset() != FormatPreset::Plain {
            return Err(reserved("must use the PLAIN preset"));
        }
    }

    let Slot::Configured(descriptor) = slot else {
        return Ok(());
    };

    if descriptor.path().trim().is_empty() {
        return Err(ContractShapeError::EmptyPath {
            contract: contract.to_string(),
            slot: id.clone(),
        });
    }

    if descriptor.has_variable_path() {
        let placeholders = count_placeholders(descriptor.path());
        if placeholders > id.arity() {
            return Err(ContractShapeError::UnresolvablePath {
                contract: contract.to_string(),
                slot: id.clone(),
                placeholders,
                arity: id.arity(),
            });
        }
    }

    Ok(())
}

/// `Steve` becomes `Steve's`, `Chris` becomes `Chris'`. Locales that set
/// `apostrophe_possession: false` get the name back unchanged.
fn possessive(provider: &Provider, args: &[Arg]) -> anyhow::Result<Reply> {
    let name = args.first().context("possessive needs a name")?.to_string();

    if !provider.tree().get_bool(APOSTROPHE_POSSESSION_KEY, true) {
        return Ok(Reply::Text(name));
    }

    let suffix = if name.ends_with('s') { "'" } else { "'s" };
    Ok(Reply::Text(format!("{name}{suffix}")))
}
