//! Registry of contracts and their locale caches

use crate::cache::LocaleCache;
use crate::contract::Contract;
use crate::error::{I18nError, I18nResult};
use crate::provisioning::{self, HostApp};
use crate::resolver::Provider;
use dashmap::DashMap;
use lingo_common::Locale;
use lingo_config::LanguageSettings;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Entry point for hosting applications.
///
/// Registers contracts, owns one [`LocaleCache`] per contract and hands out
/// providers. Safe to share between threads.
#[derive(Debug)]
pub struct LanguageManager {
    settings: LanguageSettings,
    default_locale: Locale,
    caches: DashMap<String, Arc<LocaleCache>>,
}

impl LanguageManager {
    /// Creates an empty manager.
    pub fn new(settings: LanguageSettings) -> Self {
        let default_locale = Locale::parse_or(&settings.default_locale, &Locale::english());
        info!("Initializing language manager with default locale {}", default_locale);

        Self {
            settings,
            default_locale,
            caches: DashMap::new(),
        }
    }

    /// Settings every registered cache is built from.
    pub fn settings(&self) -> &LanguageSettings {
        &self.settings
    }

    /// Locale used for unparseable input and failed loads.
    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Registers `contract` with files read from `<directory>/<folder>`.
    ///
    /// Registering a name twice replaces the earlier cache.
    pub fn register(
        &self,
        directory: impl AsRef<Path>,
        contract: Contract,
    ) -> I18nResult<Arc<LocaleCache>> {
        let folder = directory.as_ref().join(contract.source().folder_name());
        let cache = LocaleCache::builder(contract, folder)
            .settings(&self.settings)
            .build()?;
        Ok(self.insert(cache))
    }

    /// Copies the contract's bundled defaults into the host's data directory,
    /// then registers it against that directory.
    pub fn register_bundled(
        &self,
        host: &dyn HostApp,
        contract: Contract,
    ) -> I18nResult<Arc<LocaleCache>> {
        provisioning::provision_defaults(host, &self.settings, contract.source())?;
        let root = host.data_dir().join(&self.settings.languages_dir);
        self.register(root, contract)
    }

    /// Registers a cache built elsewhere, e.g. with a custom loader.
    pub fn register_cache(&self, cache: LocaleCache) -> Arc<LocaleCache> {
        self.insert(cache)
    }

    fn insert(&self, cache: LocaleCache) -> Arc<LocaleCache> {
        let cache = Arc::new(cache);
        let name = cache.contract().name().to_string();

        if self.caches.insert(name.clone(), Arc::clone(&cache)).is_some() {
            warn!("Contract '{}' was already registered, replacing it", name);
        }
        info!(
            "Registered contract '{}' with {} slots from {:?}",
            name,
            cache.contract().capabilities().len(),
            cache.directory()
        );
        cache
    }

    /// Removes a contract. Outstanding providers stay usable.
    pub fn unregister(&self, contract: &str) -> Option<Arc<LocaleCache>> {
        self.caches.remove(contract).map(|(_, cache)| cache)
    }

    /// The cache of a registered contract.
    pub fn cache(&self, contract: &str) -> Option<Arc<LocaleCache>> {
        self.caches.get(contract).map(|entry| Arc::clone(entry.value()))
    }

    /// Names of all registered contracts, sorted.
    pub fn contracts(&self) -> Vec<String> {
        let mut names: Vec<String> = self.caches.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    /// Provider of `contract` for `locale`.
    pub fn provider(&self, contract: &str, locale: &Locale) -> I18nResult<Arc<Provider>> {
        let cache = self
            .cache(contract)
            .ok_or_else(|| I18nError::UnregisteredContract {
                contract: contract.to_string(),
            })?;
        Ok(cache.get(locale))
    }

    /// Provider of `contract` for a raw locale string. Malformed input uses
    /// the default locale.
    pub fn provider_for(&self, contract: &str, raw_locale: &str) -> I18nResult<Arc<Provider>> {
        self.provider(contract, &self.resolve_locale(raw_locale))
    }

    /// Parses `raw`, falling back to English.
    pub fn to_locale(raw: &str) -> Locale {
        Locale::from_raw(raw)
    }

    /// Parses `raw`, falling back to the configured default locale.
    pub fn resolve_locale(&self, raw: &str) -> Locale {
        Locale::parse_or(raw, &self.default_locale)
    }
}

impl Default for LanguageManager {
    fn default() -> Self {
        Self::new(LanguageSettings::default())
    }
}
