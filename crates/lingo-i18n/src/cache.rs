//! Per-contract cache of locale providers with idle expiry

use crate::color::{AlternateColorCodes, ColorTranslator};
use crate::contract::Contract;
use crate::error::{I18nError, I18nResult};
use crate::resolver::Provider;
use lingo_common::Locale;
use lingo_config::{ConfigLoader, ConfigTree, LanguageSettings, LoadError, YamlConfigLoader};
use moka::notification::RemovalCause;
use moka::sync::Cache;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default time an unaccessed provider stays cached
pub const DEFAULT_IDLE_WINDOW: Duration = Duration::from_secs(600);

/// Cache performance counters
#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Requests served from the cache
    pub hits: AtomicU64,
    /// Requests that had to wait for a load
    pub misses: AtomicU64,
    /// Providers built from a file
    pub loads: AtomicU64,
    /// Files that existed but could not be loaded
    pub load_failures: AtomicU64,
    /// Entries dropped for idleness or capacity
    pub evictions: AtomicU64,
    /// Entries dropped by an explicit invalidation
    pub invalidations: AtomicU64,
}

impl CacheMetrics {
    /// Counts a cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a provider load
    pub fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a failed load
    pub fn record_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts an eviction
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts an invalidation
    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of times a file was read to build a provider
    pub fn loads(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }

    /// Hits over all requests, or 0 before the first request
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let total = hits + self.misses.load(Ordering::Relaxed) as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }

    /// Snapshot of every counter by name
    pub fn get_stats(&self) -> HashMap<String, u64> {
        let mut stats = HashMap::new();
        stats.insert("hits".to_string(), self.hits.load(Ordering::Relaxed));
        stats.insert("misses".to_string(), self.misses.load(Ordering::Relaxed));
        stats.insert("loads".to_string(), self.loads.load(Ordering::Relaxed));
        stats.insert("load_failures".to_string(), self.load_failures.load(Ordering::Relaxed));
        stats.insert("evictions".to_string(), self.evictions.load(Ordering::Relaxed));
        stats.insert(
            "invalidations".to_string(),
            self.invalidations.load(Ordering::Relaxed),
        );
        stats
    }
}

/// Lazily built providers for one contract, keyed by locale.
///
/// A locale's provider is built on first request and shared until it has gone
/// unrequested for the idle window. Concurrent first requests for the same
/// locale share a single load. Dropping the cache drops every provider.
pub struct LocaleCache {
    contract: Arc<Contract>,
    directory: PathBuf,
    default_locale: Locale,
    idle_window: Duration,
    loader: Arc<dyn ConfigLoader>,
    colors: Arc<dyn ColorTranslator>,
    providers: Cache<Locale, Arc<Provider>>,
    metrics: Arc<CacheMetrics>,
}

impl LocaleCache {
    /// Starts building a cache for `contract` reading files from `directory`.
    pub fn builder(contract: Contract, directory: impl Into<PathBuf>) -> LocaleCacheBuilder {
        LocaleCacheBuilder::new(contract, directory.into())
    }

    /// Provider for `locale`, loading it on a miss.
    ///
    /// A locale whose file exists but cannot be loaded gets the default
    /// locale's provider; the failure is not cached, so the next request
    /// retries the file.
    pub fn get(&self, locale: &Locale) -> Arc<Provider> {
        if let Some(provider) = self.providers.get(locale) {
            self.metrics.record_hit();
            return provider;
        }
        self.metrics.record_miss();

        match self.providers.try_get_with(locale.clone(), || self.load(locale)) {
            Ok(provider) => provider,
            Err(err) => {
                warn!(
                    "Falling back to {} for contract '{}': {}",
                    self.default_locale,
                    self.contract.name(),
                    err
                );
                self.default_provider()
            }
        }
    }

    /// Provider for a raw locale string. Malformed input uses the default locale.
    pub fn get_raw(&self, raw: &str) -> Arc<Provider> {
        self.get(&Locale::parse_or(raw, &self.default_locale))
    }

    /// Provider for the default locale.
    pub fn default_provider(&self) -> Arc<Provider> {
        self.get(&self.default_locale)
    }

    /// Whether `locale` currently has a cached provider.
    pub fn contains(&self, locale: &Locale) -> bool {
        self.providers.contains_key(locale)
    }

    /// Drops the provider for `locale`; the next request reloads its file.
    pub fn invalidate(&self, locale: &Locale) {
        debug!("Invalidating {} for contract '{}'", locale, self.contract.name());
        self.metrics.record_invalidation();
        self.providers.invalidate(locale);
    }

    /// Drops every provider.
    pub fn invalidate_all(&self) {
        let entry_count = self.entry_count();
        info!(
            "Invalidating {} cached locales for contract '{}'",
            entry_count,
            self.contract.name()
        );
        self.metrics.invalidations.fetch_add(entry_count, Ordering::Relaxed);
        self.providers.invalidate_all();
    }

    /// Runs expiry and eviction bookkeeping now instead of lazily.
    pub fn run_pending_tasks(&self) {
        self.providers.run_pending_tasks();
    }

    /// Number of cached providers after pending maintenance.
    pub fn entry_count(&self) -> u64 {
        self.providers.run_pending_tasks();
        self.providers.entry_count()
    }

    /// The contract served by this cache.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Directory language files are read from.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Locale used for fallbacks.
    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// How long an unrequested provider stays cached.
    pub fn idle_window(&self) -> Duration {
        self.idle_window
    }

    /// Shared handle to this cache's counters.
    pub fn metrics(&self) -> Arc<CacheMetrics> {
        Arc::clone(&self.metrics)
    }

    fn load(&self, locale: &Locale) -> Result<Arc<Provider>, LoadError> {
        self.metrics.record_load();
        debug!("Loading {} for contract '{}'", locale, self.contract.name());

        let tree = match self.loader.load(&self.directory, locale) {
            Ok(tree) => tree,
            Err(err) => {
                self.metrics.record_load_failure();
                if *locale != self.default_locale {
                    return Err(err);
                }
                warn!(
                    "Default locale failed to load for contract '{}', serving an empty tree: {}",
                    self.contract.name(),
                    err
                );
                ConfigTree::empty()
            }
        };

        Ok(Arc::new(Provider::new(
            locale.clone(),
            tree,
            Arc::clone(&self.contract),
            Arc::clone(&self.colors),
        )))
    }
}

impl fmt::Debug for LocaleCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleCache")
            .field("contract", &self.contract.name())
            .field("directory", &self.directory)
            .field("default_locale", &self.default_locale)
            .field("idle_window", &self.idle_window)
            .field("cached", &self.providers.entry_count())
            .finish_non_exhaustive()
    }
}

/// Builder for [`LocaleCache`]
pub struct LocaleCacheBuilder {
    contract: Contract,
    directory: PathBuf,
    default_locale: Locale,
    idle_window: Duration,
    max_capacity: Option<u64>,
    loader: Option<Arc<dyn ConfigLoader>>,
    colors: Option<Arc<dyn ColorTranslator>>,
}

impl LocaleCacheBuilder {
    fn new(contract: Contract, directory: PathBuf) -> Self {
        Self {
            contract,
            directory,
            default_locale: Locale::english(),
            idle_window: DEFAULT_IDLE_WINDOW,
            max_capacity: None,
            loader: None,
            colors: None,
        }
    }

    /// Applies the shared library settings: default locale, idle window,
    /// capacity, file extension and color codes.
    pub fn settings(mut self, settings: &LanguageSettings) -> Self {
        self.default_locale = Locale::parse_or(&settings.default_locale, &Locale::english());
        self.idle_window = settings.idle_window();
        self.max_capacity = settings.max_capacity;
        self.loader = Some(Arc::new(YamlConfigLoader::new(settings.file_extension.clone())));
        self.colors = Some(Arc::new(AlternateColorCodes::new(
            settings.color_marker,
            settings.error_color_code,
        )));
        self
    }

    /// Locale served when another locale's file cannot be loaded.
    pub fn default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }

    /// Time an unrequested provider stays cached.
    pub fn idle_window(mut self, window: Duration) -> Self {
        self.idle_window = window;
        self
    }

    /// Caps the number of cached locales; least useful entries are evicted.
    pub fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Replaces the YAML file loader.
    pub fn loader(mut self, loader: Arc<dyn ConfigLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Replaces the color translator.
    pub fn colors(mut self, colors: Arc<dyn ColorTranslator>) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Creates the language directory and the cache.
    pub fn build(self) -> I18nResult<LocaleCache> {
        fs::create_dir_all(&self.directory).map_err(|source| I18nError::Storage {
            path: self.directory.clone(),
            source,
        })?;

        let metrics = Arc::new(CacheMetrics::default());
        let listener_metrics = Arc::clone(&metrics);
        let contract_name = self.contract.name().to_string();

        let mut builder = Cache::builder()
            .time_to_idle(self.idle_window)
            .eviction_listener(move |locale: Arc<Locale>, _: Arc<Provider>, cause: RemovalCause| {
                if cause.was_evicted() {
                    listener_metrics.record_eviction();
                }
                debug!(
                    "Provider for {} left the cache of contract '{}': {:?}",
                    locale, contract_name, cause
                );
            });
        if let Some(capacity) = self.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        info!(
            "Created locale cache for contract '{}' at {:?} (idle window {:?})",
            self.contract.name(),
            self.directory,
            self.idle_window
        );

        Ok(LocaleCache {
            contract: Arc::new(self.contract),
            directory: self.directory,
            default_locale: self.default_locale,
            idle_window: self.idle_window,
            loader: self.loader.unwrap_or_else(|| Arc::new(YamlConfigLoader::default())),
            colors: self.colors.unwrap_or_else(|| Arc::new(AlternateColorCodes::default())),
            providers: builder.build(),
            metrics,
        })
    }
}
