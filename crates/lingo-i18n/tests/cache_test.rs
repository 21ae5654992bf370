//! Concurrency and expiry tests for the locale cache.

use lingo_common::test_utils::{
    create_temp_dir, init_test_logging, language_fixtures, write_language_file,
};
use lingo_common::Locale;
use lingo_config::{ConfigLoader, ConfigTree, LoadError, YamlConfigLoader};
use lingo_i18n::{args, Contract, LocaleCache, SlotDescriptor};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// Delegates to the YAML loader and counts every load.
#[derive(Default)]
struct CountingLoader {
    inner: YamlConfigLoader,
    loads: AtomicUsize,
}

impl CountingLoader {
    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ConfigLoader for CountingLoader {
    fn load(&self, directory: &Path, locale: &Locale) -> Result<ConfigTree, LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        self.inner.load(directory, locale)
    }
}

fn contract() -> Contract {
    Contract::builder("greetings")
        .folder("greetings")
        .message("player", 1, SlotDescriptor::text("greetings.player"))
        .build()
        .unwrap()
}

#[test]
fn test_concurrent_first_requests_share_one_load() {
    init_test_logging();
    let temp = create_temp_dir();
    write_language_file(temp.path(), "en", language_fixtures::english_yaml());

    let loader = Arc::new(CountingLoader::default());
    let cache = Arc::new(
        LocaleCache::builder(contract(), temp.path())
            .loader(loader.clone())
            .build()
            .unwrap(),
    );

    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.get(&Locale::english())
            })
        })
        .collect();

    let providers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(loader.loads(), 1);
    assert!(providers.iter().all(|p| Arc::ptr_eq(p, &providers[0])));
    assert_eq!(providers[0].text("player", &args!["Chris"]), "§8[§bS§8] §7Hello Chris");
}

#[test]
fn test_idle_provider_expires_and_reloads() {
    init_test_logging();
    let temp = create_temp_dir();
    write_language_file(temp.path(), "en", "greetings:\n  player: 'Hi %s'\n");

    let loader = Arc::new(CountingLoader::default());
    let cache = LocaleCache::builder(contract(), temp.path())
        .loader(loader.clone())
        .idle_window(Duration::from_millis(200))
        .build()
        .unwrap();

    let before = cache.get(&Locale::english());
    assert_eq!(before.text("player", &args!["A"]), "Hi A");

    write_language_file(temp.path(), "en", "greetings:\n  player: 'Hey %s'\n");
    assert_eq!(cache.get(&Locale::english()).text("player", &args!["A"]), "Hi A");

    thread::sleep(Duration::from_millis(500));
    cache.run_pending_tasks();
    assert!(!cache.contains(&Locale::english()));

    let after = cache.get(&Locale::english());
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.text("player", &args!["A"]), "Hey A");
    assert_eq!(loader.loads(), 2);

    // A provider held by a caller keeps working after expiry.
    assert_eq!(before.text("player", &args!["A"]), "Hi A");
}

#[test]
fn test_capacity_evicts_entries() {
    let temp = create_temp_dir();
    let cache = LocaleCache::builder(contract(), temp.path())
        .max_capacity(1)
        .build()
        .unwrap();

    for code in ["en", "es", "de", "fr"] {
        cache.get(&Locale::new(code, None));
    }
    assert!(cache.entry_count() <= 1);
}

#[test]
fn test_different_locales_load_separately() {
    let temp = create_temp_dir();
    write_language_file(temp.path(), "en", language_fixtures::english_yaml());
    write_language_file(temp.path(), "es", language_fixtures::spanish_yaml());

    let loader = Arc::new(CountingLoader::default());
    let cache = LocaleCache::builder(contract(), temp.path())
        .loader(loader.clone())
        .build()
        .unwrap();

    let en = cache.get(&Locale::english());
    let es = cache.get(&Locale::new("es", None));
    cache.get(&Locale::english());

    assert_eq!(loader.loads(), 2);
    assert_eq!(en.text("player", &args!["x"]), "§8[§bS§8] §7Hello x");
    assert_eq!(es.text("player", &args!["x"]), "[ES] Hola x");
    assert_eq!(cache.entry_count(), 2);
}

#[test]
fn test_locale_cannot_reach_outside_the_folder() {
    init_test_logging();
    let root = create_temp_dir();
    write_language_file(root.path(), "secret", "greetings:\n  player: 'leaked %s'\n");
    let folder = root.path().join("c");

    let cache = LocaleCache::builder(contract(), &folder).build().unwrap();
    let provider = cache.get(&Locale::new("../secret", None));

    assert_eq!(provider.locale(), &Locale::english());
    assert_eq!(provider.text("player", &args!["x"]), "");
    assert!(serde_yaml::from_str::<Locale>("'../secret'").is_err());
}
