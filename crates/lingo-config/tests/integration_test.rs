//! Integration tests for lingo-config crate.
//!
//! These tests exercise language files and settings files on disk.

use lingo_common::test_utils::{
    create_temp_dir, init_test_logging, language_fixtures, write_language_file,
};
use lingo_common::Locale;
use lingo_config::{ConfigLoader, LanguageSettings, SettingsLoader, YamlConfigLoader};
use std::fs;

#[test]
fn test_loader_reads_each_language_independently() {
    init_test_logging();
    let temp = create_temp_dir();
    write_language_file(temp.path(), "en", language_fixtures::english_yaml());
    write_language_file(temp.path(), "es", language_fixtures::spanish_yaml());

    let loader = YamlConfigLoader::default();
    let en = loader.load(temp.path(), &Locale::english()).unwrap();
    let es = loader.load(temp.path(), &Locale::new("es", None)).unwrap();

    assert_eq!(en.get_string("greetings.player").as_deref(), Some("Hello %s"));
    assert_eq!(es.get_string("greetings.player").as_deref(), Some("Hola %s"));
    assert!(en.get_bool("apostrophe_possession", false));
    assert!(!es.get_bool("apostrophe_possession", true));
}

#[test]
fn test_loader_is_usable_as_trait_object() {
    let temp = create_temp_dir();
    write_language_file(temp.path(), "en", "prefix: '> '");

    let loader: Box<dyn ConfigLoader> = Box::new(YamlConfigLoader::default());
    let tree = loader.load(temp.path(), &Locale::parse("en_US").unwrap()).unwrap();
    assert_eq!(tree.get_string("prefix").as_deref(), Some("> "));
}

#[test]
fn test_settings_file_round_trip() {
    init_test_logging();
    let temp = create_temp_dir();
    let path = temp.path().join("lingo.yml");
    fs::write(
        &path,
        "languages_dir: lang\nfile_extension: yaml\nidle_window_secs: 120\nmax_capacity: 16\n",
    )
    .unwrap();

    let settings = SettingsLoader::load_from_file(&path).unwrap();
    assert_eq!(settings.languages_dir, "lang");
    assert_eq!(settings.file_extension, "yaml");
    assert_eq!(settings.idle_window_secs, 120);
    assert_eq!(settings.max_capacity, Some(16));
    assert_eq!(settings.default_locale, LanguageSettings::default().default_locale);
}

#[test]
fn test_missing_settings_file_is_io_error() {
    let temp = create_temp_dir();
    let err = SettingsLoader::load_from_file(temp.path().join("absent.yml")).unwrap_err();
    assert!(matches!(err, lingo_config::ConfigError::IoError(_)));
}

#[test]
fn test_invalid_settings_yaml_is_parse_error() {
    let err = SettingsLoader::from_yaml_str("idle_window_secs: soon\n").unwrap_err();
    assert!(matches!(err, lingo_config::ConfigError::ParseError(_)));
}
