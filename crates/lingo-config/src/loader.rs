//! Loading utilities for language files and library settings

use crate::tree::{ConfigTree, TreeError};
use crate::validator::SettingsValidator;
use crate::LanguageSettings;
use lingo_common::{LingoError, Locale};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Why a language file could not be turned into a tree
#[derive(Debug, Error)]
pub enum LoadCause {
    /// The file exists but could not be read
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),

    /// The file was read but is not a valid language document
    #[error(transparent)]
    Parse(#[from] TreeError),
}

/// A locale's language file exists but is unreadable or malformed
#[derive(Debug, Error)]
#[error("Unable to load language file for {locale} at {}: {cause}", .path.display())]
pub struct LoadError {
    /// Locale whose file failed
    pub locale: Locale,
    /// File that was attempted
    pub path: PathBuf,
    /// Underlying failure
    #[source]
    pub cause: LoadCause,
}

/// Loads one locale's language file from a directory
///
/// Implementations must treat an absent file as an empty tree; only files
/// that exist and cannot be used are errors.
pub trait ConfigLoader: Send + Sync {
    /// Loads the tree for `locale` from `directory`.
    fn load(&self, directory: &Path, locale: &Locale) -> Result<ConfigTree, LoadError>;
}

/// File-backed loader reading `<directory>/<language>.<extension>`
#[derive(Debug, Clone)]
pub struct YamlConfigLoader {
    extension: String,
}

impl YamlConfigLoader {
    /// Creates a loader for files with the given extension (no leading dot).
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// The file extension this loader reads.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path of the file backing `locale`. Regions share their language's file.
    pub fn file_path(&self, directory: &Path, locale: &Locale) -> PathBuf {
        directory.join(format!("{}.{}", locale.language(), self.extension))
    }
}

impl Default for YamlConfigLoader {
    fn default() -> Self {
        Self::new(crate::defaults::DEFAULT_FILE_EXTENSION)
    }
}

impl ConfigLoader for YamlConfigLoader {
    fn load(&self, directory: &Path, locale: &Locale) -> Result<ConfigTree, LoadError> {
        let path = self.file_path(directory, locale);
        debug!("Loading language file: {:?}", path);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No language file for {} at {:?}, using an empty tree", locale, path);
                return Ok(ConfigTree::empty());
            }
            Err(err) => {
                return Err(LoadError {
                    locale: locale.clone(),
                    path,
                    cause: err.into(),
                })
            }
        };

        ConfigTree::from_yaml_str(&content).map_err(|err| LoadError {
            locale: locale.clone(),
            path,
            cause: err.into(),
        })
    }
}

/// Settings loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading the settings file
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML settings: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Settings validation error
    #[error("Settings validation failed: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Name of the variable
        var: String,
        /// Why its value was rejected
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for LingoError {
    fn from(err: ConfigError) -> Self {
        LingoError::config_with_source("failed to load language settings", err)
    }
}

impl From<LoadError> for LingoError {
    fn from(err: LoadError) -> Self {
        let locale = err.locale.tag();
        LingoError::Localization {
            message: err.to_string(),
            locale: Some(locale),
            source: Some(Box::new(err)),
        }
    }
}

/// Environment variable overriding [`LanguageSettings::languages_dir`]
pub const ENV_LANGUAGES_DIR: &str = "LINGO_LANGUAGES_DIR";
/// Environment variable overriding [`LanguageSettings::file_extension`]
pub const ENV_FILE_EXTENSION: &str = "LINGO_FILE_EXTENSION";
/// Environment variable overriding [`LanguageSettings::default_locale`]
pub const ENV_DEFAULT_LOCALE: &str = "LINGO_DEFAULT_LOCALE";
/// Environment variable overriding [`LanguageSettings::idle_window_secs`]
pub const ENV_IDLE_WINDOW_SECS: &str = "LINGO_IDLE_WINDOW_SECS";

/// Loader for [`LanguageSettings`]
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from a YAML file, apply environment overrides and validate
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<LanguageSettings, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut settings = Self::parse(&content)?;
        Self::apply_env_overrides(&mut settings)?;
        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }

    /// Defaults with environment overrides applied, validated
    pub fn from_env() -> Result<LanguageSettings, ConfigError> {
        let mut settings = LanguageSettings::default();
        Self::apply_env_overrides(&mut settings)?;
        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }

    /// Parse and validate YAML text without consulting the environment
    pub fn from_yaml_str(content: &str) -> Result<LanguageSettings, ConfigError> {
        let settings = Self::parse(content)?;
        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }

    fn parse(content: &str) -> Result<LanguageSettings, ConfigError> {
        if content.trim().is_empty() {
            return Ok(LanguageSettings::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply environment variable overrides to settings
    fn apply_env_overrides(settings: &mut LanguageSettings) -> Result<(), ConfigError> {
        if let Ok(dir) = env::var(ENV_LANGUAGES_DIR) {
            settings.languages_dir = dir;
        }

        if let Ok(extension) = env::var(ENV_FILE_EXTENSION) {
            settings.file_extension = extension;
        }

        if let Ok(locale) = env::var(ENV_DEFAULT_LOCALE) {
            settings.default_locale = locale;
        }

        if let Ok(secs) = env::var(ENV_IDLE_WINDOW_SECS) {
            settings.idle_window_secs = secs.trim().parse().map_err(|e| ConfigError::EnvParseError {
                var: ENV_IDLE_WINDOW_SECS.to_string(),
                source: Box::new(e),
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_common::test_utils::{create_temp_dir, language_fixtures, write_language_file};

    #[test]
    fn test_load_existing_file() {
        let temp = create_temp_dir();
        write_language_file(temp.path(), "en", language_fixtures::english_yaml());

        let tree = YamlConfigLoader::default()
            .load(temp.path(), &Locale::english())
            .unwrap();
        assert_eq!(tree.get_string("greetings.player").as_deref(), Some("Hello %s"));
    }

    #[test]
    fn test_region_shares_language_file() {
        let temp = create_temp_dir();
        write_language_file(temp.path(), "es", language_fixtures::spanish_yaml());

        let loader = YamlConfigLoader::default();
        let locale = Locale::new("es", Some("MX"));
        assert_eq!(loader.file_path(temp.path(), &locale), temp.path().join("es.yml"));
        assert!(!loader.load(temp.path(), &locale).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_empty_tree() {
        let temp = create_temp_dir();
        let tree = YamlConfigLoader::default()
            .load(temp.path(), &Locale::new("fr", None))
            .unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_malformed_file_is_load_error() {
        let temp = create_temp_dir();
        let path = write_language_file(temp.path(), "de", language_fixtures::malformed_yaml());

        let err = YamlConfigLoader::default()
            .load(temp.path(), &Locale::new("de", None))
            .unwrap_err();
        assert_eq!(err.locale, Locale::new("de", None));
        assert_eq!(err.path, path);
        assert!(matches!(err.cause, LoadCause::Parse(TreeError::Yaml(_))));
    }

    #[test]
    fn test_directory_in_place_of_file_is_load_error() {
        let temp = create_temp_dir();
        fs::create_dir_all(temp.path().join("it.yml")).unwrap();

        let err = YamlConfigLoader::default()
            .load(temp.path(), &Locale::new("it", None))
            .unwrap_err();
        assert!(matches!(err.cause, LoadCause::Io(_)));
    }

    #[test]
    fn test_custom_extension() {
        let temp = create_temp_dir();
        fs::write(temp.path().join("en.yaml"), "prefix: '> '").unwrap();

        let loader = YamlConfigLoader::new("yaml");
        let tree = loader.load(temp.path(), &Locale::english()).unwrap();
        assert_eq!(tree.get_string("prefix").as_deref(), Some("> "));
    }

    #[test]
    fn test_settings_from_yaml_str() {
        let yaml = "default_locale: es\nidle_window_secs: 30\n";
        let settings = SettingsLoader::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.default_locale, "es");
        assert_eq!(settings.idle_window_secs, 30);
        assert_eq!(settings.file_extension, "yml");
    }

    #[test]
    fn test_settings_blank_document_is_default() {
        assert_eq!(SettingsLoader::from_yaml_str("").unwrap(), LanguageSettings::default());
    }

    #[test]
    fn test_settings_validation_runs() {
        let err = SettingsLoader::from_yaml_str("idle_window_secs: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_load_error_converts_to_lingo_error() {
        let err = LoadError {
            locale: Locale::new("de", None),
            path: PathBuf::from("de.yml"),
            cause: LoadCause::Io(std::io::Error::new(ErrorKind::PermissionDenied, "denied")),
        };
        let lingo: LingoError = err.into();
        assert_eq!(lingo.locale(), Some("de"));
    }
}
