//! Runtime validation of library settings.

use crate::loader::ConfigError;
use crate::schema::LanguageSettings;

/// Settings validator.
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validates settings, collecting every problem before failing.
    pub fn validate(settings: &LanguageSettings) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if settings.idle_window_secs == 0 {
            problems.push("idle_window_secs must be greater than zero".to_string());
        }

        if settings.file_extension.is_empty() {
            problems.push("file_extension cannot be empty".to_string());
        } else if settings.file_extension.contains(['.', '/', '\\']) {
            problems.push(format!(
                "file_extension '{}' must not contain dots or path separators",
                settings.file_extension
            ));
        }

        if let Some(problem) = Self::check_dir_name("languages_dir", &settings.languages_dir) {
            problems.push(problem);
        }

        if settings.default_locale.trim().is_empty() {
            problems.push("default_locale cannot be empty".to_string());
        }

        if settings.max_capacity == Some(0) {
            problems.push("max_capacity must be greater than zero when set".to_string());
        }

        if settings.color_marker.is_alphanumeric() || settings.color_marker.is_whitespace() {
            problems.push(format!(
                "color_marker '{}' must be a symbol",
                settings.color_marker
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationError(problems))
        }
    }

    /// Checks that `value` is a single relative directory name.
    pub fn check_dir_name(field: &str, value: &str) -> Option<String> {
        if value.trim().is_empty() {
            Some(format!("{field} cannot be empty"))
        } else if value.contains(['/', '\\']) || value == "." || value == ".." {
            Some(format!("{field} '{value}' must be a single directory name"))
        } else {
            None
        }
    }
}
