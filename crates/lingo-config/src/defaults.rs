//! Default values for library settings.

use crate::schema::LanguageSettings;

/// Directory holding contract folders under a host's data directory.
pub const DEFAULT_LANGUAGES_DIR: &str = "languages";
/// Extension of language files.
pub const DEFAULT_FILE_EXTENSION: &str = "yml";
/// Process-wide default locale.
pub const DEFAULT_LOCALE: &str = "en";
/// Ten minutes.
pub const DEFAULT_IDLE_WINDOW_SECS: u64 = 600;
/// Marker introducing color codes, as in `&cRed`.
pub const DEFAULT_COLOR_MARKER: char = '&';
/// Red.
pub const DEFAULT_ERROR_COLOR_CODE: char = 'c';

impl Default for LanguageSettings {
    fn default() -> Self {
        Self {
            languages_dir: DEFAULT_LANGUAGES_DIR.to_string(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            default_locale: DEFAULT_LOCALE.to_string(),
            idle_window_secs: DEFAULT_IDLE_WINDOW_SECS,
            max_capacity: None,
            color_marker: DEFAULT_COLOR_MARKER,
            error_color_code: DEFAULT_ERROR_COLOR_CODE,
        }
    }
}
