//! Library settings schema using serde.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings shared by every contract registered with a language manager.
///
/// Missing keys take their values from [`Default`], so a settings file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageSettings {
    /// Directory under the host's data directory that holds contract folders.
    pub languages_dir: String,
    /// Extension of language files, without the leading dot.
    pub file_extension: String,
    /// Locale used for malformed locale strings and failed loads.
    pub default_locale: String,
    /// Seconds an unaccessed provider stays cached.
    pub idle_window_secs: u64,
    /// Upper bound on cached locales per contract.
    pub max_capacity: Option<u64>,
    /// Character introducing a color code in raw messages.
    pub color_marker: char,
    /// Color code appended to error messages.
    pub error_color_code: char,
}

impl LanguageSettings {
    /// The idle window as a [`Duration`].
    pub fn idle_window(&self) -> Duration {
        Duration::from_secs(self.idle_window_secs)
    }
}
