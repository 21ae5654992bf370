//! Test utilities and shared fixtures for the lingo workspace.
//!
//! Enabled for other crates through the `testing` feature.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a temporary directory for tests that automatically cleans up.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write `<dir>/<code>.yml`, creating `dir` if needed, and return the path.
pub fn write_language_file(dir: &Path, code: &str, content: &str) -> PathBuf {
    fs::create_dir_all(dir).expect("Failed to create language directory");
    let path = dir.join(format!("{code}.yml"));
    fs::write(&path, content).expect("Failed to write language file");
    path
}

/// YAML language file fixtures.
pub mod language_fixtures {
    /// English file exercising prefix, unknown, templates and lists.
    pub fn english_yaml() -> &'static str {
        r#"
prefix: "&8[&bS&8] &7"
unknown: "Something went wrong"
apostrophe_possession: true

greetings:
  player: "Hello %s"
  farewell: "Goodbye %s, see you in %d days"

items:
  sword: "A %s sword"
  shield: "A sturdy shield"

help:
  - "&e/spawn"
  - "&e/home"

number-format: "Number: %d"
"#
    }

    /// Spanish file with a different prefix and no possessive apostrophes.
    pub fn spanish_yaml() -> &'static str {
        r#"
prefix: "[ES] "
unknown: "Algo salió mal"
apostrophe_possession: false

greetings:
  player: "Hola %s"

help:
  - "/inicio"
"#
    }

    /// Content that is not valid YAML.
    pub fn malformed_yaml() -> &'static str {
        "prefix: [unclosed\n  - : :\n"
    }
}
