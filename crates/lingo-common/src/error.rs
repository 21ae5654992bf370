//! Error types shared by the lingo crates

use thiserror::Error;

/// Workspace-wide error type
///
/// Crate-level errors (`ConfigError`, `LoadError`, `I18nError`) convert into
/// this so a hosting application can funnel every setup failure through one
/// type.
#[derive(Error, Debug)]
pub enum LingoError {
    /// Settings or language file related errors
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
        /// Underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Contract registration and message resolution errors
    #[error("Localization error: {message}")]
    Localization {
        /// What went wrong
        message: String,
        /// Tag of the locale involved, if any
        locale: Option<String>,
        /// Underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl LingoError {
    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new localization error with source
    pub fn localization_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Localization {
            message: msg.into(),
            locale: None,
            source: Some(Box::new(source)),
        }
    }

    /// The locale attached to a localization error, if any
    pub fn locale(&self) -> Option<&str> {
        match self {
            Self::Localization { locale, .. } => locale.as_deref(),
            Self::Config { .. } => None,
        }
    }
}

impl From<crate::types::LocaleParseError> for LingoError {
    fn from(err: crate::types::LocaleParseError) -> Self {
        let raw = err.raw.clone();
        Self::Localization {
            message: err.to_string(),
            locale: Some(raw),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Locale;
    use std::error::Error as _;

    #[test]
    fn test_config_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = LingoError::config_with_source("could not read", io);
        assert_eq!(err.to_string(), "Configuration error: could not read");
        assert!(err.source().is_some());
        assert_eq!(err.locale(), None);
    }

    #[test]
    fn test_localization_error_has_no_locale_by_default() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = LingoError::localization_with_source("resolution failed", io);
        assert_eq!(err.to_string(), "Localization error: resolution failed");
        assert_eq!(err.locale(), None);
    }

    #[test]
    fn test_locale_parse_error_converts() {
        let err: LingoError = Locale::parse("??").unwrap_err().into();
        assert_eq!(err.locale(), Some("??"));
        assert!(matches!(err, LingoError::Localization { .. }));
    }
}
