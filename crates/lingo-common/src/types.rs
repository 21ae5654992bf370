//! Common type definitions shared across the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;
use unic_langid::LanguageIdentifier;

/// A language with an optional region, e.g. `en` or `pt_BR`.
///
/// Both parts are stored in canonical case (lower-case language, upper-case
/// region) so that `en_us`, `en-US` and `EN_us` compare and hash equal.
/// The language is always 2 to 8 ASCII letters and the region is 2 letters
/// or 3 digits, so a locale is always safe to use as a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    region: Option<String>,
}

/// Raised when a raw locale string cannot be turned into a [`Locale`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unable to translate locale: {raw:?}")]
pub struct LocaleParseError {
    /// The rejected input.
    pub raw: String,
}

impl Locale {
    /// Creates a locale from its parts, normalizing case.
    ///
    /// Parts that are not plain subtags are rejected with a warning and
    /// English is returned instead; use [`Locale::try_new`] to handle the
    /// error.
    pub fn new(language: impl AsRef<str>, region: Option<&str>) -> Self {
        let language = language.as_ref();
        Self::try_new(language, region).unwrap_or_else(|err| {
            warn!("{}, using en", err);
            Self::english()
        })
    }

    /// Creates a locale from its parts, normalizing case, or fails when
    /// either part is not a plain subtag.
    pub fn try_new(language: &str, region: Option<&str>) -> Result<Self, LocaleParseError> {
        let region = region.filter(|r| !r.is_empty());
        let valid_language = (2..=8).contains(&language.len())
            && language.bytes().all(|b| b.is_ascii_alphabetic());
        let valid_region = region.map_or(true, |r| {
            (r.len() == 2 && r.bytes().all(|b| b.is_ascii_alphabetic()))
                || (r.len() == 3 && r.bytes().all(|b| b.is_ascii_digit()))
        });

        if !valid_language || !valid_region {
            return Err(LocaleParseError {
                raw: match region {
                    Some(region) => format!("{}_{}", language, region),
                    None => language.to_string(),
                },
            });
        }

        Ok(Self {
            language: language.to_ascii_lowercase(),
            region: region.map(str::to_ascii_uppercase),
        })
    }

    /// English without a region, the fallback for unparseable input.
    pub fn english() -> Self {
        Self {
            language: "en".to_string(),
            region: None,
        }
    }

    /// The lower-case language code.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The upper-case region code, if any.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The same locale with the region dropped.
    pub fn without_region(&self) -> Self {
        Self {
            language: self.language.clone(),
            region: None,
        }
    }

    /// Underscore-joined tag, e.g. `en_US`.
    pub fn tag(&self) -> String {
        match &self.region {
            Some(region) => format!("{}_{}", self.language, region),
            None => self.language.clone(),
        }
    }

    /// Parses a raw locale string such as `en_us`, `pt-BR` or `de`.
    ///
    /// Scripts and variants are accepted by the parser but discarded.
    pub fn parse(raw: &str) -> Result<Self, LocaleParseError> {
        let trimmed = raw.trim();
        let rejected = || LocaleParseError {
            raw: raw.to_string(),
        };

        if trimmed.is_empty() {
            return Err(rejected());
        }

        let langid: LanguageIdentifier = trimmed.parse().map_err(|_| rejected())?;
        let language = langid.language.as_str();
        if language == "und" {
            return Err(rejected());
        }

        let region = langid.region.as_ref().map(|r| r.as_str());
        Self::try_new(language, region).map_err(|_| rejected())
    }

    /// Parses `raw`, logging a warning and returning `fallback` on failure.
    pub fn parse_or(raw: &str, fallback: &Locale) -> Self {
        Self::parse(raw).unwrap_or_else(|err| {
            warn!(raw = %raw, fallback = %fallback, "{}", err);
            fallback.clone()
        })
    }

    /// Parses `raw`, falling back to English on malformed input.
    pub fn from_raw(raw: &str) -> Self {
        Self::parse_or(raw, &Self::english())
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl FromStr for Locale {
    type Err = LocaleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleParseError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag()
    }
}
