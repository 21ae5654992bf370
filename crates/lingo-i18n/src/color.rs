//! Translation of alternate color codes (`&c`) into section-sign sequences.

use std::fmt::Debug;

/// The character terminals and game clients read as "color code follows".
pub const SECTION_SIGN: char = '\u{00A7}';

const CODES: &str = "0123456789AaBbCcDdEeFfKkLlMmNnOoRrXx";

/// Translates marker-prefixed color codes in message text.
pub trait ColorTranslator: Send + Sync + Debug {
    /// Rewrites every recognised `<marker><code>` pair.
    fn translate(&self, text: &str) -> String;

    /// Untranslated code that colors error messages.
    fn error_marker(&self) -> String;
}

/// `&`-style codes: `&c` becomes `§c`, `&L` becomes `§l`.
///
/// A marker not followed by a valid code is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlternateColorCodes {
    marker: char,
    error_code: char,
}

impl AlternateColorCodes {
    /// Creates a translator for `marker`, using `error_code` for error messages.
    pub fn new(marker: char, error_code: char) -> Self {
        Self { marker, error_code }
    }

    /// The marker character.
    pub fn marker(&self) -> char {
        self.marker
    }
}

impl Default for AlternateColorCodes {
    fn default() -> Self {
        Self::new('&', 'c')
    }
}

impl ColorTranslator for AlternateColorCodes {
    fn translate(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match chars.peek() {
                Some(&code) if c == self.marker && CODES.contains(code) => {
                    out.push(SECTION_SIGN);
                    out.push(code.to_ascii_lowercase());
                    chars.next();
                }
                _ => out.push(c),
            }
        }

        out
    }

    fn error_marker(&self) -> String {
        format!("{}{}", self.marker, self.error_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translates_codes() {
        let colors = AlternateColorCodes::default();
        assert_eq!(colors.translate("&cRed &lBold"), "§cRed §lBold");
        assert_eq!(colors.translate("&A&b"), "§a§b");
    }

    #[test]
    fn test_leaves_invalid_sequences() {
        let colors = AlternateColorCodes::default();
        assert_eq!(colors.translate("Tom & Jerry"), "Tom & Jerry");
        assert_eq!(colors.translate("&z and &"), "&z and &");
        assert_eq!(colors.translate(""), "");
    }

    #[test]
    fn test_double_marker() {
        let colors = AlternateColorCodes::default();
        assert_eq!(colors.translate("&&c"), "&§c");
    }

    #[test]
    fn test_custom_marker() {
        let colors = AlternateColorCodes::new('$', '4');
        assert_eq!(colors.translate("$4Dark &cnot me"), "§4Dark &cnot me");
        assert_eq!(colors.error_marker(), "$4");
        assert_eq!(colors.translate(&colors.error_marker()), "§4");
    }
}
