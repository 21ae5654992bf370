//! Format presets, call arguments and positional substitution.

use crate::color::ColorTranslator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a raw message is decorated before arguments are substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormatPreset {
    /// Color translation only, no prefix.
    Plain,
    /// `prefix ++ message`, then color translation.
    #[default]
    Titled,
    /// `prefix ++ message ++ error marker`, then color translation.
    Error,
}

impl FormatPreset {
    /// Whether the preset reads the provider's `prefix()`.
    pub fn uses_prefix(self) -> bool {
        !matches!(self, Self::Plain)
    }

    /// Applies prefix and color rules. Colors are translated once, last.
    pub fn apply(self, prefix: &str, message: &str, colors: &dyn ColorTranslator) -> String {
        match self {
            Self::Plain => colors.translate(message),
            Self::Titled => colors.translate(&format!("{prefix}{message}")),
            Self::Error => colors.translate(&format!("{prefix}{message}{}", colors.error_marker())),
        }
    }
}

/// One argument passed to a slot call.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Free text.
    Text(String),
    /// Whole number.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<char> for Arg {
    fn from(value: char) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

macro_rules! int_arg {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )+
    };
}

int_arg!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Arg {
    fn from(value: u64) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<usize> for Arg {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

/// Builds a `Vec<Arg>` from heterogeneous values.
///
/// ```
/// use lingo_i18n::{args, Arg};
/// let args = args!["sword", 3, 1.5];
/// assert_eq!(args[1], Arg::Int(3));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Arg::from($value)),+]
    };
}

/// Number of `%s` placeholders in a path template.
pub fn count_placeholders(template: &str) -> usize {
    template.matches("%s").count()
}

struct Placeholder {
    index: Option<usize>,
    precision: Option<usize>,
    conversion: char,
    len: usize,
}

/// Parses the conversion starting at `s[0] == '%'`.
fn parse_placeholder(s: &str) -> Option<Placeholder> {
    let body = &s[1..];
    let mut pos = 0;

    let digits = body.bytes().take_while(u8::is_ascii_digit).count();
    let mut index = None;
    if digits > 0 {
        if body.as_bytes().get(digits) != Some(&b'$') {
            return None;
        }
        index = Some(body[..digits].parse().ok()?);
        pos = digits + 1;
    }

    let mut precision = None;
    if body[pos..].starts_with('.') {
        let count = body[pos + 1..].bytes().take_while(u8::is_ascii_digit).count();
        if count == 0 {
            return None;
        }
        precision = Some(body[pos + 1..pos + 1 + count].parse().ok()?);
        pos += 1 + count;
    }

    let conversion = body[pos..].chars().next()?;
    if !"sSdfn%".contains(conversion) {
        return None;
    }

    Some(Placeholder {
        index,
        precision,
        conversion,
        len: 1 + pos + conversion.len_utf8(),
    })
}

fn render(arg: &Arg, conversion: char, precision: Option<usize>) -> String {
    match (conversion, arg) {
        ('d', Arg::Int(value)) => value.to_string(),
        ('f', Arg::Int(value)) => format!("{:.*}", precision.unwrap_or(6), *value as f64),
        ('f', Arg::Float(value)) => format!("{:.*}", precision.unwrap_or(6), value),
        ('s' | 'S', _) => {
            let text = arg.to_string();
            let text = match precision {
                Some(max) => text.chars().take(max).collect(),
                None => text,
            };
            if conversion == 'S' {
                text.to_uppercase()
            } else {
                text
            }
        }
        _ => arg.to_string(),
    }
}

/// Substitutes `args` into printf-style placeholders.
///
/// Supports `%s`, `%S`, `%d`, `%f`, `%.Nf`, `%.Ns`, explicit indices
/// (`%2$s`), `%n` and `%%`. A placeholder without a matching argument, or an
/// unsupported conversion, is copied through unchanged.
pub fn substitute(template: &str, args: &[Arg]) -> String {
    if !template.contains('%') {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut next_ordinary = 0;
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        let Some(placeholder) = parse_placeholder(tail) else {
            out.push('%');
            rest = &tail[1..];
            continue;
        };

        match placeholder.conversion {
            '%' => out.push('%'),
            'n' => out.push('\n'),
            conversion => {
                let index = match placeholder.index {
                    Some(explicit) => explicit.checked_sub(1),
                    None => {
                        next_ordinary += 1;
                        Some(next_ordinary - 1)
                    }
                };

                match index.and_then(|i| args.get(i)) {
                    Some(arg) => out.push_str(&render(arg, conversion, placeholder.precision)),
                    None => out.push_str(&tail[..placeholder.len]),
                }
            }
        }

        rest = &tail[placeholder.len..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::AlternateColorCodes;
    use proptest::prelude::*;

    #[test]
    fn test_presets() {
        let colors = AlternateColorCodes::default();
        assert_eq!(FormatPreset::Plain.apply("[S] ", "&aHi", &colors), "§aHi");
        assert_eq!(FormatPreset::Titled.apply("&8[S] ", "Hi", &colors), "§8[S] Hi");
        assert_eq!(FormatPreset::Error.apply("[S] ", "Hi", &colors), "[S] Hi§c");
        assert!(!FormatPreset::Plain.uses_prefix());
        assert!(FormatPreset::Error.uses_prefix());
        assert_eq!(FormatPreset::default(), FormatPreset::Titled);
    }

    #[test]
    fn test_preset_names() {
        let preset: FormatPreset = serde_yaml::from_str("ERROR").unwrap();
        assert_eq!(preset, FormatPreset::Error);
        assert_eq!(serde_yaml::to_string(&FormatPreset::Plain).unwrap().trim(), "PLAIN");
    }

    #[test]
    fn test_sequential_substitution() {
        assert_eq!(substitute("Hello %s", &args!["Chris"]), "Hello Chris");
        assert_eq!(
            substitute("Goodbye %s, see you in %d days", &args!["Bob", 3]),
            "Goodbye Bob, see you in 3 days"
        );
    }

    #[test]
    fn test_explicit_indices() {
        assert_eq!(substitute("%2$s then %1$s", &args!["a", "b"]), "b then a");
        assert_eq!(substitute("%1$s %s %s", &args!["a", "b"]), "a a b");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(substitute("%.2f", &args![1.0]), "1.00");
        assert_eq!(substitute("%f", &args![2]), "2.000000");
        assert_eq!(substitute("%d", &args!["x"]), "x");
        assert_eq!(substitute("%s", &args![true]), "true");
    }

    #[test]
    fn test_text_conversions() {
        assert_eq!(substitute("%S!", &args!["loud"]), "LOUD!");
        assert_eq!(substitute("%.3s", &args!["abcdef"]), "abc");
    }

    #[test]
    fn test_literals() {
        assert_eq!(substitute("100%%", &[]), "100%");
        assert_eq!(substitute("a%nb", &[]), "a\nb");
        assert_eq!(substitute("50% off", &[]), "50% off");
        assert_eq!(substitute("trailing %", &[]), "trailing %");
        assert_eq!(substitute("%q", &args!["x"]), "%q");
    }

    #[test]
    fn test_missing_arguments_stay_verbatim() {
        assert_eq!(substitute("%s and %s", &args!["one"]), "one and %s");
        assert_eq!(substitute("%3$s", &args!["one"]), "%3$s");
        assert_eq!(substitute("%0$s", &args!["one"]), "%0$s");
    }

    #[test]
    fn test_count_placeholders() {
        assert_eq!(count_placeholders("items.%s"), 1);
        assert_eq!(count_placeholders("%s.%s.name"), 2);
        assert_eq!(count_placeholders("plain.path"), 0);
    }

    #[test]
    fn test_arg_conversions() {
        assert_eq!(Arg::from(7u64), Arg::Int(7));
        assert_eq!(Arg::from(u64::MAX), Arg::Int(i64::MAX));
        assert_eq!(Arg::from('x'), Arg::Text("x".into()));
        assert_eq!(args![].len(), 0);
    }

    proptest! {
        #[test]
        fn test_property_text_without_percent_is_unchanged(text in "[^%]{0,40}") {
            prop_assert_eq!(substitute(&text, &args!["ignored"]), text);
        }

        #[test]
        fn test_property_single_placeholder(
            before in "[a-z ]{0,10}",
            value in "[A-Za-z0-9]{0,10}",
            after in "[a-z ]{0,10}"
        ) {
            let template = format!("{before}%s{after}");
            prop_assert_eq!(
                substitute(&template, &[Arg::from(value.as_str())]),
                format!("{before}{value}{after}")
            );
        }
    }
}
