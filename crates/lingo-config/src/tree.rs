//! Read-only key-value tree parsed from one locale's language file.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Errors raised while turning YAML text into a [`ConfigTree`].
#[derive(Debug, Error)]
pub enum TreeError {
    /// The text is not valid YAML
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document parsed but its root is not a mapping
    #[error("document root must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// Parsed key-value data for one locale.
///
/// Lookups take dotted paths (`greetings.player`). Scalar keys that are not
/// strings (`404: "Not found"`) match by their textual form.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree {
    root: Mapping,
}

impl ConfigTree {
    /// A tree with no keys; every lookup misses.
    pub fn empty() -> Self {
        Self {
            root: Mapping::new(),
        }
    }

    /// Parses YAML text. Blank or `null` documents give an empty tree.
    pub fn from_yaml_str(content: &str) -> Result<Self, TreeError> {
        if content.trim().is_empty() {
            return Ok(Self::empty());
        }

        match serde_yaml::from_str::<Value>(content)? {
            Value::Null => Ok(Self::empty()),
            Value::Mapping(root) => Ok(Self { root }),
            other => Err(TreeError::NotAMapping(kind_of(&other))),
        }
    }

    /// Raw value at `path`, if present and not null.
    pub fn get(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return None;
        }

        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = lookup(&self.root, first)?;

        for segment in segments {
            match untagged(current) {
                Value::Mapping(map) => current = lookup(map, segment)?,
                _ => return None,
            }
        }

        match untagged(current) {
            Value::Null => None,
            value => Some(value),
        }
    }

    /// Whether `path` holds a non-null value.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Scalar at `path` as text. Sequences and mappings are not strings.
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get(path).and_then(scalar_text)
    }

    /// Sequence at `path` as a list of strings.
    ///
    /// Non-scalar elements are skipped; a missing path or a non-sequence
    /// value gives an empty list.
    pub fn get_string_list(&self, path: &str) -> Vec<String> {
        match self.get(path) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_text).collect(),
            _ => Vec::new(),
        }
    }

    /// Boolean at `path`, or `default` when missing or not a boolean.
    pub fn get_bool(&self, path: &str, default: bool) -> bool {
        match self.get(path) {
            Some(Value::Bool(value)) => *value,
            _ => default,
        }
    }

    /// Whether the tree has no keys at all.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Dotted paths of every key, in document order.
    ///
    /// With `deep` set, nested mappings are walked and each intermediate key
    /// is listed before its children.
    pub fn keys(&self, deep: bool) -> Vec<String> {
        let mut keys = Vec::new();
        collect_keys(&self.root, "", deep, &mut keys);
        keys
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::empty()
    }
}

fn lookup<'a>(map: &'a Mapping, segment: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(key, _)| scalar_text(key).as_deref() == Some(segment))
        .map(|(_, value)| value)
}

fn untagged(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match untagged(value) {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn collect_keys(map: &Mapping, parent: &str, deep: bool, out: &mut Vec<String>) {
    for (key, value) in map {
        let Some(key) = scalar_text(key) else {
            continue;
        };
        let path = if parent.is_empty() {
            key
        } else {
            format!("{parent}.{key}")
        };

        out.push(path.clone());
        if deep {
            if let Value::Mapping(child) = untagged(value) {
                collect_keys(child, &path, deep, out);
            }
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(tagged) => kind_of(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_common::test_utils::language_fixtures;

    fn english() -> ConfigTree {
        ConfigTree::from_yaml_str(language_fixtures::english_yaml()).unwrap()
    }

    #[test]
    fn test_nested_lookup() {
        let tree = english();
        assert_eq!(tree.get_string("greetings.player").as_deref(), Some("Hello %s"));
        assert_eq!(tree.get_string("items.shield").as_deref(), Some("A sturdy shield"));
        assert!(tree.get_string("greetings.missing").is_none());
        assert!(tree.get_string("greetings.player.deeper").is_none());
        assert!(tree.get_string("").is_none());
    }

    #[test]
    fn test_sections_are_not_strings() {
        let tree = english();
        assert!(tree.contains("greetings"));
        assert!(tree.get_string("greetings").is_none());
        assert!(tree.get_string("help").is_none());
    }

    #[test]
    fn test_scalars_render_as_text() {
        let yaml = "count: 3\nratio: 0.5\nflag: true\n404: gone\n";
        let tree = ConfigTree::from_yaml_str(yaml).unwrap();
        assert_eq!(tree.get_string("count").as_deref(), Some("3"));
        assert_eq!(tree.get_string("ratio").as_deref(), Some("0.5"));
        assert_eq!(tree.get_string("flag").as_deref(), Some("true"));
        assert_eq!(tree.get_string("404").as_deref(), Some("gone"));
    }

    #[test]
    fn test_string_list() {
        let tree = english();
        assert_eq!(tree.get_string_list("help"), vec!["&e/spawn", "&e/home"]);
        assert!(tree.get_string_list("missing").is_empty());
        assert!(tree.get_string_list("greetings.player").is_empty());

        let mixed = ConfigTree::from_yaml_str("mixed: [a, 2, {nested: x}, true]").unwrap();
        assert_eq!(mixed.get_string_list("mixed"), vec!["a", "2", "true"]);
    }

    #[test]
    fn test_get_bool() {
        let tree = english();
        assert!(tree.get_bool("apostrophe_possession", false));
        assert!(tree.get_bool("missing", true));
        assert!(!tree.get_bool("prefix", false));
    }

    #[test]
    fn test_null_values_are_absent() {
        let tree = ConfigTree::from_yaml_str("prefix: ~\n").unwrap();
        assert!(!tree.contains("prefix"));
        assert!(tree.get_string("prefix").is_none());
    }

    #[test]
    fn test_blank_and_null_documents_are_empty() {
        assert!(ConfigTree::from_yaml_str("").unwrap().is_empty());
        assert!(ConfigTree::from_yaml_str("   \n").unwrap().is_empty());
        assert!(ConfigTree::from_yaml_str("~").unwrap().is_empty());
        assert_eq!(ConfigTree::default(), ConfigTree::empty());
    }

    #[test]
    fn test_non_mapping_root_is_rejected() {
        let err = ConfigTree::from_yaml_str("- a\n- b\n").unwrap_err();
        assert!(matches!(err, TreeError::NotAMapping("a sequence")));
    }

    #[test]
    fn test_malformed_yaml_is_rejected() {
        let err = ConfigTree::from_yaml_str(language_fixtures::malformed_yaml()).unwrap_err();
        assert!(matches!(err, TreeError::Yaml(_)));
    }

    #[test]
    fn test_keys() {
        let tree = ConfigTree::from_yaml_str("a: 1\nb:\n  c: 2\n  d: 3\n").unwrap();
        assert_eq!(tree.keys(false), vec!["a", "b"]);
        assert_eq!(tree.keys(true), vec!["a", "b", "b.c", "b.d"]);
    }
}
