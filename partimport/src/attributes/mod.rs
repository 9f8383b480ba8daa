//! Attribute model for placed symbols.
//!
//! A placed symbol carries named text fields ("attributes") such as the
//! manufacturer (`MFG`) or catalog number (`CAT`). The import computes the
//! complete set of attributes a symbol should carry ([`AttributeMap`]) and
//! then brings the symbol's existing [`AttributeInstance`]s into agreement
//! with it ([`reconcile`]).

pub mod desired;
pub mod reconcile;

use serde::{Deserialize, Serialize};

pub use desired::{desired_attributes, FIXED_TAGS};
pub use reconcile::reconcile;

/// Canonical spelling of an attribute tag. Tags compare case-insensitively.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_uppercase()
}

/// One named text field attached to a placed symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInstance {
    pub tag: String,
    pub text: String,
}

impl AttributeInstance {
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        normalize_tag(&self.tag) == normalize_tag(tag)
    }
}

/// Tag to value mapping with unique, case-insensitive keys.
///
/// Keys are stored uppercased. Iteration follows first-insertion order;
/// overwriting a key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMap {
    entries: Vec<(String, String)>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, tag: &str) -> Option<usize> {
        let tag = normalize_tag(tag);
        self.entries.iter().position(|(k, _)| *k == tag)
    }

    /// Insert or overwrite `tag`. Returns the previous value if any.
    pub fn insert(&mut self, tag: &str, value: impl Into<String>) -> Option<String> {
        let value = value.into();
        match self.position(tag) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((normalize_tag(tag), value));
                None
            }
        }
    }

    /// Insert `tag` only if it is not present yet. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, tag: &str, value: impl Into<String>) -> bool {
        if self.contains(tag) {
            return false;
        }
        self.entries.push((normalize_tag(tag), value.into()));
        true
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.position(tag).map(|i| self.entries[i].1.as_str())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.position(tag).is_some()
    }

    pub fn remove(&mut self, tag: &str) -> Option<String> {
        self.position(tag).map(|i| self.entries.remove(i).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Add every pair of `other` whose key is not already present.
    pub fn extend_missing(&mut self, other: AttributeMap) {
        for (tag, value) in other {
            self.insert_if_absent(&tag, value);
        }
    }
}

impl IntoIterator for AttributeMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = AttributeMap::new();
        for (k, v) in iter {
            map.insert(k.as_ref(), v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut map = AttributeMap::new();
        map.insert("mfg", "ACME");
        assert_eq!(map.get("MFG"), Some("ACME"));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["MFG"]);

        let previous = map.insert("Mfg", "Other");
        assert_eq!(previous.as_deref(), Some("ACME"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut map: AttributeMap = [("A", "1"), ("B", "2"), ("C", "3")].into_iter().collect();
        map.insert("A", "9");
        assert_eq!(
            map.iter().collect::<Vec<_>>(),
            vec![("A", "9"), ("B", "2"), ("C", "3")]
        );
    }

    #[test]
    fn test_extend_missing_keeps_existing() {
        let mut map: AttributeMap = [("MFG", "ACME")].into_iter().collect();
        let other: AttributeMap = [("mfg", "EVIL"), ("RATING1", "10A")].into_iter().collect();
        map.extend_missing(other);
        assert_eq!(map.get("MFG"), Some("ACME"));
        assert_eq!(map.get("RATING1"), Some("10A"));
    }

    #[test]
    fn test_remove() {
        let mut map: AttributeMap = [("A", "1")].into_iter().collect();
        assert_eq!(map.remove("a").as_deref(), Some("1"));
        assert!(map.is_empty());
        assert_eq!(map.remove("a"), None);
    }

    #[test]
    fn test_instance_tag_match() {
        let inst = AttributeInstance::new("desc1", "x");
        assert!(inst.has_tag("DESC1"));
        assert!(!inst.has_tag("DESC2"));
    }
}
