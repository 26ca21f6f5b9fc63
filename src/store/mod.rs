use std::collections::HashMap;

use crate::error::{ConfigError, Result};

/// Parsed INI content, section name -> key -> value.
///
/// Built once by the parser and read-only afterwards. Every stored section,
/// key and value is non-empty.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    content: HashMap<String, HashMap<String, String>>,
}

impl ConfigStore {
    pub(crate) fn new() -> Self {
        Self {
            content: HashMap::new(),
        }
    }

    /// Returns the value found under `section` and `key`, or
    /// `ConfigError::NotFound` if either is absent.
    pub fn get(&self, section: &str, key: &str) -> Result<&str> {
        self.content
            .get(section)
            .and_then(|keys| keys.get(key))
            .map(String::as_str)
            .ok_or_else(|| ConfigError::NotFound {
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.content
            .get(section)
            .is_some_and(|keys| keys.contains_key(key))
    }

    pub fn section(&self, name: &str) -> Option<&HashMap<String, String>> {
        self.content.get(name)
    }

    /// Section names, in no particular order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.content.keys().map(String::as_str)
    }

    /// Total number of entries across all sections.
    pub fn len(&self) -> usize {
        self.content.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn insert(&mut self, section: String, key: String, value: String) {
        self.content.entry(section).or_default().insert(key, value);
    }
}
