use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque launch payload: a string-to-string map carried by START requests
/// and handed to the application's reset callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundle {
    entries: BTreeMap<String, String>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse launch arguments into a bundle. Arguments are alternating
    /// key/value tokens; a dangling key without a value is dropped.
    pub fn from_argv(args: &[String]) -> Self {
        let mut entries = BTreeMap::new();
        for pair in args.chunks_exact(2) {
            entries.insert(pair[0].clone(), pair[1].clone());
        }
        Self { entries }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
