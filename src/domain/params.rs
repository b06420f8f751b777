//! Ordered parameter sets
//!
//! The order of a [`CanonicalParameterSet`] is the order the provider
//! signs over, so entries are only ever appended.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered (key, value) sequence used both for transmission and as signature input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalParameterSet {
    entries: Vec<(&'static str, String)>,
}

impl CanonicalParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    /// Append a field. Keys are static because every schema is fixed at compile time.
    pub fn push(&mut self, key: &'static str, value: impl Into<String>) {
        self.entries.push((key, value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `key=value` pairs joined by `&`, without percent-encoding.
    ///
    /// With `filter_empty`, fields whose value is the empty string are left out.
    pub fn to_canonical_string(&self, filter_empty: bool) -> String {
        self.entries
            .iter()
            .filter(|(_, v)| !(filter_empty && v.is_empty()))
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Pairs suitable for a query string or form body, empty values included
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        self.entries.clone()
    }
}

impl Serialize for CanonicalParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
