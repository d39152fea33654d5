//! Multi-value header collection.
//!
//! # Responsibilities
//! - Map lowercase header names to ordered `{key, value}` entries
//! - Provide first-value lookup used by every interceptor
//! - Replace a header with a single entry
//!
//! # Design Decisions
//! - Names are lowercased on every write and on deserialization; lookups
//!   lowercase the name asked for
//! - `key` keeps the original casing and may be absent
//! - `BTreeMap` keeps serialized output stable

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A single header occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HeaderEntry {
    /// Header name in its original casing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Header value.
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: value.into(),
        }
    }
}

/// Headers keyed by lowercase name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Headers(BTreeMap<String, Vec<HeaderEntry>>);

impl From<BTreeMap<String, Vec<HeaderEntry>>> for Headers {
    /// Lowercases names, merging entries whose names differ only in case.
    fn from(raw: BTreeMap<String, Vec<HeaderEntry>>) -> Self {
        let mut headers = Self::default();
        for (name, entries) in raw {
            headers
                .0
                .entry(name.to_ascii_lowercase())
                .or_default()
                .extend(entries);
        }
        headers
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, Vec<HeaderEntry>>::deserialize(deserializer).map(Self::from)
    }
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value recorded for `name`, if any.
    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.0
            .get(&name.to_ascii_lowercase())
            .and_then(|entries| entries.first())
            .map(|entry| entry.value.as_str())
    }

    /// All entries recorded for `name`.
    pub fn get_all(&self, name: &str) -> &[HeaderEntry] {
        self.0
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    /// Replace every entry for `key` with a single `{key, value}` entry.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0
            .insert(key.to_ascii_lowercase(), vec![HeaderEntry::new(key, value)]);
    }

    /// Append an entry, keeping any existing ones.
    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        self.0
            .entry(key.to_ascii_lowercase())
            .or_default()
            .push(HeaderEntry::new(key, value));
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<HeaderEntry>> {
        self.0.remove(&name.to_ascii_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(lowercase name, entry)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderEntry)> {
        self.0
            .iter()
            .flat_map(|(name, entries)| entries.iter().map(move |e| (name.as_str(), e)))
    }
}
