// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The key-value store collaborator.

use alloc::collections::BTreeMap;
use alloc::string::String;

use serde::{Deserialize, Serialize};

use crate::variant::Variant;

/// Storage that settings are loaded from and saved to.
///
/// Paths are slash-separated, `group/section/property`. How entries end up on
/// disk is up to the implementation.
pub trait KeyValueStore {
    /// Returns `true` if an entry exists at `path`.
    fn contains(&self, path: &str) -> bool;

    /// Returns the entry at `path`.
    fn value(&self, path: &str) -> Option<Variant>;

    /// Creates or replaces the entry at `path`.
    fn set_value(&mut self, path: &str, value: Variant);

    /// Removes the entry at `path`, returning it.
    fn remove(&mut self, path: &str) -> Option<Variant>;

    /// Flushes pending writes to the backing medium.
    fn sync(&mut self) {}
}

/// An in-memory [`KeyValueStore`], ordered by path.
///
/// It serializes as a plain map, so embedders can persist it with any serde
/// format:
///
/// ```rust
/// use understory_settings::{KeyValueStore, MemoryStore, Variant};
///
/// let mut store = MemoryStore::new();
/// store.set_value("export/DEFAULT/size", Variant::from("25.4mm"));
///
/// let json = serde_json::to_string(&store).unwrap();
/// assert_eq!(json, r#"{"export/DEFAULT/size":{"text":"25.4mm"}}"#);
///
/// let back: MemoryStore = serde_json::from_str(&json).unwrap();
/// assert_eq!(back, store);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    entries: BTreeMap<String, Variant>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variant)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl KeyValueStore for MemoryStore {
    fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    fn value(&self, path: &str) -> Option<Variant> {
        self.entries.get(path).cloned()
    }

    fn set_value(&mut self, path: &str, value: Variant) {
        self.entries.insert(path.into(), value);
    }

    fn remove(&mut self, path: &str) -> Option<Variant> {
        self.entries.remove(path)
    }
}

impl FromIterator<(String, Variant)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (String, Variant)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
