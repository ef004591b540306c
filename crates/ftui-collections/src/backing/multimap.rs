#![forbid(unsafe_code)]

//! Hash-backed set multimap.

use std::fmt;
use std::hash::Hash;

use ahash::{AHashMap, AHashSet};

/// A map from keys to non-empty sets of values.
///
/// # Invariants
///
/// 1. No key maps to an empty set.
/// 2. `len()` equals the total number of key/value entries.
pub struct HashSetMultimap<K, V> {
    entries: AHashMap<K, AHashSet<V>>,
    len: usize,
}

impl<K: Eq + Hash, V: Eq + Hash> HashSetMultimap<K, V> {
    /// Create an empty multimap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: AHashMap::new(),
            len: 0,
        }
    }

    /// Values of `key`, if it has any.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&AHashSet<V>> {
        self.entries.get(key)
    }

    /// Whether `key` has at least one value.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether the `key`/`value` entry exists.
    #[must_use]
    pub fn contains_entry(&self, key: &K, value: &V) -> bool {
        self.entries
            .get(key)
            .is_some_and(|values| values.contains(value))
    }

    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of keys.
    #[must_use]
    pub fn key_len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add an entry. Returns `false` if it was already present.
    pub fn put(&mut self, key: K, value: V) -> bool {
        let inserted = self.entries.entry(key).or_default().insert(value);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Remove an entry. Returns `false` if it was absent.
    pub fn remove(&mut self, key: &K, value: &V) -> bool {
        let Some(values) = self.entries.get_mut(key) else {
            return false;
        };
        let removed = values.remove(value);
        if removed {
            self.len -= 1;
            if values.is_empty() {
                self.entries.remove(key);
            }
        }
        removed
    }

    /// Remove every value of `key`, returning them.
    pub fn remove_all(&mut self, key: &K) -> AHashSet<V> {
        let values = self.entries.remove(key).unwrap_or_default();
        self.len -= values.len();
        values
    }

    /// Replace the values of `key`, returning the previous ones. An empty
    /// `values` removes the key.
    pub fn replace_values(&mut self, key: K, values: AHashSet<V>) -> AHashSet<V> {
        let previous = if values.is_empty() {
            self.entries.remove(&key).unwrap_or_default()
        } else {
            self.len += values.len();
            self.entries.insert(key, values).unwrap_or_default()
        };
        self.len -= previous.len();
        previous
    }

    /// Keys with at least one value.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Keys with their value sets.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &AHashSet<V>)> {
        self.entries.iter()
    }

    /// Every key/value entry.
    pub fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k, v)))
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.len = 0;
    }
}

impl<K: Eq + Hash, V: Eq + Hash> Default for HashSetMultimap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for HashSetMultimap<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            len: self.len,
        }
    }
}

impl<K: Eq + Hash, V: Eq + Hash> PartialEq for HashSetMultimap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.entries == other.entries
    }
}

impl<K: Eq + Hash, V: Eq + Hash> Eq for HashSetMultimap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashSetMultimap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Eq + Hash, V: Eq + Hash> Extend<(K, V)> for HashSetMultimap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: Eq + Hash, V: Eq + Hash> FromIterator<(K, V)> for HashSetMultimap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut multimap = Self::new();
        multimap.extend(iter);
        multimap
    }
}
