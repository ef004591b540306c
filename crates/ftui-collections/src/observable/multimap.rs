#![forbid(unsafe_code)]

//! Observable set multimaps.

use std::fmt;
use std::hash::Hash;

use ahash::AHashSet;

use super::{ObservableContainer, ObservableKind};
use crate::backing::HashSetMultimap;
use crate::change::{SetMultimapElementaryChange, SetMultimapKind};
use crate::config::NotifyConfig;
use crate::diff;

impl<K, V> ObservableKind for SetMultimapKind<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Eq + Hash + Clone + fmt::Debug + 'static,
{
    type Equality = ();
}

/// Observable [`HashSetMultimap`].
pub type ObservableSetMultimap<K, V> = ObservableContainer<SetMultimapKind<K, V>>;

impl<K, V> ObservableSetMultimap<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Eq + Hash + Clone + fmt::Debug + 'static,
{
    /// Empty multimap.
    #[must_use]
    pub fn new() -> Self {
        Self::from_multimap(HashSetMultimap::new())
    }

    #[must_use]
    pub fn from_multimap(entries: HashSetMultimap<K, V>) -> Self {
        Self::with_config(entries, NotifyConfig::default())
    }

    #[must_use]
    pub fn with_config(entries: HashSetMultimap<K, V>, config: NotifyConfig) -> Self {
        Self::from_parts(entries, (), config)
    }

    /// Clone of the values of `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<AHashSet<V>> {
        self.with(|map| map.get(key).cloned())
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.with(|map| map.contains_key(key))
    }

    #[must_use]
    pub fn contains_entry(&self, key: &K, value: &V) -> bool {
        self.with(|map| map.contains_entry(key, value))
    }

    /// Number of key/value entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.with(HashSetMultimap::len)
    }

    /// Number of keys with at least one value.
    #[must_use]
    pub fn key_len(&self) -> usize {
        self.with(HashSetMultimap::key_len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.with(HashSetMultimap::is_empty)
    }

    #[must_use]
    pub fn to_multimap(&self) -> HashSetMultimap<K, V> {
        self.snapshot()
    }

    /// Add the entry `key -> value`. Returns whether it was absent.
    pub fn put(&self, key: K, value: V) -> bool {
        self.mutate(|map, ()| {
            if !map.put(key.clone(), value.clone()) {
                return (false, Vec::new());
            }
            let added = AHashSet::from_iter([value]);
            let change = SetMultimapElementaryChange::new(key, AHashSet::new(), added);
            (true, change.into_iter().collect())
        })
    }

    /// Add every value of `values` under `key`. Returns whether anything was
    /// added.
    pub fn put_all(&self, key: K, values: impl IntoIterator<Item = V>) -> bool {
        self.mutate(|map, ()| {
            let added: AHashSet<V> = values
                .into_iter()
                .filter(|value| map.put(key.clone(), value.clone()))
                .collect();
            let change = SetMultimapElementaryChange::new(key, AHashSet::new(), added);
            (change.is_some(), change.into_iter().collect())
        })
    }

    /// Add every entry of `other`. One sub-change per key that gained
    /// values. Returns whether anything was added.
    pub fn put_all_multimap(&self, other: &HashSetMultimap<K, V>) -> bool {
        self.mutate(|map, ()| {
            let changes: Vec<_> = other
                .iter()
                .filter_map(|(key, values)| {
                    let added: AHashSet<V> = values
                        .iter()
                        .filter(|value| map.put(key.clone(), (*value).clone()))
                        .cloned()
                        .collect();
                    SetMultimapElementaryChange::new(key.clone(), AHashSet::new(), added)
                })
                .collect();
            (!changes.is_empty(), changes)
        })
    }

    /// Remove the entry `key -> value`. Returns whether it was present.
    pub fn remove(&self, key: &K, value: &V) -> bool {
        self.mutate(|map, ()| {
            if !map.remove(key, value) {
                return (false, Vec::new());
            }
            let change = SetMultimapElementaryChange::new(
                key.clone(),
                AHashSet::from_iter([value.clone()]),
                AHashSet::new(),
            );
            (true, change.into_iter().collect())
        })
    }

    /// Remove every value of `key`, returning them.
    pub fn remove_all(&self, key: &K) -> AHashSet<V> {
        self.mutate(|map, ()| {
            let removed = map.remove_all(key);
            let change =
                SetMultimapElementaryChange::new(key.clone(), removed.clone(), AHashSet::new());
            (removed, change.into_iter().collect())
        })
    }

    /// Replace the values of `key`, returning the previous ones. An empty
    /// `values` removes the key.
    pub fn replace_values(&self, key: K, values: impl IntoIterator<Item = V>) -> AHashSet<V> {
        let values: AHashSet<V> = values.into_iter().collect();
        self.mutate(|map, ()| {
            let change = diff::multimap::value_delta(key.clone(), &map_values(map, &key), &values);
            let previous = map.replace_values(key, values);
            (previous, change.into_iter().collect())
        })
    }

    /// Replace the whole contents. Returns whether anything changed.
    pub fn replace_all(&self, contents: HashSetMultimap<K, V>) -> bool {
        self.mutate(|map, ()| {
            let changes = diff::multimap::replacement(map, &contents);
            if !changes.is_empty() {
                *map = contents;
            }
            (!changes.is_empty(), changes)
        })
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.mutate(|map, ()| {
            let changes = diff::multimap::cleared(map);
            map.clear();
            ((), changes)
        });
    }
}

fn map_values<K: Eq + Hash, V: Eq + Hash + Clone>(
    map: &HashSetMultimap<K, V>,
    key: &K,
) -> AHashSet<V> {
    map.get(key).cloned().unwrap_or_default()
}

impl<K, V> Default for ObservableSetMultimap<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Eq + Hash + Clone + fmt::Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for ObservableSetMultimap<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Eq + Hash + Clone + fmt::Debug + 'static,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_multimap(iter.into_iter().collect())
    }
}
