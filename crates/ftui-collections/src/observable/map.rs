#![forbid(unsafe_code)]

//! Observable hash maps.

use std::fmt;
use std::hash::Hash;

use ahash::AHashMap;

use super::{ObservableContainer, ObservableKind};
use crate::change::{MapElementaryChange, MapKind};
use crate::config::NotifyConfig;
use crate::diff;

/// Value equality of a map.
pub type ValueEquality<V> = fn(&V, &V) -> bool;

impl<K, V> ObservableKind for MapKind<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Clone + fmt::Debug + 'static,
{
    type Equality = ValueEquality<V>;
}

/// Observable [`AHashMap`].
///
/// Storing a value equal (under the map's value equality) to the current
/// one replaces it silently.
pub type ObservableMap<K, V> = ObservableContainer<MapKind<K, V>>;

fn partial_eq<V: PartialEq>(a: &V, b: &V) -> bool {
    a == b
}

impl<K, V> ObservableMap<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Clone + fmt::Debug + PartialEq + 'static,
{
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::from_map(AHashMap::new())
    }

    /// Map over `entries`.
    #[must_use]
    pub fn from_map(entries: AHashMap<K, V>) -> Self {
        Self::with_config(entries, NotifyConfig::default())
    }

    /// Map over `entries` with a custom delivery configuration.
    #[must_use]
    pub fn with_config(entries: AHashMap<K, V>, config: NotifyConfig) -> Self {
        Self::with_equality(entries, partial_eq::<V>, config)
    }
}

impl<K, V> Default for ObservableMap<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Clone + fmt::Debug + PartialEq + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for ObservableMap<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Clone + fmt::Debug + PartialEq + 'static,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(iter.into_iter().collect())
    }
}

impl<K, V> ObservableMap<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Clone + fmt::Debug + 'static,
{
    /// Map over `entries` comparing values with `equality`.
    #[must_use]
    pub fn with_equality(
        entries: AHashMap<K, V>,
        equality: ValueEquality<V>,
        config: NotifyConfig,
    ) -> Self {
        Self::from_parts(entries, equality, config)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.with(|map| map.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.with(|map| map.is_empty())
    }

    /// Clone of the value mapped to `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.with(|map| map.get(key).cloned())
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.with(|map| map.contains_key(key))
    }

    #[must_use]
    pub fn to_map(&self) -> AHashMap<K, V> {
        self.snapshot()
    }

    /// Map `key` to `value`, returning the previous value. A value equal
    /// under the map's equality to the current one is not stored and fires
    /// nothing.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.mutate(|map, eq| {
            match diff::keyed::map_entry(key.clone(), map.get(&key), Some(&value), eq) {
                Some(change) => (map.insert(key, value), vec![change]),
                None => (map.get(&key).cloned(), Vec::new()),
            }
        })
    }

    /// Insert every entry of `iter` in order. Each touched key reports one
    /// sub-change from its original value to its final one. Returns whether
    /// anything changed.
    pub fn extend(&self, iter: impl IntoIterator<Item = (K, V)>) -> bool {
        self.mutate(|map, eq| {
            let mut touched: Vec<K> = Vec::new();
            let mut originals: AHashMap<K, Option<V>> = AHashMap::new();
            for (key, value) in iter {
                let previous = map.insert(key.clone(), value);
                if !originals.contains_key(&key) {
                    touched.push(key.clone());
                    originals.insert(key, previous);
                }
            }
            let changes: Vec<_> = touched
                .into_iter()
                .filter_map(|key| {
                    let original = originals.remove(&key).flatten();
                    let change =
                        diff::keyed::map_entry(key.clone(), original.as_ref(), map.get(&key), eq);
                    if change.is_none() {
                        if let Some(original) = original {
                            map.insert(key, original);
                        }
                    }
                    change
                })
                .collect();
            (!changes.is_empty(), changes)
        })
    }

    /// Remove `key`, returning its value.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.mutate(|map, _| match map.remove_entry(key) {
            Some((key, value)) => {
                let change = MapElementaryChange::new(key, Some(value.clone()), None);
                (Some(value), change.into_iter().collect())
            }
            None => (None, Vec::new()),
        })
    }

    /// Remove every key of `keys`. Returns whether anything was removed.
    pub fn remove_all(&self, keys: &[K]) -> bool {
        self.mutate(|map, _| {
            let changes: Vec<_> = keys
                .iter()
                .filter_map(|key| map.remove_entry(key))
                .filter_map(|(key, value)| MapElementaryChange::new(key, Some(value), None))
                .collect();
            (!changes.is_empty(), changes)
        })
    }

    /// Keep only entries matching `predicate`. Returns whether anything was
    /// removed.
    pub fn retain(&self, mut predicate: impl FnMut(&K, &V) -> bool) -> bool {
        self.mutate(|map, _| {
            let doomed: Vec<K> = map
                .iter()
                .filter(|&(k, v)| !predicate(k, v))
                .map(|(k, _)| k.clone())
                .collect();
            let changes: Vec<_> = doomed
                .iter()
                .filter_map(|key| map.remove_entry(key))
                .filter_map(|(key, value)| MapElementaryChange::new(key, Some(value), None))
                .collect();
            (!changes.is_empty(), changes)
        })
    }

    /// Replace each value by `f(key, value)`. Values equal under the map's
    /// equality to the current ones are kept. Returns whether anything
    /// changed.
    pub fn replace_all(&self, mut f: impl FnMut(&K, &V) -> V) -> bool {
        self.mutate(|map, eq| {
            let updated: AHashMap<K, V> = map.iter().map(|(k, v)| (k.clone(), f(k, v))).collect();
            let changes = diff::keyed::map_replacement(map, &updated, eq);
            for change in &changes {
                if let Some(value) = change.value_added() {
                    map.insert(change.key().clone(), value.clone());
                }
            }
            (!changes.is_empty(), changes)
        })
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.mutate(|map, _| {
            let changes = map
                .drain()
                .filter_map(|(key, value)| MapElementaryChange::new(key, Some(value), None))
                .collect();
            ((), changes)
        });
    }
}
