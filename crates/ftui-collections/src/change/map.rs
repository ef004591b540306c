#![forbid(unsafe_code)]

//! Elementary changes of maps.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use ahash::AHashMap;

use super::{AtomicChange, ContainerKind};
use crate::error::{CollectionError, Result};

/// Container kind of [`ObservableMap`](crate::ObservableMap).
pub struct MapKind<K, V>(PhantomData<fn() -> (K, V)>);

/// Atomic change delivered by an observable map.
pub type MapChange<K, V> = AtomicChange<MapKind<K, V>>;

/// The mapping of one key changed.
///
/// At least one of `removed`/`added` is present: only `added` for a new key,
/// only `removed` for a removed key, both for a replaced value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapElementaryChange<K, V> {
    key: K,
    removed: Option<V>,
    added: Option<V>,
}

impl<K, V> MapElementaryChange<K, V> {
    /// `None` when neither value is present.
    pub(crate) fn new(key: K, removed: Option<V>, added: Option<V>) -> Option<Self> {
        (removed.is_some() || added.is_some()).then_some(Self {
            key,
            removed,
            added,
        })
    }

    /// Key whose mapping changed.
    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Previous value, if the key was mapped.
    #[must_use]
    pub fn value_removed(&self) -> Option<&V> {
        self.removed.as_ref()
    }

    /// New value, if the key is mapped now.
    #[must_use]
    pub fn value_added(&self) -> Option<&V> {
        self.added.as_ref()
    }

    /// Whether the key is mapped after the change.
    #[must_use]
    pub fn was_added(&self) -> bool {
        self.added.is_some()
    }

    /// Whether the key was mapped before the change.
    #[must_use]
    pub fn was_removed(&self) -> bool {
        self.removed.is_some()
    }

    /// Whether an existing mapping got a new value.
    #[must_use]
    pub fn was_replaced(&self) -> bool {
        self.was_added() && self.was_removed()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for MapElementaryChange<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.removed, &self.added) {
            (Some(old), Some(new)) => write!(f, "{:?}: replaced {old:?} by {new:?}", self.key),
            (None, Some(new)) => write!(f, "{:?}: added {new:?}", self.key),
            (Some(old), None) => write!(f, "{:?}: removed {old:?}", self.key),
            (None, None) => write!(f, "{:?}: unchanged", self.key),
        }
    }
}

impl<K, V> ContainerKind for MapKind<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone + fmt::Debug,
{
    type Contents = AHashMap<K, V>;
    type SubChange = MapElementaryChange<K, V>;

    fn revert(contents: &mut AHashMap<K, V>, sub_change: &MapElementaryChange<K, V>) -> Result<()> {
        let present = contents.contains_key(&sub_change.key);
        if present != sub_change.was_added() {
            return Err(CollectionError::ReplayMismatch {
                reason: "map key presence does not match the change",
            });
        }
        match &sub_change.removed {
            Some(old) => {
                contents.insert(sub_change.key.clone(), old.clone());
            }
            None => {
                contents.remove(&sub_change.key);
            }
        }
        Ok(())
    }
}

impl<K, V> AtomicChange<MapKind<K, V>>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone + fmt::Debug,
{
    /// Key of the current sub-change.
    pub fn key(&self) -> Result<&K> {
        Ok(self.current()?.key())
    }

    /// Value the current key had before.
    pub fn value_removed(&self) -> Result<Option<&V>> {
        Ok(self.current()?.value_removed())
    }

    /// Value the current key has now.
    pub fn value_added(&self) -> Result<Option<&V>> {
        Ok(self.current()?.value_added())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_op_is_unrepresentable() {
        assert!(MapElementaryChange::<u8, u8>::new(1, None, None).is_none());
        let replaced = MapElementaryChange::new(1, Some('a'), Some('b')).unwrap();
        assert!(replaced.was_replaced());
        assert_eq!(replaced.to_string(), "1: replaced 'a' by 'b'");
    }

    #[test]
    fn revert_restores_each_shape() {
        let mut contents: AHashMap<u8, char> = [(1, 'b'), (2, 'n')].into_iter().collect();
        let replaced = MapElementaryChange::new(1, Some('a'), Some('b')).unwrap();
        let added = MapElementaryChange::new(2, None, Some('n')).unwrap();
        let removed = MapElementaryChange::new(3, Some('r'), None).unwrap();

        for sub in [&removed, &added, &replaced] {
            MapKind::<u8, char>::revert(&mut contents, sub).unwrap();
        }

        let expected: AHashMap<u8, char> = [(1, 'a'), (3, 'r')].into_iter().collect();
        assert_eq!(contents, expected);
    }

    #[test]
    fn revert_rejects_absent_added_key() {
        let mut contents: AHashMap<u8, char> = AHashMap::new();
        let added = MapElementaryChange::new(2, None, Some('n')).unwrap();
        assert!(MapKind::<u8, char>::revert(&mut contents, &added).is_err());
    }

    #[test]
    fn cursor_accessors() {
        let change: MapChange<u8, char> = AtomicChange::new(
            AHashMap::new(),
            vec![MapElementaryChange::new(5, None, Some('v')).unwrap()],
        );
        change.reset();
        assert!(change.key().is_err());
        assert!(change.next());
        assert_eq!(*change.key().unwrap(), 5);
        assert_eq!(change.value_added().unwrap(), Some(&'v'));
        assert_eq!(change.value_removed().unwrap(), None);
    }
}
