#![forbid(unsafe_code)]

//! Elementary changes of set multimaps.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use ahash::AHashSet;

use super::{AtomicChange, ContainerKind};
use crate::backing::HashSetMultimap;
use crate::error::{CollectionError, Result};

/// Container kind of [`ObservableSetMultimap`](crate::ObservableSetMultimap).
pub struct SetMultimapKind<K, V>(PhantomData<fn() -> (K, V)>);

/// Atomic change delivered by an observable set multimap.
pub type SetMultimapChange<K, V> = AtomicChange<SetMultimapKind<K, V>>;

/// The value set of one key changed.
///
/// `removed_values` and `added_values` are disjoint and not both empty.
#[derive(Debug, Clone)]
pub struct SetMultimapElementaryChange<K, V> {
    key: K,
    removed_values: AHashSet<V>,
    added_values: AHashSet<V>,
}

impl<K: PartialEq, V: Eq + Hash> PartialEq for SetMultimapElementaryChange<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.removed_values == other.removed_values
            && self.added_values == other.added_values
    }
}

impl<K: Eq, V: Eq + Hash> Eq for SetMultimapElementaryChange<K, V> {}

impl<K, V> SetMultimapElementaryChange<K, V> {
    /// `None` when both sets are empty.
    pub(crate) fn new(
        key: K,
        removed_values: AHashSet<V>,
        added_values: AHashSet<V>,
    ) -> Option<Self> {
        (!removed_values.is_empty() || !added_values.is_empty()).then_some(Self {
            key,
            removed_values,
            added_values,
        })
    }

    /// Key whose values changed.
    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Values the key lost.
    #[must_use]
    pub fn removed_values(&self) -> &AHashSet<V> {
        &self.removed_values
    }

    /// Values the key gained.
    #[must_use]
    pub fn added_values(&self) -> &AHashSet<V> {
        &self.added_values
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for SetMultimapElementaryChange<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:", self.key)?;
        if !self.added_values.is_empty() {
            write!(f, " added {:?}", self.added_values)?;
        }
        if !self.removed_values.is_empty() {
            write!(f, " removed {:?}", self.removed_values)?;
        }
        Ok(())
    }
}

impl<K, V> ContainerKind for SetMultimapKind<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Eq + Hash + Clone + fmt::Debug,
{
    type Contents = HashSetMultimap<K, V>;
    type SubChange = SetMultimapElementaryChange<K, V>;

    fn revert(
        contents: &mut HashSetMultimap<K, V>,
        sub_change: &SetMultimapElementaryChange<K, V>,
    ) -> Result<()> {
        for value in &sub_change.added_values {
            if !contents.remove(&sub_change.key, value) {
                return Err(CollectionError::ReplayMismatch {
                    reason: "added value missing from the multimap",
                });
            }
        }
        for value in &sub_change.removed_values {
            if !contents.put(sub_change.key.clone(), value.clone()) {
                return Err(CollectionError::ReplayMismatch {
                    reason: "removed value still present in the multimap",
                });
            }
        }
        Ok(())
    }
}

impl<K, V> AtomicChange<SetMultimapKind<K, V>>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Eq + Hash + Clone + fmt::Debug,
{
    /// Key of the current sub-change.
    pub fn key(&self) -> Result<&K> {
        Ok(self.current()?.key())
    }

    /// Values removed from the current key.
    pub fn removed_values(&self) -> Result<&AHashSet<V>> {
        Ok(self.current()?.removed_values())
    }

    /// Values added to the current key.
    pub fn added_values(&self) -> Result<&AHashSet<V>> {
        Ok(self.current()?.added_values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[u8]) -> AHashSet<u8> {
        values.iter().copied().collect()
    }

    #[test]
    fn empty_delta_is_unrepresentable() {
        assert!(SetMultimapElementaryChange::<u8, u8>::new(1, set(&[]), set(&[])).is_none());
    }

    #[test]
    fn equality_compares_key_and_value_sets() {
        let a = SetMultimapElementaryChange::new(1, set(&[2, 9]), set(&[3])).unwrap();
        let b = SetMultimapElementaryChange::new(1, set(&[9, 2]), set(&[3])).unwrap();
        let other_key = SetMultimapElementaryChange::new(2, set(&[2, 9]), set(&[3])).unwrap();
        let other_values = SetMultimapElementaryChange::new(1, set(&[2]), set(&[3])).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, other_key);
        assert_ne!(a, other_values);
    }

    #[test]
    fn revert_swaps_value_sets() {
        let mut contents: HashSetMultimap<u8, u8> = [(1, 3), (1, 4)].into_iter().collect();
        let sub = SetMultimapElementaryChange::new(1, set(&[1, 2]), set(&[3, 4])).unwrap();
        SetMultimapKind::<u8, u8>::revert(&mut contents, &sub).unwrap();
        assert_eq!(contents.get(&1), Some(&set(&[1, 2])));
        assert_eq!(contents.len(), 2);
    }

    #[test]
    fn revert_detects_missing_value() {
        let mut contents: HashSetMultimap<u8, u8> = HashSetMultimap::new();
        let sub = SetMultimapElementaryChange::new(1, set(&[]), set(&[3])).unwrap();
        assert!(SetMultimapKind::<u8, u8>::revert(&mut contents, &sub).is_err());
    }

    #[test]
    fn cursor_accessors() {
        let change: SetMultimapChange<u8, u8> = AtomicChange::new(
            HashSetMultimap::new(),
            vec![SetMultimapElementaryChange::new(7, set(&[]), set(&[1])).unwrap()],
        );
        assert!(change.key().is_err());
        assert!(change.next());
        assert_eq!(*change.key().unwrap(), 7);
        assert!(change.removed_values().unwrap().is_empty());
        assert_eq!(change.added_values().unwrap(), &set(&[1]));
        assert_eq!(change.to_string(), "{ 7: added {1} }");
    }
}
