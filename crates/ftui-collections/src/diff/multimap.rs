#![forbid(unsafe_code)]

//! Set-multimap differs.

use std::hash::Hash;

use ahash::AHashSet;

use crate::backing::HashSetMultimap;
use crate::change::SetMultimapElementaryChange;

/// Change of the value set of `key` from `before` to `after`.
#[must_use]
pub fn value_delta<K, V: Eq + Hash + Clone>(
    key: K,
    before: &AHashSet<V>,
    after: &AHashSet<V>,
) -> Option<SetMultimapElementaryChange<K, V>> {
    let removed = before.difference(after).cloned().collect();
    let added = after.difference(before).cloned().collect();
    SetMultimapElementaryChange::new(key, removed, added)
}

/// One sub-change per key whose value set differs between `before` and
/// `after`.
#[must_use]
pub fn replacement<K, V>(
    before: &HashSetMultimap<K, V>,
    after: &HashSetMultimap<K, V>,
) -> Vec<SetMultimapElementaryChange<K, V>>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    let empty = AHashSet::new();
    let mut changes: Vec<_> = before
        .iter()
        .filter_map(|(key, values)| {
            value_delta(key.clone(), values, after.get(key).unwrap_or(&empty))
        })
        .collect();
    changes.extend(
        after
            .iter()
            .filter(|(key, _)| !before.contains_key(key))
            .filter_map(|(key, values)| value_delta(key.clone(), &empty, values)),
    );
    changes
}

/// Removal of every value of every key.
#[must_use]
pub fn cleared<K, V>(before: &HashSetMultimap<K, V>) -> Vec<SetMultimapElementaryChange<K, V>>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    before
        .iter()
        .filter_map(|(key, values)| {
            SetMultimapElementaryChange::new(key.clone(), values.clone(), AHashSet::new())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[u8]) -> AHashSet<u8> {
        values.iter().copied().collect()
    }

    #[test]
    fn value_delta_is_set_difference() {
        let change = value_delta('k', &set(&[1, 2, 3]), &set(&[3, 4])).unwrap();
        assert_eq!(change.removed_values(), &set(&[1, 2]));
        assert_eq!(change.added_values(), &set(&[4]));
        assert!(value_delta('k', &set(&[1]), &set(&[1])).is_none());
    }

    #[test]
    fn replacement_touches_changed_keys_only() {
        let before: HashSetMultimap<char, u8> =
            [('a', 1), ('b', 2), ('c', 3)].into_iter().collect();
        let after: HashSetMultimap<char, u8> =
            [('a', 1), ('b', 5), ('d', 4)].into_iter().collect();
        let mut keys: Vec<char> = replacement(&before, &after)
            .iter()
            .map(|c| *c.key())
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!['b', 'c', 'd']);
    }

    #[test]
    fn cleared_removes_full_sets() {
        let before: HashSetMultimap<char, u8> = [('a', 1), ('a', 2)].into_iter().collect();
        let changes = cleared(&before);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].removed_values(), &set(&[1, 2]));
        assert!(changes[0].added_values().is_empty());
    }
}
