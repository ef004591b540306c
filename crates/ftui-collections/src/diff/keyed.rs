#![forbid(unsafe_code)]

//! Set and map differs.

use std::hash::Hash;

use ahash::{AHashMap, AHashSet};

use crate::change::{MapElementaryChange, SetElementaryChange};

/// Membership changes turning `before` into `after`: removals first.
#[must_use]
pub fn set_replacement<E: Eq + Hash + Clone>(
    before: &AHashSet<E>,
    after: &AHashSet<E>,
) -> Vec<SetElementaryChange<E>> {
    before
        .difference(after)
        .cloned()
        .map(SetElementaryChange::Removed)
        .chain(
            after
                .difference(before)
                .cloned()
                .map(SetElementaryChange::Added),
        )
        .collect()
}

/// Change of the mapping of `key`. A value equal under `eq` to the previous
/// one is no change.
#[must_use]
pub fn map_entry<K, V: Clone>(
    key: K,
    before: Option<&V>,
    after: Option<&V>,
    eq: impl Fn(&V, &V) -> bool,
) -> Option<MapElementaryChange<K, V>> {
    match (before, after) {
        (Some(old), Some(new)) if eq(old, new) => None,
        _ => MapElementaryChange::new(key, before.cloned(), after.cloned()),
    }
}

/// One sub-change per key whose mapping differs between `before` and
/// `after`.
#[must_use]
pub fn map_replacement<K, V>(
    before: &AHashMap<K, V>,
    after: &AHashMap<K, V>,
    eq: impl Fn(&V, &V) -> bool,
) -> Vec<MapElementaryChange<K, V>>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    let mut changes: Vec<_> = before
        .iter()
        .filter_map(|(key, old)| map_entry(key.clone(), Some(old), after.get(key), &eq))
        .collect();
    changes.extend(
        after
            .iter()
            .filter(|(key, _)| !before.contains_key(*key))
            .filter_map(|(key, new)| map_entry(key.clone(), None, Some(new), &eq)),
    );
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replacement_orders_removals_first() {
        let before: AHashSet<u8> = [1, 2].into_iter().collect();
        let after: AHashSet<u8> = [2, 3].into_iter().collect();
        let changes = set_replacement(&before, &after);
        assert_eq!(
            changes,
            vec![
                SetElementaryChange::Removed(1),
                SetElementaryChange::Added(3),
            ]
        );
    }

    #[test]
    fn map_entry_shapes() {
        let eq = |a: &char, b: &char| a == b;
        assert!(map_entry(1, Some(&'a'), Some(&'a'), eq).is_none());
        assert!(map_entry::<u8, char>(1, None, None, eq).is_none());
        assert!(map_entry(1, None, Some(&'a'), eq).unwrap().was_added());
        assert!(map_entry(1, Some(&'a'), None, eq).unwrap().was_removed());
        assert!(
            map_entry(1, Some(&'a'), Some(&'b'), eq)
                .unwrap()
                .was_replaced()
        );
    }

    #[test]
    fn map_replacement_skips_equal_values() {
        let before: AHashMap<u8, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
        let after: AHashMap<u8, char> = [(1, 'a'), (2, 'x'), (4, 'd')].into_iter().collect();
        let mut keys: Vec<u8> = map_replacement(&before, &after, |a, b| a == b)
            .iter()
            .map(|c| *c.key())
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![2, 3, 4]);
    }
}
