#![forbid(unsafe_code)]

//! Multiset differs.

use std::hash::Hash;

use ahash::AHashMap;

use crate::backing::HashMultiset;
use crate::change::MultisetElementaryChange;

/// Change of `element` from `before` to `after` occurrences.
#[must_use]
pub fn count_delta<E>(
    element: E,
    before: usize,
    after: usize,
) -> Option<MultisetElementaryChange<E>> {
    if after >= before {
        MultisetElementaryChange::new(element, 0, after - before)
    } else {
        MultisetElementaryChange::new(element, before - after, 0)
    }
}

/// Occurrences per distinct element of `items`.
pub fn tally<E: Eq + Hash>(items: impl IntoIterator<Item = E>) -> AHashMap<E, usize> {
    let mut counts = AHashMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

/// One sub-change per element whose count differs between `before` and
/// `after`.
#[must_use]
pub fn replacement<E: Eq + Hash + Clone>(
    before: &HashMultiset<E>,
    after: &HashMultiset<E>,
) -> Vec<MultisetElementaryChange<E>> {
    let mut changes: Vec<_> = before
        .iter()
        .filter_map(|(element, count)| count_delta(element.clone(), count, after.count(element)))
        .collect();
    changes.extend(
        after
            .iter()
            .filter(|(element, _)| !before.contains(element))
            .filter_map(|(element, count)| count_delta(element.clone(), 0, count)),
    );
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_direction() {
        assert!(count_delta('x', 2, 2).is_none());
        let up = count_delta('x', 2, 5).unwrap();
        assert_eq!((up.remove_count(), up.add_count()), (0, 3));
        let down = count_delta('x', 2, 0).unwrap();
        assert_eq!((down.remove_count(), down.add_count()), (2, 0));
    }

    #[test]
    fn tally_counts_repeats() {
        let counts = tally("abacab".chars());
        assert_eq!(counts[&'a'], 3);
        assert_eq!(counts[&'b'], 2);
        assert_eq!(counts[&'c'], 1);
    }

    #[test]
    fn replacement_covers_both_directions() {
        let before: HashMultiset<char> = "aab".chars().collect();
        let after: HashMultiset<char> = "abbc".chars().collect();
        let mut changes: Vec<_> = replacement(&before, &after)
            .into_iter()
            .map(|c| (*c.element(), c.remove_count(), c.add_count()))
            .collect();
        changes.sort_unstable();
        assert_eq!(changes, vec![('a', 1, 0), ('b', 0, 1), ('c', 0, 1)]);
    }

    #[test]
    fn replacement_of_equal_is_empty() {
        let bag: HashMultiset<u8> = [1, 1, 2].into_iter().collect();
        assert!(replacement(&bag, &bag.clone()).is_empty());
    }
}
