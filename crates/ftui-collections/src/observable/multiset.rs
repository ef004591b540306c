#![forbid(unsafe_code)]

//! Observable multisets.

use std::fmt;
use std::hash::Hash;

use ahash::AHashSet;

use super::{ObservableContainer, ObservableKind};
use crate::backing::HashMultiset;
use crate::change::{MultisetElementaryChange, MultisetKind};
use crate::config::NotifyConfig;
use crate::diff;

impl<E: Eq + Hash + Clone + fmt::Debug + 'static> ObservableKind for MultisetKind<E> {
    type Equality = ();
}

/// Observable [`HashMultiset`].
pub type ObservableMultiset<E> = ObservableContainer<MultisetKind<E>>;

impl<E: Eq + Hash + Clone + fmt::Debug + 'static> ObservableMultiset<E> {
    /// Empty multiset.
    #[must_use]
    pub fn new() -> Self {
        Self::from_multiset(HashMultiset::new())
    }

    #[must_use]
    pub fn from_multiset(elements: HashMultiset<E>) -> Self {
        Self::with_config(elements, NotifyConfig::default())
    }

    #[must_use]
    pub fn with_config(elements: HashMultiset<E>, config: NotifyConfig) -> Self {
        Self::from_parts(elements, (), config)
    }

    /// Occurrences of `element`.
    #[must_use]
    pub fn count(&self, element: &E) -> usize {
        self.with(|bag| bag.count(element))
    }

    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.with(|bag| bag.contains(element))
    }

    /// Total occurrences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.with(HashMultiset::len)
    }

    /// Distinct elements.
    #[must_use]
    pub fn distinct_len(&self) -> usize {
        self.with(HashMultiset::distinct_len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.with(HashMultiset::is_empty)
    }

    #[must_use]
    pub fn to_multiset(&self) -> HashMultiset<E> {
        self.snapshot()
    }

    /// Add one occurrence of `element`.
    pub fn add(&self, element: E) {
        self.add_count(element, 1);
    }

    /// Add `occurrences` of `element`, returning the previous count.
    pub fn add_count(&self, element: E, occurrences: usize) -> usize {
        self.set_count_with(element, |count| count.saturating_add(occurrences))
    }

    /// Remove one occurrence of `element`. Returns whether one was present.
    pub fn remove(&self, element: &E) -> bool {
        self.remove_count(element, 1) > 0
    }

    /// Remove up to `occurrences` of `element`, returning the previous
    /// count.
    pub fn remove_count(&self, element: &E, occurrences: usize) -> usize {
        self.mutate(|bag, ()| {
            let previous = bag.remove(element, occurrences);
            let after = bag.count(element);
            let change = diff::multiset::count_delta(element.clone(), previous, after);
            (previous, change.into_iter().collect())
        })
    }

    /// Set the count of `element`, returning the previous count.
    pub fn set_count(&self, element: E, count: usize) -> usize {
        self.set_count_with(element, |_| count)
    }

    /// Set the count of `element` to `new_count` if it currently is
    /// `expected`. Returns whether the count was updated.
    pub fn set_count_if(&self, element: E, expected: usize, new_count: usize) -> bool {
        self.mutate(|bag, ()| {
            if bag.count(&element) != expected {
                return (false, Vec::new());
            }
            bag.set_count(element.clone(), new_count);
            let change = diff::multiset::count_delta(element, expected, new_count);
            (true, change.into_iter().collect())
        })
    }

    /// Add one occurrence per item of `iter`. Returns whether anything was
    /// added.
    pub fn add_all(&self, iter: impl IntoIterator<Item = E>) -> bool {
        let tally = diff::multiset::tally(iter);
        self.mutate(|bag, ()| {
            let changes: Vec<_> = tally
                .into_iter()
                .filter_map(|(element, occurrences)| {
                    let previous = bag.add(element.clone(), occurrences);
                    let current = bag.count(&element);
                    diff::multiset::count_delta(element, previous, current)
                })
                .collect();
            (!changes.is_empty(), changes)
        })
    }

    /// Remove every occurrence of each element of `targets`. Returns whether
    /// anything was removed.
    pub fn remove_all(&self, targets: &[E]) -> bool {
        let distinct: AHashSet<&E> = targets.iter().collect();
        self.mutate(|bag, ()| {
            let changes: Vec<_> = distinct
                .into_iter()
                .filter_map(|element| {
                    let previous = bag.set_count(element.clone(), 0);
                    diff::multiset::count_delta(element.clone(), previous, 0)
                })
                .collect();
            (!changes.is_empty(), changes)
        })
    }

    /// Remove every occurrence of each element not in `targets`. Returns
    /// whether anything was removed.
    pub fn retain_all(&self, targets: &[E]) -> bool {
        let keep: AHashSet<&E> = targets.iter().collect();
        self.mutate(|bag, ()| {
            let doomed: Vec<(E, usize)> = bag
                .iter()
                .filter(|(element, _)| !keep.contains(element))
                .map(|(element, count)| (element.clone(), count))
                .collect();
            let changes: Vec<_> = doomed
                .into_iter()
                .filter_map(|(element, count)| {
                    bag.set_count(element.clone(), 0);
                    diff::multiset::count_delta(element, count, 0)
                })
                .collect();
            (!changes.is_empty(), changes)
        })
    }

    /// Replace the whole contents. Returns whether any count changed.
    pub fn replace_all(&self, contents: HashMultiset<E>) -> bool {
        self.mutate(|bag, ()| {
            let changes = diff::multiset::replacement(bag, &contents);
            if !changes.is_empty() {
                *bag = contents;
            }
            (!changes.is_empty(), changes)
        })
    }

    /// Remove every occurrence of every element.
    pub fn clear(&self) {
        self.mutate(|bag, ()| {
            let changes: Vec<MultisetElementaryChange<E>> = bag
                .iter()
                .filter_map(|(element, count)| {
                    diff::multiset::count_delta(element.clone(), count, 0)
                })
                .collect();
            bag.clear();
            ((), changes)
        });
    }

    fn set_count_with(&self, element: E, target: impl FnOnce(usize) -> usize) -> usize {
        self.mutate(|bag, ()| {
            let previous = bag.count(&element);
            let after = target(previous);
            bag.set_count(element.clone(), after);
            let change = diff::multiset::count_delta(element, previous, after);
            (previous, change.into_iter().collect())
        })
    }
}

impl<E: Eq + Hash + Clone + fmt::Debug + 'static> Default for ObservableMultiset<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Eq + Hash + Clone + fmt::Debug + 'static> FromIterator<E> for ObservableMultiset<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::from_multiset(iter.into_iter().collect())
    }
}
