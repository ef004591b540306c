#![forbid(unsafe_code)]

//! Hash-backed multiset (bag).

use std::fmt;
use std::hash::Hash;

use ahash::AHashMap;

/// An unordered collection that counts occurrences of equal elements.
///
/// # Invariants
///
/// 1. No element is stored with a count of zero.
/// 2. `len()` equals the sum of all counts.
pub struct HashMultiset<E> {
    counts: AHashMap<E, usize>,
    len: usize,
}

impl<E: Eq + Hash> HashMultiset<E> {
    /// Create an empty multiset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: AHashMap::new(),
            len: 0,
        }
    }

    /// Occurrences of `element` (zero when absent).
    #[must_use]
    pub fn count(&self, element: &E) -> usize {
        self.counts.get(element).copied().unwrap_or(0)
    }

    /// Whether `element` occurs at least once.
    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.counts.contains_key(element)
    }

    /// Total number of occurrences, saturating at `usize::MAX`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of distinct elements.
    #[must_use]
    pub fn distinct_len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the multiset is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add `occurrences` of `element`. Returns the previous count.
    pub fn add(&mut self, element: E, occurrences: usize) -> usize {
        if occurrences == 0 {
            return self.count(&element);
        }
        let slot = self.counts.entry(element).or_insert(0);
        let previous = *slot;
        *slot = slot.saturating_add(occurrences);
        self.len = self.len.saturating_add(occurrences);
        previous
    }

    /// Remove up to `occurrences` of `element`. Returns the previous count.
    pub fn remove(&mut self, element: &E, occurrences: usize) -> usize {
        let Some(slot) = self.counts.get_mut(element) else {
            return 0;
        };
        let previous = *slot;
        let removed = occurrences.min(previous);
        *slot -= removed;
        self.len = self.len.saturating_sub(removed);
        if *slot == 0 {
            self.counts.remove(element);
        }
        previous
    }

    /// Set the count of `element`. Returns the previous count.
    pub fn set_count(&mut self, element: E, count: usize) -> usize {
        let previous = if count == 0 {
            self.counts.remove(&element).unwrap_or(0)
        } else {
            self.counts.insert(element, count).unwrap_or(0)
        };
        self.len = self.len.saturating_sub(previous).saturating_add(count);
        previous
    }

    /// Distinct elements with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (&E, usize)> {
        self.counts.iter().map(|(e, &n)| (e, n))
    }

    /// Distinct elements.
    pub fn elements(&self) -> impl Iterator<Item = &E> {
        self.counts.keys()
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.counts.clear();
        self.len = 0;
    }
}

impl<E: Eq + Hash> Default for HashMultiset<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Clone for HashMultiset<E> {
    fn clone(&self) -> Self {
        Self {
            counts: self.counts.clone(),
            len: self.len,
        }
    }
}

impl<E: Eq + Hash> PartialEq for HashMultiset<E> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self.counts.len() == other.counts.len()
            && self.iter().all(|(e, n)| other.count(e) == n)
    }
}

impl<E: Eq + Hash> Eq for HashMultiset<E> {}

impl<E: fmt::Debug> fmt::Debug for HashMultiset<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.counts.iter()).finish()
    }
}

impl<E: Eq + Hash> Extend<E> for HashMultiset<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for element in iter {
            self.add(element, 1);
        }
    }
}

impl<E: Eq + Hash> FromIterator<E> for HashMultiset<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut multiset = Self::new();
        multiset.extend(iter);
        multiset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_occurrences() {
        let bag: HashMultiset<&str> = ["a", "b", "a", "a"].into_iter().collect();
        assert_eq!(bag.count(&"a"), 3);
        assert_eq!(bag.count(&"b"), 1);
        assert_eq!(bag.count(&"z"), 0);
        assert_eq!(bag.len(), 4);
        assert_eq!(bag.distinct_len(), 2);
    }

    #[test]
    fn remove_clips_to_available() {
        let mut bag: HashMultiset<char> = "aab".chars().collect();
        assert_eq!(bag.remove(&'a', 5), 2);
        assert!(!bag.contains(&'a'));
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.remove(&'q', 1), 0);
    }

    #[test]
    fn set_count_tracks_len() {
        let mut bag = HashMultiset::new();
        assert_eq!(bag.set_count('x', 4), 0);
        assert_eq!(bag.len(), 4);
        assert_eq!(bag.set_count('x', 1), 4);
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.set_count('x', 0), 1);
        assert!(bag.is_empty());
        assert_eq!(bag.distinct_len(), 0);
    }

    #[test]
    fn add_zero_is_noop() {
        let mut bag = HashMultiset::new();
        assert_eq!(bag.add(1, 0), 0);
        assert!(bag.is_empty());
        assert!(!bag.contains(&1));
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a: HashMultiset<i32> = [1, 2, 2, 3].into_iter().collect();
        let b: HashMultiset<i32> = [2, 3, 2, 1].into_iter().collect();
        let c: HashMultiset<i32> = [1, 2, 3].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn huge_counts_saturate_the_total() {
        let mut bag = HashMultiset::new();
        assert_eq!(bag.set_count('a', usize::MAX), 0);
        assert_eq!(bag.add('b', 1), 0);
        assert_eq!(bag.len(), usize::MAX);
        assert_eq!(bag.add('a', 1), usize::MAX);
        assert_eq!(bag.count(&'a'), usize::MAX);
        assert_eq!(bag.set_count('b', usize::MAX), 1);
        assert_eq!(bag.len(), usize::MAX);
        assert_eq!(bag.remove(&'a', usize::MAX), usize::MAX);
        assert_eq!(bag.count(&'b'), usize::MAX);
    }
}
