#![forbid(unsafe_code)]

//! Elementary changes of multisets.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use super::{AtomicChange, ContainerKind};
use crate::backing::HashMultiset;
use crate::error::{CollectionError, Result};

/// Container kind of [`ObservableMultiset`](crate::ObservableMultiset).
pub struct MultisetKind<E>(PhantomData<fn() -> E>);

/// Atomic change delivered by an observable multiset.
pub type MultisetChange<E> = AtomicChange<MultisetKind<E>>;

/// The count of one element changed.
///
/// Exactly one of `remove_count`/`add_count` is non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisetElementaryChange<E> {
    element: E,
    remove_count: usize,
    add_count: usize,
}

impl<E> MultisetElementaryChange<E> {
    /// `None` when both counts are zero.
    pub(crate) fn new(element: E, remove_count: usize, add_count: usize) -> Option<Self> {
        (remove_count > 0 || add_count > 0).then_some(Self {
            element,
            remove_count,
            add_count,
        })
    }

    /// Element whose count changed.
    #[must_use]
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Occurrences removed.
    #[must_use]
    pub fn remove_count(&self) -> usize {
        self.remove_count
    }

    /// Occurrences added.
    #[must_use]
    pub fn add_count(&self) -> usize {
        self.add_count
    }
}

impl<E: fmt::Debug> fmt::Display for MultisetElementaryChange<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.add_count > 0 {
            write!(f, "added {} x {:?}", self.add_count, self.element)?;
        }
        if self.remove_count > 0 {
            if self.add_count > 0 {
                f.write_str(", ")?;
            }
            write!(f, "removed {} x {:?}", self.remove_count, self.element)?;
        }
        Ok(())
    }
}

impl<E: Eq + Hash + Clone + fmt::Debug> ContainerKind for MultisetKind<E> {
    type Contents = HashMultiset<E>;
    type SubChange = MultisetElementaryChange<E>;

    fn revert(
        contents: &mut HashMultiset<E>,
        sub_change: &MultisetElementaryChange<E>,
    ) -> Result<()> {
        let count = contents.count(&sub_change.element);
        if count < sub_change.add_count {
            return Err(CollectionError::ReplayMismatch {
                reason: "fewer occurrences than the change added",
            });
        }
        contents.set_count(
            sub_change.element.clone(),
            count - sub_change.add_count + sub_change.remove_count,
        );
        Ok(())
    }
}

impl<E: Eq + Hash + Clone + fmt::Debug> AtomicChange<MultisetKind<E>> {
    /// Element of the current sub-change.
    pub fn element(&self) -> Result<&E> {
        Ok(self.current()?.element())
    }

    /// Occurrences removed by the current sub-change.
    pub fn remove_count(&self) -> Result<usize> {
        Ok(self.current()?.remove_count())
    }

    /// Occurrences added by the current sub-change.
    pub fn add_count(&self) -> Result<usize> {
        Ok(self.current()?.add_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_counts_are_unrepresentable() {
        assert!(MultisetElementaryChange::new('x', 0, 0).is_none());
        let c = MultisetElementaryChange::new('x', 0, 3).unwrap();
        assert_eq!((c.remove_count(), c.add_count()), (0, 3));
        assert_eq!(c.to_string(), "added 3 x 'x'");
    }

    #[test]
    fn revert_adjusts_count() {
        let mut bag: HashMultiset<char> = "xxxxx".chars().collect();
        let added = MultisetElementaryChange::new('x', 0, 3).unwrap();
        MultisetKind::<char>::revert(&mut bag, &added).unwrap();
        assert_eq!(bag.count(&'x'), 2);

        let removed = MultisetElementaryChange::new('y', 2, 0).unwrap();
        MultisetKind::<char>::revert(&mut bag, &removed).unwrap();
        assert_eq!(bag.count(&'y'), 2);
        assert_eq!(bag.len(), 4);
    }

    #[test]
    fn revert_rejects_missing_occurrences() {
        let mut bag: HashMultiset<char> = HashMultiset::new();
        let added = MultisetElementaryChange::new('x', 0, 1).unwrap();
        assert!(MultisetKind::<char>::revert(&mut bag, &added).is_err());
    }

    #[test]
    fn cursor_accessors() {
        let change: MultisetChange<char> = AtomicChange::new(
            HashMultiset::new(),
            vec![MultisetElementaryChange::new('q', 2, 0).unwrap()],
        );
        assert!(change.remove_count().is_err());
        change.next();
        assert_eq!(*change.element().unwrap(), 'q');
        assert_eq!(change.remove_count().unwrap(), 2);
        assert_eq!(change.add_count().unwrap(), 0);
    }
}
