#![forbid(unsafe_code)]

//! Elementary changes of ordered sequences.
//!
//! Indices follow one convention throughout: a sub-change's indices refer to
//! the list state after every earlier sub-change of the same atomic change
//! *and this one* were applied. A pure removal therefore has `from == to`,
//! the position where the removed run used to start.

use std::fmt;
use std::marker::PhantomData;

use super::{AtomicChange, ContainerKind};
use crate::error::{CollectionError, Result};

/// Container kind of [`ObservableList`](crate::ObservableList).
pub struct ListKind<E>(PhantomData<fn() -> E>);

/// Atomic change delivered by an observable list.
pub type ListChange<E> = AtomicChange<ListKind<E>>;

/// Shape of a list sub-change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChangeKind {
    /// Elements inserted.
    Added,
    /// Elements removed.
    Removed,
    /// Elements replaced by others.
    Replaced,
    /// Elements reordered.
    Permuted,
}

/// One elementary change of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListElementaryChange<E> {
    /// `added` now occupies `from..from + added.len()`.
    Added { from: usize, added: Vec<E> },
    /// `removed` used to start at `at`.
    Removed { at: usize, removed: Vec<E> },
    /// `removed` was replaced by `added`, which now occupies
    /// `from..from + added.len()`.
    Replaced {
        from: usize,
        removed: Vec<E>,
        added: Vec<E>,
    },
    /// The span `from..from + permutation.len()` was reordered; the element
    /// formerly at `from + i` is now at `permutation[i]`.
    Permuted {
        from: usize,
        permutation: Vec<usize>,
    },
}

impl<E> ListElementaryChange<E> {
    /// Shape of this sub-change.
    #[must_use]
    pub fn kind(&self) -> ListChangeKind {
        match self {
            Self::Added { .. } => ListChangeKind::Added,
            Self::Removed { .. } => ListChangeKind::Removed,
            Self::Replaced { .. } => ListChangeKind::Replaced,
            Self::Permuted { .. } => ListChangeKind::Permuted,
        }
    }

    /// Start of the affected range in the post-change state.
    #[must_use]
    pub fn from(&self) -> usize {
        match self {
            Self::Added { from, .. }
            | Self::Replaced { from, .. }
            | Self::Permuted { from, .. } => *from,
            Self::Removed { at, .. } => *at,
        }
    }

    /// End (exclusive) of the affected range in the post-change state.
    #[must_use]
    pub fn to(&self) -> usize {
        match self {
            Self::Added { from, added } | Self::Replaced { from, added, .. } => from + added.len(),
            Self::Removed { at, .. } => *at,
            Self::Permuted { from, permutation } => from + permutation.len(),
        }
    }

    /// Elements removed, in their original order. Empty unless removed or
    /// replaced.
    #[must_use]
    pub fn removed(&self) -> &[E] {
        match self {
            Self::Removed { removed, .. } | Self::Replaced { removed, .. } => removed,
            Self::Added { .. } | Self::Permuted { .. } => &[],
        }
    }

    /// Elements added, in list order. Empty unless added or replaced.
    #[must_use]
    pub fn added(&self) -> &[E] {
        match self {
            Self::Added { added, .. } | Self::Replaced { added, .. } => added,
            Self::Removed { .. } | Self::Permuted { .. } => &[],
        }
    }

    /// New index of the element formerly at `old_index`. `None` when this
    /// is not a permutation or `old_index` is outside the permuted span.
    #[must_use]
    pub fn permutation(&self, old_index: usize) -> Option<usize> {
        match self {
            Self::Permuted { from, permutation } => old_index
                .checked_sub(*from)
                .and_then(|offset| permutation.get(offset))
                .copied(),
            _ => None,
        }
    }

    /// Whether elements were added (true for replacements too).
    #[must_use]
    pub fn was_added(&self) -> bool {
        matches!(self, Self::Added { .. } | Self::Replaced { .. })
    }

    /// Whether elements were removed (true for replacements too).
    #[must_use]
    pub fn was_removed(&self) -> bool {
        matches!(self, Self::Removed { .. } | Self::Replaced { .. })
    }

    /// Whether elements were replaced.
    #[must_use]
    pub fn was_replaced(&self) -> bool {
        matches!(self, Self::Replaced { .. })
    }

    /// Whether elements were reordered.
    #[must_use]
    pub fn was_permuted(&self) -> bool {
        matches!(self, Self::Permuted { .. })
    }
}

impl<E: fmt::Debug> fmt::Display for ListElementaryChange<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { added, .. } => {
                write!(f, "added {:?} at {}..{}", added, self.from(), self.to())
            }
            Self::Removed { at, removed } => write!(f, "removed {removed:?} at {at}"),
            Self::Replaced { removed, added, .. } => write!(
                f,
                "replaced {:?} by {:?} at {}..{}",
                removed,
                added,
                self.from(),
                self.to()
            ),
            Self::Permuted { permutation, .. } => write!(
                f,
                "permuted {}..{} by {:?}",
                self.from(),
                self.to(),
                permutation
            ),
        }
    }
}

impl<E: Clone + fmt::Debug> ContainerKind for ListKind<E> {
    type Contents = Vec<E>;
    type SubChange = ListElementaryChange<E>;

    fn revert(contents: &mut Vec<E>, sub_change: &ListElementaryChange<E>) -> Result<()> {
        let len = contents.len();
        match sub_change {
            ListElementaryChange::Added { from, added } => {
                let to = from + added.len();
                CollectionError::check_range(*from, to, len)?;
                contents.drain(*from..to);
            }
            ListElementaryChange::Removed { at, removed } => {
                CollectionError::check_position(*at, len)?;
                contents.splice(*at..*at, removed.iter().cloned());
            }
            ListElementaryChange::Replaced {
                from,
                removed,
                added,
            } => {
                let to = from + added.len();
                CollectionError::check_range(*from, to, len)?;
                contents.splice(*from..to, removed.iter().cloned());
            }
            ListElementaryChange::Permuted { from, permutation } => {
                let to = from + permutation.len();
                CollectionError::check_range(*from, to, len)?;
                if permutation.iter().any(|&new| new < *from || new >= to) {
                    return Err(CollectionError::ReplayMismatch {
                        reason: "permutation target outside the permuted span",
                    });
                }
                let permuted = contents[*from..to].to_vec();
                for (offset, &new) in permutation.iter().enumerate() {
                    contents[from + offset] = permuted[new - from].clone();
                }
            }
        }
        Ok(())
    }
}

/// Accessors for the sub-change under the cursor.
///
/// All of them fail with [`CollectionError::NoCurrentSubChange`] unless the
/// cursor is on a sub-change.
impl<E: Clone + fmt::Debug> AtomicChange<ListKind<E>> {
    /// See [`ListElementaryChange::kind`].
    pub fn kind(&self) -> Result<ListChangeKind> {
        Ok(self.current()?.kind())
    }

    /// See [`ListElementaryChange::from`].
    pub fn from(&self) -> Result<usize> {
        Ok(self.current()?.from())
    }

    /// See [`ListElementaryChange::to`].
    pub fn to(&self) -> Result<usize> {
        Ok(self.current()?.to())
    }

    /// See [`ListElementaryChange::removed`].
    pub fn removed(&self) -> Result<&[E]> {
        Ok(self.current()?.removed())
    }

    /// See [`ListElementaryChange::added`].
    pub fn added(&self) -> Result<&[E]> {
        Ok(self.current()?.added())
    }

    /// New index of the element formerly at `old_index`.
    ///
    /// # Errors
    ///
    /// [`CollectionError::NotPermutation`] when the current sub-change is not
    /// a permutation, [`CollectionError::IndexOutOfBounds`] when `old_index`
    /// is outside the permuted span.
    pub fn permutation(&self, old_index: usize) -> Result<usize> {
        let current = self.current()?;
        if !current.was_permuted() {
            return Err(CollectionError::NotPermutation);
        }
        current
            .permutation(old_index)
            .ok_or(CollectionError::IndexOutOfBounds {
                index: old_index,
                len: current.to(),
            })
    }

    /// See [`ListElementaryChange::was_added`].
    pub fn was_added(&self) -> Result<bool> {
        Ok(self.current()?.was_added())
    }

    /// See [`ListElementaryChange::was_removed`].
    pub fn was_removed(&self) -> Result<bool> {
        Ok(self.current()?.was_removed())
    }

    /// See [`ListElementaryChange::was_replaced`].
    pub fn was_replaced(&self) -> Result<bool> {
        Ok(self.current()?.was_replaced())
    }

    /// See [`ListElementaryChange::was_permuted`].
    pub fn was_permuted(&self) -> Result<bool> {
        Ok(self.current()?.was_permuted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Sub = ListElementaryChange<char>;

    fn revert(contents: &str, sub: &Sub) -> Result<String> {
        let mut chars: Vec<char> = contents.chars().collect();
        ListKind::<char>::revert(&mut chars, sub)?;
        Ok(chars.into_iter().collect())
    }

    #[test]
    fn ranges_follow_post_state() {
        let added = Sub::Added {
            from: 2,
            added: vec!['x', 'y'],
        };
        assert_eq!((added.from(), added.to()), (2, 4));

        let removed = Sub::Removed {
            at: 3,
            removed: vec!['a', 'b'],
        };
        assert_eq!((removed.from(), removed.to()), (3, 3));

        let permuted = Sub::Permuted {
            from: 1,
            permutation: vec![2, 1],
        };
        assert_eq!((permuted.from(), permuted.to()), (1, 3));
    }

    #[test]
    fn classification() {
        let replaced = Sub::Replaced {
            from: 0,
            removed: vec!['a'],
            added: vec!['b'],
        };
        assert!(replaced.was_added());
        assert!(replaced.was_removed());
        assert!(replaced.was_replaced());
        assert!(!replaced.was_permuted());
        assert_eq!(replaced.kind(), ListChangeKind::Replaced);
        assert_eq!(replaced.removed(), &['a']);
        assert_eq!(replaced.added(), &['b']);
    }

    #[test]
    fn permutation_lookup_is_absolute() {
        let permuted = Sub::Permuted {
            from: 2,
            permutation: vec![4, 2, 3],
        };
        assert_eq!(permuted.permutation(2), Some(4));
        assert_eq!(permuted.permutation(3), Some(2));
        assert_eq!(permuted.permutation(1), None);
        assert_eq!(permuted.permutation(5), None);
    }

    #[test]
    fn revert_each_shape() {
        let added = Sub::Added {
            from: 1,
            added: vec!['x', 'y'],
        };
        assert_eq!(revert("axyb", &added).unwrap(), "ab");

        let removed = Sub::Removed {
            at: 1,
            removed: vec!['x', 'y'],
        };
        assert_eq!(revert("ab", &removed).unwrap(), "axyb");

        let replaced = Sub::Replaced {
            from: 0,
            removed: vec!['a', 'b', 'c'],
            added: vec!['z'],
        };
        assert_eq!(revert("zd", &replaced).unwrap(), "abcd");

        // "cab" was produced from "abc" by moving a->1, b->2, c->0.
        let permuted = Sub::Permuted {
            from: 0,
            permutation: vec![1, 2, 0],
        };
        assert_eq!(revert("cab", &permuted).unwrap(), "abc");
    }

    #[test]
    fn revert_rejects_mismatched_contents() {
        let added = Sub::Added {
            from: 3,
            added: vec!['x'],
        };
        assert!(matches!(
            revert("ab", &added),
            Err(CollectionError::RangeOutOfBounds { .. })
        ));

        let permuted = Sub::Permuted {
            from: 0,
            permutation: vec![0, 5],
        };
        assert!(matches!(
            revert("ab", &permuted),
            Err(CollectionError::ReplayMismatch { .. })
        ));
    }

    #[test]
    fn cursor_accessors() {
        let change: ListChange<char> = AtomicChange::new(
            vec!['b', 'a'],
            vec![Sub::Permuted {
                from: 0,
                permutation: vec![1, 0],
            }],
        );
        assert!(change.from().is_err());
        change.reset();
        assert!(change.next());
        assert_eq!(change.kind().unwrap(), ListChangeKind::Permuted);
        assert_eq!(change.permutation(0).unwrap(), 1);
        assert!(matches!(
            change.permutation(7),
            Err(CollectionError::IndexOutOfBounds { index: 7, .. })
        ));
        assert!(change.added().unwrap().is_empty());
    }

    #[test]
    fn permutation_of_non_permuted_is_usage_error() {
        let change: ListChange<char> = AtomicChange::new(
            Vec::new(),
            vec![Sub::Added {
                from: 0,
                added: vec!['q'],
            }],
        );
        change.next();
        assert_eq!(change.permutation(0), Err(CollectionError::NotPermutation));
    }
}
