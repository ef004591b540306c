#![forbid(unsafe_code)]

//! Elementary changes of sets.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use ahash::AHashSet;

use super::{AtomicChange, ContainerKind};
use crate::error::{CollectionError, Result};

/// Container kind of [`ObservableSet`](crate::ObservableSet).
pub struct SetKind<E>(PhantomData<fn() -> E>);

/// Atomic change delivered by an observable set.
pub type SetChange<E> = AtomicChange<SetKind<E>>;

/// One element entering or leaving a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetElementaryChange<E> {
    /// The element was inserted.
    Added(E),
    /// The element was removed.
    Removed(E),
}

impl<E> SetElementaryChange<E> {
    /// The element concerned.
    #[must_use]
    pub fn element(&self) -> &E {
        match self {
            Self::Added(e) | Self::Removed(e) => e,
        }
    }

    /// Whether the element was inserted.
    #[must_use]
    pub fn was_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }

    /// Whether the element was removed.
    #[must_use]
    pub fn was_removed(&self) -> bool {
        matches!(self, Self::Removed(_))
    }
}

impl<E: fmt::Debug> fmt::Display for SetElementaryChange<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added(e) => write!(f, "added {e:?}"),
            Self::Removed(e) => write!(f, "removed {e:?}"),
        }
    }
}

impl<E: Eq + Hash + Clone + fmt::Debug> ContainerKind for SetKind<E> {
    type Contents = AHashSet<E>;
    type SubChange = SetElementaryChange<E>;

    fn revert(contents: &mut AHashSet<E>, sub_change: &SetElementaryChange<E>) -> Result<()> {
        let consistent = match sub_change {
            SetElementaryChange::Added(e) => contents.remove(e),
            SetElementaryChange::Removed(e) => contents.insert(e.clone()),
        };
        if consistent {
            Ok(())
        } else {
            Err(CollectionError::ReplayMismatch {
                reason: "set membership does not match the change",
            })
        }
    }
}

impl<E: Eq + Hash + Clone + fmt::Debug> AtomicChange<SetKind<E>> {
    /// Element of the current sub-change.
    pub fn element(&self) -> Result<&E> {
        Ok(self.current()?.element())
    }

    /// Whether the current sub-change inserted its element.
    pub fn was_added(&self) -> Result<bool> {
        Ok(self.current()?.was_added())
    }

    /// Whether the current sub-change removed its element.
    pub fn was_removed(&self) -> Result<bool> {
        Ok(self.current()?.was_removed())
    }
}
