#![forbid(unsafe_code)]

//! Atomic changes and their elementary sub-changes.
//!
//! An [`AtomicChange`] is what a change listener receives: the ordered list
//! of elementary sub-changes produced by one mutating call, plus a snapshot
//! of the container contents taken before the call.
//!
//! # Cursor protocol
//!
//! Listeners walk the sub-changes with [`AtomicChange::next`], reading the
//! current sub-change through [`AtomicChange::current`] (or the per-kind
//! accessors such as `from()`/`added()` on list changes). The same change
//! value is delivered to every listener; the registry rewinds the cursor
//! before each delivery, so each listener sees a fresh cursor.
//!
//! ```text
//! Uninitialized ──reset──► BeforeFirst ──next=true──► OnSubChange(0)
//!                                                       │ next=true
//!                                                       ▼
//!            BeforeFirst ◄──reset── Exhausted ◄──next=false── OnSubChange(n)
//! ```
//!
//! Because the cursor lives inside the shared change, delivering one change
//! to several listeners in parallel is unsound by construction. Delivery is
//! always sequential.
//!
//! # Reverse replay
//!
//! [`AtomicChange::reverse_previous_contents`] undoes every sub-change, last
//! first, against a copy of the post-change contents. For a change produced by
//! an observable container the result always equals
//! [`AtomicChange::previous_contents`].

pub mod list;
pub mod map;
pub mod multimap;
pub mod multiset;
pub mod set;

use std::cell::Cell;
use std::fmt;

use crate::error::{CollectionError, Result};

pub use list::{ListChange, ListChangeKind, ListElementaryChange, ListKind};
pub use map::{MapChange, MapElementaryChange, MapKind};
pub use multimap::{SetMultimapChange, SetMultimapElementaryChange, SetMultimapKind};
pub use multiset::{MultisetChange, MultisetElementaryChange, MultisetKind};
pub use set::{SetChange, SetElementaryChange, SetKind};

/// A family of containers sharing one contents type and one elementary
/// change shape.
pub trait ContainerKind {
    /// Full container state; also the type of the pre-change snapshot.
    type Contents: Clone;
    /// One elementary sub-change.
    type SubChange: Clone + fmt::Debug;

    /// Undo `sub_change` against `contents`, which must be the state right
    /// after that sub-change was applied.
    ///
    /// # Errors
    ///
    /// Returns an error when `sub_change` cannot have produced `contents`.
    fn revert(contents: &mut Self::Contents, sub_change: &Self::SubChange) -> Result<()>;
}

/// Something whose iteration cursor can be rewound.
pub trait ResetCursor {
    /// Move the cursor before the first sub-change.
    fn reset(&self);
}

/// Position of an [`AtomicChange`] cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Never reset nor advanced.
    Uninitialized,
    /// Reset; `next()` has not been called yet.
    BeforeFirst,
    /// Positioned on the sub-change with this index.
    OnSubChange(usize),
    /// `next()` returned `false`.
    Exhausted,
}

impl fmt::Display for CursorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("uninitialized"),
            Self::BeforeFirst => f.write_str("before the first sub-change"),
            Self::OnSubChange(index) => write!(f, "on sub-change {index}"),
            Self::Exhausted => f.write_str("exhausted"),
        }
    }
}

/// One notification's worth of change: ordered sub-changes plus the
/// contents before any of them were applied.
pub struct AtomicChange<K: ContainerKind> {
    previous: K::Contents,
    sub_changes: Vec<K::SubChange>,
    cursor: Cell<CursorState>,
}

impl<K: ContainerKind> AtomicChange<K> {
    /// Build a change from a pre-change snapshot and the sub-changes that
    /// were applied to it, in application order.
    #[must_use]
    pub fn new(previous: K::Contents, sub_changes: Vec<K::SubChange>) -> Self {
        Self {
            previous,
            sub_changes,
            cursor: Cell::new(CursorState::Uninitialized),
        }
    }

    /// Move the cursor before the first sub-change.
    pub fn reset(&self) {
        self.cursor.set(CursorState::BeforeFirst);
    }

    /// Advance to the next sub-change. Returns `false` once all sub-changes
    /// were visited; further calls keep returning `false` until
    /// [`reset`](Self::reset).
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> bool {
        let next = match self.cursor.get() {
            CursorState::Uninitialized | CursorState::BeforeFirst => 0,
            CursorState::OnSubChange(index) => index + 1,
            CursorState::Exhausted => return false,
        };
        if next < self.sub_changes.len() {
            self.cursor.set(CursorState::OnSubChange(next));
            true
        } else {
            self.cursor.set(CursorState::Exhausted);
            false
        }
    }

    /// Current cursor position.
    #[must_use]
    pub fn cursor(&self) -> CursorState {
        self.cursor.get()
    }

    /// The sub-change under the cursor.
    ///
    /// # Errors
    ///
    /// [`CollectionError::NoCurrentSubChange`] unless the last `next()`
    /// returned `true`.
    pub fn current(&self) -> Result<&K::SubChange> {
        match self.cursor.get() {
            CursorState::OnSubChange(index) => Ok(&self.sub_changes[index]),
            state => Err(CollectionError::NoCurrentSubChange { state }),
        }
    }

    /// All sub-changes in application order. Independent of the cursor.
    #[must_use]
    pub fn sub_changes(&self) -> &[K::SubChange] {
        &self.sub_changes
    }

    /// Iterate sub-changes without touching the cursor.
    pub fn iter(&self) -> std::slice::Iter<'_, K::SubChange> {
        self.sub_changes.iter()
    }

    /// Number of sub-changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sub_changes.len()
    }

    /// Whether there are no sub-changes. Never true for changes delivered by
    /// an observable container.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sub_changes.is_empty()
    }

    /// Contents before the change.
    #[must_use]
    pub fn previous_contents(&self) -> &K::Contents {
        &self.previous
    }

    /// Reconstruct the pre-change contents from `current` by undoing every
    /// sub-change, last first.
    ///
    /// # Errors
    ///
    /// Returns an error if `current` is not a state this change could have
    /// produced.
    pub fn reverse_previous_contents(&self, current: &K::Contents) -> Result<K::Contents> {
        let mut contents = current.clone();
        for sub_change in self.sub_changes.iter().rev() {
            K::revert(&mut contents, sub_change)?;
        }
        Ok(contents)
    }
}

impl<K: ContainerKind> ResetCursor for AtomicChange<K> {
    fn reset(&self) {
        AtomicChange::reset(self);
    }
}

impl<'a, K: ContainerKind> IntoIterator for &'a AtomicChange<K> {
    type Item = &'a K::SubChange;
    type IntoIter = std::slice::Iter<'a, K::SubChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.sub_changes.iter()
    }
}

impl<K: ContainerKind> Clone for AtomicChange<K> {
    /// The clone starts with an uninitialized cursor.
    fn clone(&self) -> Self {
        Self::new(self.previous.clone(), self.sub_changes.clone())
    }
}

impl<K> fmt::Debug for AtomicChange<K>
where
    K: ContainerKind,
    K::Contents: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicChange")
            .field("sub_changes", &self.sub_changes)
            .field("previous", &self.previous)
            .field("cursor", &self.cursor.get())
            .finish()
    }
}

impl<K> fmt::Display for AtomicChange<K>
where
    K: ContainerKind,
    K::SubChange: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        for (i, sub_change) in self.sub_changes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{sub_change}")?;
        }
        f.write_str(" }")
    }
}
