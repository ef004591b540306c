#![forbid(unsafe_code)]

//! Observable containers.
//!
//! # Design
//!
//! One generic handle, [`ObservableContainer<K>`], serves every container
//! kind. It owns the backing contents and a [`ListenerRegistry`] in shared,
//! reference-counted storage; cloning a handle yields another handle to the
//! **same** container. Each public mutating method goes through
//! [`commit`](ObservableContainer::commit):
//!
//! ```text
//! snapshot (only with change listeners) ─► diff + apply ─► fire
//! ```
//!
//! The diff step runs against the pre-state inside the same borrow that
//! applies the mutation. The borrow is released before listeners run, so a
//! listener may read the container (or mutate it again, starting a nested
//! round).
//!
//! # Invariants
//!
//! 1. After a mutating call returns, the contents equal the post-state
//!    implied by the last delivered change.
//! 2. A call that changes nothing fires nothing.
//! 3. A call that fails leaves the contents untouched and fires nothing.
//! 4. Each call fires at most one notification round.

pub mod list;
pub mod map;
pub mod multimap;
pub mod multiset;
pub mod set;

use std::cell::RefCell;
use std::convert::Infallible;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::change::{AtomicChange, ContainerKind};
use crate::config::NotifyConfig;
use crate::listener::{ChangeListener, InvalidationListener, ListenerRegistry, ObservableCollection};

pub use list::ObservableList;
pub use map::ObservableMap;
pub use multimap::ObservableSetMultimap;
pub use multiset::ObservableMultiset;
pub use set::ObservableSet;

/// A container kind that can be observed.
pub trait ObservableKind: ContainerKind + 'static {
    /// Value-equality parameter fixed at construction. `()` for kinds whose
    /// backing store defines equality itself.
    type Equality: Copy;
}

struct Shared<K: ObservableKind> {
    contents: RefCell<K::Contents>,
    registry: ListenerRegistry<AtomicChange<K>>,
    equality: K::Equality,
}

/// Shared handle to an observable container of kind `K`.
pub struct ObservableContainer<K: ObservableKind> {
    shared: Rc<Shared<K>>,
}

impl<K: ObservableKind> ObservableContainer<K> {
    pub(crate) fn from_parts(
        contents: K::Contents,
        equality: K::Equality,
        config: NotifyConfig,
    ) -> Self {
        Self {
            shared: Rc::new(Shared {
                contents: RefCell::new(contents),
                registry: ListenerRegistry::new(config),
                equality,
            }),
        }
    }

    /// Borrow the contents for the duration of `f`.
    ///
    /// # Panics
    ///
    /// Panics if `f` mutates this container.
    pub fn with<R>(&self, f: impl FnOnce(&K::Contents) -> R) -> R {
        f(&self.shared.contents.borrow())
    }

    /// Copy of the current contents.
    #[must_use]
    pub fn snapshot(&self) -> K::Contents {
        self.shared.contents.borrow().clone()
    }

    /// Whether both handles refer to the same container.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    /// Delivery configuration.
    #[must_use]
    pub fn config(&self) -> &NotifyConfig {
        self.shared.registry.config()
    }

    /// Number of (invalidation, change) listener registrations.
    #[must_use]
    pub fn listener_counts(&self) -> (usize, usize) {
        self.shared.registry.listener_counts()
    }

    pub(crate) fn equality(&self) -> K::Equality {
        self.shared.equality
    }

    /// Run one mutating call.
    ///
    /// `apply` receives the pre-state and must either fail without touching
    /// it or mutate it and return the sub-changes describing the mutation.
    pub(crate) fn commit<R, E>(
        &self,
        apply: impl FnOnce(&mut K::Contents, K::Equality) -> Result<(R, Vec<K::SubChange>), E>,
    ) -> Result<R, E> {
        let registry = &self.shared.registry;
        let previous = registry
            .has_change_listeners()
            .then(|| self.shared.contents.borrow().clone());

        let (result, sub_changes) = {
            let mut contents = self.shared.contents.borrow_mut();
            apply(&mut contents, self.shared.equality)?
        };
        if sub_changes.is_empty() {
            return Ok(result);
        }

        trace!(
            message = "collections.mutate",
            label = registry.config().label(),
            sub_changes = sub_changes.len(),
            snapshot = previous.is_some(),
        );
        match previous {
            Some(previous) => registry.fire(Some(&AtomicChange::new(previous, sub_changes))),
            None => registry.fire(None),
        }
        Ok(result)
    }

    /// [`commit`](Self::commit) for mutations that cannot fail.
    pub(crate) fn mutate<R>(
        &self,
        apply: impl FnOnce(&mut K::Contents, K::Equality) -> (R, Vec<K::SubChange>),
    ) -> R {
        let Ok(result) = self.commit::<R, Infallible>(|contents, eq| Ok(apply(contents, eq)));
        result
    }
}

impl<K: ObservableKind> ObservableCollection for ObservableContainer<K> {
    type Change = AtomicChange<K>;

    fn add_invalidation_listener(&self, listener: InvalidationListener) {
        self.shared.registry.add_invalidation_listener(listener);
    }

    fn remove_invalidation_listener(&self, listener: &InvalidationListener) -> bool {
        self.shared.registry.remove_invalidation_listener(listener)
    }

    fn add_change_listener(&self, listener: ChangeListener<AtomicChange<K>>) {
        self.shared.registry.add_change_listener(listener);
    }

    fn remove_change_listener(&self, listener: &ChangeListener<AtomicChange<K>>) -> bool {
        self.shared.registry.remove_change_listener(listener)
    }
}

impl<K: ObservableKind> Clone for ObservableContainer<K> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<K> fmt::Debug for ObservableContainer<K>
where
    K: ObservableKind,
    K::Contents: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableContainer")
            .field("contents", &*self.shared.contents.borrow())
            .field("registry", &self.shared.registry)
            .finish()
    }
}
