#![forbid(unsafe_code)]

//! Listener storage and delivery.
//!
//! # Design
//!
//! [`ListenerRegistry`] keeps two ordered lists: invalidation listeners
//! (told only that the contents changed) and change listeners (handed the
//! [`AtomicChange`](crate::AtomicChange)). Each list lives behind an `Rc` so
//! a notification round can pin the list it started with by cloning the
//! pointer. Registration during delivery goes through [`Rc::make_mut`],
//! which copies the list only while a round holds it.
//!
//! # Invariants
//!
//! 1. Listeners are called in registration order, invalidation listeners
//!    first.
//! 2. A round delivers to exactly the listeners registered when it started;
//!    listeners added mid-round wait for the next change, listeners removed
//!    mid-round still receive the current one.
//! 3. Registering the same listener twice makes two independent
//!    registrations; each removal drops the first remaining one.
//! 4. A failing listener never prevents delivery to the rest and never
//!    reaches the mutating caller.
//!
//! # Failure Modes
//!
//! - **Listener returns `Err`**: reported as [`ListenerError::Failed`].
//! - **Listener panics**: contained and reported as
//!   [`ListenerError::Panicked`] when [`NotifyConfig::catch_panics`] is set,
//!   otherwise the panic unwinds through the mutating call after the new
//!   contents are already in place.

use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::change::ResetCursor;
use crate::config::NotifyConfig;
use crate::error::{ListenerError, ListenerFailure, ListenerKind, ListenerResult};

/// Callback told that an observable's contents changed.
///
/// Cloning yields the same listener: removal matches clones of the handle
/// that was registered.
#[derive(Clone)]
pub struct InvalidationListener(Rc<dyn Fn() -> ListenerResult>);

impl InvalidationListener {
    /// Wrap a fallible callback.
    pub fn new(callback: impl Fn() -> ListenerResult + 'static) -> Self {
        Self(Rc::new(callback))
    }

    /// Whether both handles refer to the same registration target.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for InvalidationListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvalidationListener")
            .finish_non_exhaustive()
    }
}

/// Callback handed each atomic change of type `C`.
pub struct ChangeListener<C>(Rc<dyn Fn(&C) -> ListenerResult>);

impl<C> ChangeListener<C> {
    /// Wrap a fallible callback.
    pub fn new(callback: impl Fn(&C) -> ListenerResult + 'static) -> Self {
        Self(Rc::new(callback))
    }

    /// Whether both handles refer to the same registration target.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<C> Clone for ChangeListener<C> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<C> fmt::Debug for ChangeListener<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeListener").finish_non_exhaustive()
    }
}

/// Listener registration, implemented by every observable container and by
/// [`Unmodifiable`](crate::Unmodifiable) views.
pub trait ObservableCollection {
    /// Atomic change type delivered to change listeners.
    type Change: 'static;

    /// Append an invalidation listener.
    fn add_invalidation_listener(&self, listener: InvalidationListener);

    /// Remove the first registration of `listener`. Returns whether one was
    /// found.
    fn remove_invalidation_listener(&self, listener: &InvalidationListener) -> bool;

    /// Append a change listener.
    fn add_change_listener(&self, listener: ChangeListener<Self::Change>);

    /// Remove the first registration of `listener`. Returns whether one was
    /// found.
    fn remove_change_listener(&self, listener: &ChangeListener<Self::Change>) -> bool;

    /// Register an infallible invalidation callback and return its handle.
    fn on_invalidated(&self, callback: impl Fn() + 'static) -> InvalidationListener {
        let listener = InvalidationListener::new(move || {
            callback();
            Ok(())
        });
        self.add_invalidation_listener(listener.clone());
        listener
    }

    /// Register an infallible change callback and return its handle.
    fn on_change(
        &self,
        callback: impl Fn(&Self::Change) + 'static,
    ) -> ChangeListener<Self::Change> {
        let listener = ChangeListener::new(move |change: &Self::Change| {
            callback(change);
            Ok(())
        });
        self.add_change_listener(listener.clone());
        listener
    }
}

/// Two listener lists plus the delivery loop.
pub struct ListenerRegistry<C> {
    invalidation: RefCell<Rc<Vec<InvalidationListener>>>,
    change: RefCell<Rc<Vec<ChangeListener<C>>>>,
    config: NotifyConfig,
}

impl<C: ResetCursor> ListenerRegistry<C> {
    /// Empty registry.
    #[must_use]
    pub fn new(config: NotifyConfig) -> Self {
        Self {
            invalidation: RefCell::new(Rc::new(Vec::new())),
            change: RefCell::new(Rc::new(Vec::new())),
            config,
        }
    }

    /// Delivery configuration.
    #[must_use]
    pub fn config(&self) -> &NotifyConfig {
        &self.config
    }

    pub fn add_invalidation_listener(&self, listener: InvalidationListener) {
        let mut list = self.invalidation.borrow_mut();
        self.note_copy_on_write(Rc::strong_count(&list), ListenerKind::Invalidation);
        Rc::make_mut(&mut list).push(listener);
        debug!(
            message = "collections.listener_added",
            label = self.config.label(),
            kind = %ListenerKind::Invalidation,
            count = list.len(),
        );
    }

    pub fn remove_invalidation_listener(&self, listener: &InvalidationListener) -> bool {
        let mut list = self.invalidation.borrow_mut();
        let Some(position) = list.iter().position(|l| l.same_as(listener)) else {
            return false;
        };
        self.note_copy_on_write(Rc::strong_count(&list), ListenerKind::Invalidation);
        Rc::make_mut(&mut list).remove(position);
        debug!(
            message = "collections.listener_removed",
            label = self.config.label(),
            kind = %ListenerKind::Invalidation,
            position,
        );
        true
    }

    pub fn add_change_listener(&self, listener: ChangeListener<C>) {
        let mut list = self.change.borrow_mut();
        self.note_copy_on_write(Rc::strong_count(&list), ListenerKind::Change);
        Rc::make_mut(&mut list).push(listener);
        debug!(
            message = "collections.listener_added",
            label = self.config.label(),
            kind = %ListenerKind::Change,
            count = list.len(),
        );
    }

    pub fn remove_change_listener(&self, listener: &ChangeListener<C>) -> bool {
        let mut list = self.change.borrow_mut();
        let Some(position) = list.iter().position(|l| l.same_as(listener)) else {
            return false;
        };
        self.note_copy_on_write(Rc::strong_count(&list), ListenerKind::Change);
        Rc::make_mut(&mut list).remove(position);
        debug!(
            message = "collections.listener_removed",
            label = self.config.label(),
            kind = %ListenerKind::Change,
            position,
        );
        true
    }

    /// Whether any change listener is registered.
    #[must_use]
    pub fn has_change_listeners(&self) -> bool {
        !self.change.borrow().is_empty()
    }

    /// Whether any listener of either kind is registered.
    #[must_use]
    pub fn has_listeners(&self) -> bool {
        self.has_change_listeners() || !self.invalidation.borrow().is_empty()
    }

    /// Number of (invalidation, change) registrations.
    #[must_use]
    pub fn listener_counts(&self) -> (usize, usize) {
        (self.invalidation.borrow().len(), self.change.borrow().len())
    }

    /// Run one notification round.
    ///
    /// Every invalidation listener is called, then, when `change` is given,
    /// every change listener with the cursor of `change` reset before each
    /// call.
    pub fn fire(&self, change: Option<&C>) {
        let invalidation = Rc::clone(&self.invalidation.borrow());
        let listeners = Rc::clone(&self.change.borrow());
        let change_listeners = change.map_or(0, |_| listeners.len());
        trace!(
            message = "collections.fire",
            label = self.config.label(),
            invalidation_listeners = invalidation.len(),
            change_listeners,
        );

        for (position, listener) in invalidation.iter().enumerate() {
            self.deliver(ListenerKind::Invalidation, position, || (listener.0)());
        }

        let Some(change) = change else {
            return;
        };
        for (position, listener) in listeners.iter().enumerate() {
            change.reset();
            self.deliver(ListenerKind::Change, position, || (listener.0)(change));
        }
    }

    fn deliver(&self, kind: ListenerKind, position: usize, call: impl FnOnce() -> ListenerResult) {
        let outcome = if self.config.catch_panics {
            match panic::catch_unwind(AssertUnwindSafe(call)) {
                Ok(result) => result.map_err(ListenerError::Failed),
                Err(payload) => Err(ListenerError::from_panic(payload)),
            }
        } else {
            call().map_err(ListenerError::Failed)
        };

        if let Err(error) = outcome {
            (self.config.reporter)(&ListenerFailure {
                kind,
                position,
                error,
            });
        }
    }

    fn note_copy_on_write(&self, holders: usize, kind: ListenerKind) {
        if holders > 1 {
            debug!(
                message = "collections.listeners.copy_on_write",
                label = self.config.label(),
                kind = %kind,
            );
        }
    }
}

impl<C> fmt::Debug for ListenerRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("invalidation", &self.invalidation.borrow().len())
            .field("change", &self.change.borrow().len())
            .field("config", &self.config)
            .finish()
    }
}
