#![forbid(unsafe_code)]

//! Observable collections with structured, replayable change notifications.
//!
//! Five container kinds are provided: [`ObservableList`], [`ObservableSet`],
//! [`ObservableMap`], [`ObservableMultiset`] and [`ObservableSetMultimap`].
//! Every mutating call computes a minimal ordered list of elementary
//! sub-changes, applies the mutation and delivers one [`AtomicChange`] to
//! the registered change listeners. A change carries the contents as they
//! were before the call and can rebuild them from the current contents
//! ([`AtomicChange::reverse_previous_contents`]), which is what undo stacks
//! and incremental views build on.
//!
//! ```
//! use ftui_collections::{ObservableCollection, ObservableList};
//!
//! let list = ObservableList::from_vec(vec![3, 1, 2]);
//! list.on_change(|change| {
//!     while change.next() {
//!         assert!(change.was_permuted().unwrap());
//!         assert_eq!(change.permutation(0).unwrap(), 2);
//!     }
//! });
//! list.sort();
//! assert_eq!(list.to_vec(), vec![1, 2, 3]);
//! ```
//!
//! Containers are single-threaded handles (`Rc` inside); clones share state.

pub mod backing;
pub mod change;
pub mod config;
pub mod diff;
pub mod error;
pub mod listener;
pub mod observable;
pub mod unmodifiable;

pub use backing::{HashMultiset, HashSetMultimap};
pub use change::{
    AtomicChange, ContainerKind, CursorState, ListChange, ListChangeKind, ListElementaryChange,
    MapChange, MapElementaryChange, MultisetChange, MultisetElementaryChange, ResetCursor,
    SetChange, SetElementaryChange, SetMultimapChange, SetMultimapElementaryChange,
};
pub use config::{ErrorReporter, NotifyConfig, tracing_reporter};
pub use error::{
    CollectionError, ListenerError, ListenerFailure, ListenerKind, ListenerResult, Result,
};
pub use listener::{ChangeListener, InvalidationListener, ListenerRegistry, ObservableCollection};
pub use observable::{
    ObservableContainer, ObservableKind, ObservableList, ObservableMap, ObservableMultiset,
    ObservableSet, ObservableSetMultimap,
};
pub use unmodifiable::Unmodifiable;
