#![forbid(unsafe_code)]

//! Read-only views over observable containers.
//!
//! An [`Unmodifiable`] forwards reads and listener registration to the
//! wrapped container. Every mutating method exists with the container's
//! signature but returns [`CollectionError::Unsupported`] without touching
//! the contents or the listeners.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use ahash::{AHashMap, AHashSet};

use crate::backing::{HashMultiset, HashSetMultimap};
use crate::error::{CollectionError, Result};
use crate::listener::{ChangeListener, InvalidationListener, ObservableCollection};
use crate::observable::{
    ObservableContainer, ObservableKind, ObservableList, ObservableMap, ObservableMultiset,
    ObservableSet, ObservableSetMultimap,
};

/// Read-only handle to an observable container.
#[derive(Clone)]
pub struct Unmodifiable<C> {
    inner: C,
}

impl<C> Unmodifiable<C> {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<K: ObservableKind> Unmodifiable<ObservableContainer<K>> {
    /// See [`ObservableContainer::with`].
    pub fn with<R>(&self, f: impl FnOnce(&K::Contents) -> R) -> R {
        self.inner.with(f)
    }

    #[must_use]
    pub fn snapshot(&self) -> K::Contents {
        self.inner.snapshot()
    }

    /// Whether this view wraps `container`.
    #[must_use]
    pub fn views(&self, container: &ObservableContainer<K>) -> bool {
        self.inner.ptr_eq(container)
    }
}

impl<K: ObservableKind> ObservableContainer<K> {
    /// Read-only view sharing this container's state and listeners.
    #[must_use]
    pub fn read_only(&self) -> Unmodifiable<Self> {
        Unmodifiable::new(self.clone())
    }
}

impl<C: ObservableCollection> ObservableCollection for Unmodifiable<C> {
    type Change = C::Change;

    fn add_invalidation_listener(&self, listener: InvalidationListener) {
        self.inner.add_invalidation_listener(listener);
    }

    fn remove_invalidation_listener(&self, listener: &InvalidationListener) -> bool {
        self.inner.remove_invalidation_listener(listener)
    }

    fn add_change_listener(&self, listener: ChangeListener<C::Change>) {
        self.inner.add_change_listener(listener);
    }

    fn remove_change_listener(&self, listener: &ChangeListener<C::Change>) -> bool {
        self.inner.remove_change_listener(listener)
    }
}

impl<C: fmt::Debug> fmt::Debug for Unmodifiable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Unmodifiable").field(&self.inner).finish()
    }
}

/// Mutators that always fail with `Unsupported`, named after the method.
macro_rules! refuse {
    ($( fn $name:ident($($arg:ty),*) -> $ret:ty; )*) => {
        $(
            #[doc = concat!("Always fails: `", stringify!($name), "` would mutate.")]
            pub fn $name(&self, $(_: $arg),*) -> Result<$ret> {
                Err(CollectionError::unsupported(stringify!($name)))
            }
        )*
    };
}

impl<E: Clone + fmt::Debug + 'static> Unmodifiable<ObservableList<E>> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<E> {
        self.inner.get(index)
    }

    #[must_use]
    pub fn contains(&self, item: &E) -> bool {
        self.inner.contains(item)
    }

    #[must_use]
    pub fn index_of(&self, item: &E) -> Option<usize> {
        self.inner.index_of(item)
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<E> {
        self.inner.to_vec()
    }

    refuse! {
        fn push(E) -> ();
        fn insert(usize, E) -> ();
        fn extend(impl IntoIterator<Item = E>) -> bool;
        fn insert_all(usize, impl IntoIterator<Item = E>) -> ();
        fn remove(usize) -> E;
        fn remove_item(&E) -> bool;
        fn remove_range(usize, usize) -> Vec<E>;
        fn remove_all(&[E]) -> bool;
        fn remove_if(impl FnMut(&E) -> bool) -> bool;
        fn retain_all(&[E]) -> bool;
        fn retain_if(impl FnMut(&E) -> bool) -> bool;
        fn set(usize, E) -> E;
        fn set_all(impl IntoIterator<Item = E>) -> bool;
        fn replace_all(impl FnMut(&E) -> E) -> bool;
        fn clear() -> ();
        fn sort() -> ();
        fn sort_by(impl FnMut(&E, &E) -> Ordering) -> ();
    }
}

impl<E: Eq + Hash + Clone + fmt::Debug + 'static> Unmodifiable<ObservableSet<E>> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.inner.contains(element)
    }

    #[must_use]
    pub fn to_set(&self) -> AHashSet<E> {
        self.inner.to_set()
    }

    refuse! {
        fn insert(E) -> bool;
        fn remove(&E) -> bool;
        fn extend(impl IntoIterator<Item = E>) -> bool;
        fn remove_all(&[E]) -> bool;
        fn retain(impl FnMut(&E) -> bool) -> bool;
        fn replace_all(impl IntoIterator<Item = E>) -> bool;
        fn clear() -> ();
    }
}

impl<K, V> Unmodifiable<ObservableMap<K, V>>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Clone + fmt::Debug + 'static,
{
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    #[must_use]
    pub fn to_map(&self) -> AHashMap<K, V> {
        self.inner.to_map()
    }

    refuse! {
        fn insert(K, V) -> Option<V>;
        fn extend(impl IntoIterator<Item = (K, V)>) -> bool;
        fn remove(&K) -> Option<V>;
        fn remove_all(&[K]) -> bool;
        fn retain(impl FnMut(&K, &V) -> bool) -> bool;
        fn replace_all(impl FnMut(&K, &V) -> V) -> bool;
        fn clear() -> ();
    }
}

impl<E: Eq + Hash + Clone + fmt::Debug + 'static> Unmodifiable<ObservableMultiset<E>> {
    #[must_use]
    pub fn count(&self, element: &E) -> usize {
        self.inner.count(element)
    }

    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.inner.contains(element)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn distinct_len(&self) -> usize {
        self.inner.distinct_len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn to_multiset(&self) -> HashMultiset<E> {
        self.inner.to_multiset()
    }

    refuse! {
        fn add(E) -> ();
        fn add_count(E, usize) -> usize;
        fn remove(&E) -> bool;
        fn remove_count(&E, usize) -> usize;
        fn set_count(E, usize) -> usize;
        fn set_count_if(E, usize, usize) -> bool;
        fn add_all(impl IntoIterator<Item = E>) -> bool;
        fn remove_all(&[E]) -> bool;
        fn retain_all(&[E]) -> bool;
        fn replace_all(HashMultiset<E>) -> bool;
        fn clear() -> ();
    }
}

impl<K, V> Unmodifiable<ObservableSetMultimap<K, V>>
where
    K: Eq + Hash + Clone + fmt::Debug + 'static,
    V: Eq + Hash + Clone + fmt::Debug + 'static,
{
    #[must_use]
    pub fn get(&self, key: &K) -> Option<AHashSet<V>> {
        self.inner.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    #[must_use]
    pub fn contains_entry(&self, key: &K, value: &V) -> bool {
        self.inner.contains_entry(key, value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn key_len(&self) -> usize {
        self.inner.key_len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn to_multimap(&self) -> HashSetMultimap<K, V> {
        self.inner.to_multimap()
    }

    refuse! {
        fn put(K, V) -> bool;
        fn put_all(K, impl IntoIterator<Item = V>) -> bool;
        fn put_all_multimap(&HashSetMultimap<K, V>) -> bool;
        fn remove(&K, &V) -> bool;
        fn remove_all(&K) -> AHashSet<V>;
        fn replace_values(K, impl IntoIterator<Item = V>) -> AHashSet<V>;
        fn replace_all(HashSetMultimap<K, V>) -> bool;
        fn clear() -> ();
    }
}
