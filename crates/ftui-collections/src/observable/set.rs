#![forbid(unsafe_code)]

//! Observable hash sets.

use std::fmt;
use std::hash::Hash;

use ahash::AHashSet;

use super::{ObservableContainer, ObservableKind};
use crate::change::{SetElementaryChange, SetKind};
use crate::config::NotifyConfig;
use crate::diff;

impl<E: Eq + Hash + Clone + fmt::Debug + 'static> ObservableKind for SetKind<E> {
    type Equality = ();
}

/// Observable [`AHashSet`].
pub type ObservableSet<E> = ObservableContainer<SetKind<E>>;

impl<E: Eq + Hash + Clone + fmt::Debug + 'static> ObservableSet<E> {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::from_set(AHashSet::new())
    }

    /// Set over `elements`.
    #[must_use]
    pub fn from_set(elements: AHashSet<E>) -> Self {
        Self::with_config(elements, NotifyConfig::default())
    }

    /// Set over `elements` with a custom delivery configuration.
    #[must_use]
    pub fn with_config(elements: AHashSet<E>, config: NotifyConfig) -> Self {
        Self::from_parts(elements, (), config)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.with(|set| set.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.with(|set| set.is_empty())
    }

    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.with(|set| set.contains(element))
    }

    #[must_use]
    pub fn to_set(&self) -> AHashSet<E> {
        self.snapshot()
    }

    /// Insert `element`. Returns whether it was absent.
    pub fn insert(&self, element: E) -> bool {
        self.mutate(|set, ()| {
            if set.insert(element.clone()) {
                (true, vec![SetElementaryChange::Added(element)])
            } else {
                (false, Vec::new())
            }
        })
    }

    /// Remove `element`. Returns whether it was present.
    pub fn remove(&self, element: &E) -> bool {
        self.mutate(|set, ()| match set.take(element) {
            Some(removed) => (true, vec![SetElementaryChange::Removed(removed)]),
            None => (false, Vec::new()),
        })
    }

    /// Insert every element of `iter`. Returns whether anything was added.
    pub fn extend(&self, iter: impl IntoIterator<Item = E>) -> bool {
        self.mutate(|set, ()| {
            let changes: Vec<_> = iter
                .into_iter()
                .filter(|element| set.insert(element.clone()))
                .map(SetElementaryChange::Added)
                .collect();
            (!changes.is_empty(), changes)
        })
    }

    /// Remove every element of `targets`. Returns whether anything was
    /// removed.
    pub fn remove_all(&self, targets: &[E]) -> bool {
        self.mutate(|set, ()| {
            let changes: Vec<_> = targets
                .iter()
                .filter_map(|element| set.take(element))
                .map(SetElementaryChange::Removed)
                .collect();
            (!changes.is_empty(), changes)
        })
    }

    /// Keep only elements matching `predicate`. Returns whether anything was
    /// removed.
    pub fn retain(&self, mut predicate: impl FnMut(&E) -> bool) -> bool {
        self.mutate(|set, ()| {
            let doomed: Vec<E> = set.iter().filter(|e| !predicate(*e)).cloned().collect();
            for element in &doomed {
                set.remove(element);
            }
            let changes: Vec<_> = doomed.into_iter().map(SetElementaryChange::Removed).collect();
            (!changes.is_empty(), changes)
        })
    }

    /// Replace the whole contents. Returns whether membership changed.
    pub fn replace_all(&self, iter: impl IntoIterator<Item = E>) -> bool {
        let new: AHashSet<E> = iter.into_iter().collect();
        self.mutate(|set, ()| {
            let changes = diff::keyed::set_replacement(set, &new);
            if !changes.is_empty() {
                *set = new;
            }
            (!changes.is_empty(), changes)
        })
    }

    /// Remove every element.
    pub fn clear(&self) {
        self.mutate(|set, ()| {
            let changes = set.drain().map(SetElementaryChange::Removed).collect();
            ((), changes)
        });
    }
}

impl<E: Eq + Hash + Clone + fmt::Debug + 'static> Default for ObservableSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Eq + Hash + Clone + fmt::Debug + 'static> FromIterator<E> for ObservableSet<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::from_set(iter.into_iter().collect())
    }
}
