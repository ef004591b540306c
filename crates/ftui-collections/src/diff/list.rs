#![forbid(unsafe_code)]

//! Sequence differs.

use std::cmp::Ordering;

use crate::change::ListElementaryChange;

/// Insertion of `added` at `from`.
#[must_use]
pub fn added<E>(from: usize, added: Vec<E>) -> Option<ListElementaryChange<E>> {
    (!added.is_empty()).then_some(ListElementaryChange::Added { from, added })
}

/// Removal of the contiguous run `removed` that started at `at`.
#[must_use]
pub fn removed<E>(at: usize, removed: Vec<E>) -> Option<ListElementaryChange<E>> {
    (!removed.is_empty()).then_some(ListElementaryChange::Removed { at, removed })
}

/// Group the elements selected by `mask` into one `Removed` per run of
/// adjacent original indices.
///
/// A run's position is its original start minus the number of elements
/// removed by earlier runs, so the sub-changes apply left to right.
///
/// # Example
///
/// Removing indices `{1, 2, 3, 7, 8}` from ten elements yields a removal of
/// three at 1 followed by a removal of two at 4.
#[must_use]
pub fn removal_runs<E: Clone>(before: &[E], mask: &[bool]) -> Vec<ListElementaryChange<E>> {
    debug_assert_eq!(before.len(), mask.len());
    let mut runs = Vec::new();
    let mut removed_so_far = 0;
    let mut index = 0;
    while index < mask.len() {
        if !mask[index] {
            index += 1;
            continue;
        }
        let start = index;
        while index < mask.len() && mask[index] {
            index += 1;
        }
        runs.push(ListElementaryChange::Removed {
            at: start - removed_so_far,
            removed: before[start..index].to_vec(),
        });
        removed_so_far += index - start;
    }
    runs
}

/// Replacement of the single element at `index`, unless `eq` says the
/// values match.
#[must_use]
pub fn replaced<E: Clone>(
    index: usize,
    old: &E,
    new: &E,
    eq: impl Fn(&E, &E) -> bool,
) -> Option<ListElementaryChange<E>> {
    (!eq(old, new)).then(|| ListElementaryChange::Replaced {
        from: index,
        removed: vec![old.clone()],
        added: vec![new.clone()],
    })
}

/// Whole-contents replacement.
///
/// Equal contents (same length, pairwise `eq`) report nothing. An empty side
/// degrades the replacement into a plain addition or removal.
#[must_use]
pub fn replaced_all<E: Clone>(
    old: &[E],
    new: &[E],
    eq: impl Fn(&E, &E) -> bool,
) -> Option<ListElementaryChange<E>> {
    if old.len() == new.len() && old.iter().zip(new).all(|(a, b)| eq(a, b)) {
        return None;
    }
    Some(if old.is_empty() {
        ListElementaryChange::Added {
            from: 0,
            added: new.to_vec(),
        }
    } else if new.is_empty() {
        ListElementaryChange::Removed {
            at: 0,
            removed: old.to_vec(),
        }
    } else {
        ListElementaryChange::Replaced {
            from: 0,
            removed: old.to_vec(),
            added: new.to_vec(),
        }
    })
}

/// Stable sort order of `items`: `order[new] = old`.
///
/// Equal elements keep their relative order, so among ties the earliest old
/// index is placed first.
pub fn sort_order<E>(items: &[E], mut compare: impl FnMut(&E, &E) -> Ordering) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| compare(&items[a], &items[b]));
    order
}

/// Reordering of `from..from + order.len()` where `order[new] = old`, both
/// relative to `from`.
///
/// The stored permutation is inverted (`perm[old] = new`) and made absolute.
/// The identity order reports nothing.
#[must_use]
pub fn permuted<E>(from: usize, order: &[usize]) -> Option<ListElementaryChange<E>> {
    if order.iter().enumerate().all(|(new, &old)| new == old) {
        return None;
    }
    let mut permutation = vec![0; order.len()];
    for (new, &old) in order.iter().enumerate() {
        permutation[old] = from + new;
    }
    Some(ListElementaryChange::Permuted { from, permutation })
}

/// Apply `order[new] = old` to `items`.
pub(crate) fn apply_order<E>(items: &mut Vec<E>, order: &[usize]) {
    let mut slots: Vec<Option<E>> = items.drain(..).map(Some).collect();
    items.extend(order.iter().filter_map(|&old| slots[old].take()));
}
