#![forbid(unsafe_code)]

//! Observable ordered sequences.

use std::cmp::Ordering;
use std::fmt;

use super::{ObservableContainer, ObservableKind};
use crate::change::{ListElementaryChange, ListKind};
use crate::config::NotifyConfig;
use crate::diff;
use crate::error::{CollectionError, Result};

/// Element equality of a list.
pub type ElementEquality<E> = fn(&E, &E) -> bool;

impl<E: Clone + fmt::Debug + 'static> ObservableKind for ListKind<E> {
    type Equality = ElementEquality<E>;
}

/// Observable `Vec`.
///
/// Element equality (used by `set`, `set_all`, `contains`, `index_of`,
/// `remove_item`, `remove_all` and `retain_all`) defaults to `PartialEq`
/// and can be replaced at construction, e.g. by an identity comparison.
pub type ObservableList<E> = ObservableContainer<ListKind<E>>;

fn partial_eq<E: PartialEq>(a: &E, b: &E) -> bool {
    a == b
}

impl<E: Clone + fmt::Debug + PartialEq + 'static> ObservableList<E> {
    /// Empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// List over `items`.
    #[must_use]
    pub fn from_vec(items: Vec<E>) -> Self {
        Self::with_config(items, NotifyConfig::default())
    }

    /// List over `items` with a custom delivery configuration.
    #[must_use]
    pub fn with_config(items: Vec<E>, config: NotifyConfig) -> Self {
        Self::with_equality(items, partial_eq::<E>, config)
    }
}

impl<E: Clone + fmt::Debug + PartialEq + 'static> Default for ObservableList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone + fmt::Debug + PartialEq + 'static> FromIterator<E> for ObservableList<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<E: Clone + fmt::Debug + 'static> ObservableList<E> {
    /// List over `items` comparing elements with `equality`.
    #[must_use]
    pub fn with_equality(
        items: Vec<E>,
        equality: ElementEquality<E>,
        config: NotifyConfig,
    ) -> Self {
        Self::from_parts(items, equality, config)
    }

    // --- reads ---

    #[must_use]
    pub fn len(&self) -> usize {
        self.with(Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.with(Vec::is_empty)
    }

    /// Clone of the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<E> {
        self.with(|items| items.get(index).cloned())
    }

    /// Whether some element equals `item` under the list's equality.
    #[must_use]
    pub fn contains(&self, item: &E) -> bool {
        self.index_of(item).is_some()
    }

    /// Index of the first element equal to `item`.
    #[must_use]
    pub fn index_of(&self, item: &E) -> Option<usize> {
        let eq = self.equality();
        self.with(|items| items.iter().position(|e| eq(e, item)))
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<E> {
        self.snapshot()
    }

    // --- insertion ---

    /// Append `item`.
    pub fn push(&self, item: E) {
        self.mutate(|items, _| {
            let from = items.len();
            items.push(item.clone());
            ((), diff::list::added(from, vec![item]).into_iter().collect())
        });
    }

    /// Insert `item` at `index`.
    ///
    /// # Errors
    ///
    /// [`CollectionError::IndexOutOfBounds`] if `index > len`.
    pub fn insert(&self, index: usize, item: E) -> Result<()> {
        self.insert_all(index, [item])
    }

    /// Append every item of `iter`. Returns whether anything was added.
    pub fn extend(&self, iter: impl IntoIterator<Item = E>) -> bool {
        let added: Vec<E> = iter.into_iter().collect();
        self.mutate(|items, _| {
            let from = items.len();
            items.extend_from_slice(&added);
            let change = diff::list::added(from, added);
            (change.is_some(), change.into_iter().collect())
        })
    }

    /// Insert every item of `iter` at `index`, keeping their order.
    ///
    /// # Errors
    ///
    /// [`CollectionError::IndexOutOfBounds`] if `index > len`.
    pub fn insert_all(&self, index: usize, iter: impl IntoIterator<Item = E>) -> Result<()> {
        let added: Vec<E> = iter.into_iter().collect();
        self.commit(|items, _| {
            CollectionError::check_position(index, items.len())?;
            items.splice(index..index, added.iter().cloned());
            Ok(((), diff::list::added(index, added).into_iter().collect()))
        })
    }

    // --- removal ---

    /// Remove and return the element at `index`.
    ///
    /// # Errors
    ///
    /// [`CollectionError::IndexOutOfBounds`] if `index >= len`.
    pub fn remove(&self, index: usize) -> Result<E> {
        self.commit(|items, _| {
            CollectionError::check_index(index, items.len())?;
            let removed = items.remove(index);
            let change = diff::list::removed(index, vec![removed.clone()]);
            Ok((removed, change.into_iter().collect()))
        })
    }

    /// Remove the first element equal to `item`. Returns whether one was
    /// found.
    pub fn remove_item(&self, item: &E) -> bool {
        self.mutate(|items, eq| match items.iter().position(|e| eq(e, item)) {
            Some(index) => {
                let removed = items.remove(index);
                (true, diff::list::removed(index, vec![removed]).into_iter().collect())
            }
            None => (false, Vec::new()),
        })
    }

    /// Remove and return the elements in `from..to`.
    ///
    /// # Errors
    ///
    /// [`CollectionError::RangeOutOfBounds`] unless `from <= to <= len`.
    pub fn remove_range(&self, from: usize, to: usize) -> Result<Vec<E>> {
        self.commit(|items, _| {
            CollectionError::check_range(from, to, items.len())?;
            let removed: Vec<E> = items.drain(from..to).collect();
            let change = diff::list::removed(from, removed.clone());
            Ok((removed, change.into_iter().collect()))
        })
    }

    /// Remove every element equal to one of `targets`. Returns whether
    /// anything was removed.
    pub fn remove_all(&self, targets: &[E]) -> bool {
        self.remove_where(|item, eq| targets.iter().any(|t| eq(item, t)))
    }

    /// Remove every element matching `predicate`. Returns whether anything
    /// was removed.
    pub fn remove_if(&self, mut predicate: impl FnMut(&E) -> bool) -> bool {
        self.remove_where(|item, _| predicate(item))
    }

    /// Keep only elements equal to one of `targets`. Returns whether
    /// anything was removed.
    pub fn retain_all(&self, targets: &[E]) -> bool {
        self.remove_where(|item, eq| !targets.iter().any(|t| eq(item, t)))
    }

    /// Keep only elements matching `predicate`. Returns whether anything was
    /// removed.
    pub fn retain_if(&self, mut predicate: impl FnMut(&E) -> bool) -> bool {
        self.remove_where(|item, _| !predicate(item))
    }

    /// Remove every element of the list.
    pub fn clear(&self) {
        self.mutate(|items, _| {
            let removed = std::mem::take(items);
            ((), diff::list::removed(0, removed).into_iter().collect())
        });
    }

    fn remove_where(&self, mut select: impl FnMut(&E, ElementEquality<E>) -> bool) -> bool {
        self.mutate(|items, eq| {
            let mask: Vec<bool> = items.iter().map(|item| select(item, eq)).collect();
            let runs = diff::list::removal_runs(items, &mask);
            if !runs.is_empty() {
                let mut keep = mask.iter();
                items.retain(|_| !matches!(keep.next(), Some(true)));
            }
            (!runs.is_empty(), runs)
        })
    }

    // --- replacement ---

    /// Replace the element at `index`, returning the previous one. A value
    /// equal under the list's equality is not stored and fires nothing; the
    /// current element is returned.
    ///
    /// # Errors
    ///
    /// [`CollectionError::IndexOutOfBounds`] if `index >= len`.
    pub fn set(&self, index: usize, item: E) -> Result<E> {
        self.commit(|items, eq| {
            CollectionError::check_index(index, items.len())?;
            match diff::list::replaced(index, &items[index], &item, eq) {
                Some(change) => Ok((std::mem::replace(&mut items[index], item), vec![change])),
                None => Ok((items[index].clone(), Vec::new())),
            }
        })
    }

    /// Replace the whole contents. Returns whether anything changed.
    pub fn set_all(&self, iter: impl IntoIterator<Item = E>) -> bool {
        let new: Vec<E> = iter.into_iter().collect();
        self.mutate(|items, eq| {
            let change = diff::list::replaced_all(items, &new, eq);
            if change.is_some() {
                *items = new;
            }
            (change.is_some(), change.into_iter().collect())
        })
    }

    /// Replace each element by `map(element)`. Returns whether anything
    /// changed.
    pub fn replace_all(&self, mut map: impl FnMut(&E) -> E) -> bool {
        self.mutate(|items, eq| {
            let new: Vec<E> = items.iter().map(&mut map).collect();
            let change = diff::list::replaced_all(items, &new, eq);
            if change.is_some() {
                *items = new;
            }
            (change.is_some(), change.into_iter().collect())
        })
    }

    // --- ordering ---

    /// Stable sort with `compare`. Already sorted contents fire nothing.
    pub fn sort_by(&self, compare: impl FnMut(&E, &E) -> Ordering) {
        self.mutate(|items, _| {
            let order = diff::list::sort_order(items, compare);
            let change: Option<ListElementaryChange<E>> = diff::list::permuted(0, &order);
            if change.is_some() {
                diff::list::apply_order(items, &order);
            }
            ((), change.into_iter().collect())
        });
    }

    /// Stable sort by the key `f` extracts.
    pub fn sort_by_key<T: Ord>(&self, mut f: impl FnMut(&E) -> T) {
        self.sort_by(|a, b| f(a).cmp(&f(b)));
    }
}

impl<E: Clone + fmt::Debug + Ord + 'static> ObservableList<E> {
    /// Stable sort in ascending order.
    pub fn sort(&self) {
        self.sort_by(Ord::cmp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::{ListChange, ListChangeKind};
    use crate::listener::ObservableCollection;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Record every delivered change; also check each one replays back to
    /// its previous contents.
    fn record<E: Clone + fmt::Debug + PartialEq + 'static>(
        list: &ObservableList<E>,
    ) -> Rc<RefCell<Vec<ListChange<E>>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let reader = list.clone();
        list.on_change(move |change: &ListChange<E>| {
            let restored = change
                .reverse_previous_contents(&reader.to_vec())
                .expect("replay");
            assert_eq!(&restored, change.previous_contents());
            sink.borrow_mut().push(change.clone());
        });
        log
    }

    fn only(log: &Rc<RefCell<Vec<ListChange<char>>>>) -> ListElementaryChange<char> {
        let log = log.borrow();
        assert_eq!(log.len(), 1, "expected exactly one change");
        assert_eq!(log[0].len(), 1, "expected exactly one sub-change");
        log[0].sub_changes()[0].clone()
    }

    fn chars(s: &str) -> ObservableList<char> {
        s.chars().collect()
    }

    #[test]
    fn push_and_insert_report_added() {
        let list = chars("ab");
        let log = record(&list);
        list.push('c');
        assert_eq!(
            only(&log),
            ListElementaryChange::Added {
                from: 2,
                added: vec!['c']
            }
        );
        log.borrow_mut().clear();

        list.insert(0, 'z').unwrap();
        assert_eq!(only(&log).from(), 0);
        assert_eq!(list.to_vec(), vec!['z', 'a', 'b', 'c']);
    }

    #[test]
    fn insert_out_of_bounds_fails_silently() {
        let list = chars("ab");
        let log = record(&list);
        assert_eq!(
            list.insert(3, 'x'),
            Err(CollectionError::IndexOutOfBounds { index: 3, len: 2 })
        );
        assert!(list.remove(2).is_err());
        assert!(list.set(9, 'q').is_err());
        assert!(list.remove_range(1, 3).is_err());
        assert!(log.borrow().is_empty());
        assert_eq!(list.to_vec(), vec!['a', 'b']);
    }

    #[test]
    fn insert_all_keeps_order() {
        let list = chars("ad");
        let log = record(&list);
        list.insert_all(1, ['b', 'c']).unwrap();
        assert_eq!(list.to_vec(), vec!['a', 'b', 'c', 'd']);
        let sub = only(&log);
        assert_eq!((sub.from(), sub.to()), (1, 3));
        assert_eq!(sub.added(), &['b', 'c']);
    }

    #[test]
    fn empty_bulk_insert_fires_nothing() {
        let list = chars("a");
        let log = record(&list);
        assert!(!list.extend(std::iter::empty()));
        list.insert_all(0, Vec::new()).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn remove_reports_insertion_point() {
        let list = chars("abc");
        let log = record(&list);
        assert_eq!(list.remove(1), Ok('b'));
        let sub = only(&log);
        assert_eq!(sub.kind(), ListChangeKind::Removed);
        assert_eq!((sub.from(), sub.to()), (1, 1));
        assert_eq!(sub.removed(), &['b']);
    }

    #[test]
    fn remove_range_and_item() {
        let list = chars("abcdef");
        let log = record(&list);
        assert_eq!(list.remove_range(1, 3), Ok(vec!['b', 'c']));
        assert!(list.remove_item(&'e'));
        assert!(!list.remove_item(&'x'));
        assert_eq!(list.to_vec(), vec!['a', 'd', 'f']);
        assert_eq!(log.borrow().len(), 2);
        assert!(list.remove_range(1, 1).is_ok());
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn bulk_removal_groups_runs() {
        let list: ObservableList<u32> = (0..10).collect();
        let log = record(&list);
        assert!(list.remove_all(&[1, 2, 3, 7, 8]));
        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(
            log[0].sub_changes(),
            &[
                ListElementaryChange::Removed {
                    at: 1,
                    removed: vec![1, 2, 3]
                },
                ListElementaryChange::Removed {
                    at: 4,
                    removed: vec![7, 8]
                },
            ]
        );
        assert_eq!(list.to_vec(), vec![0, 4, 5, 6, 9]);
    }

    #[test]
    fn retain_and_predicates() {
        let list: ObservableList<u32> = (0..8).collect();
        let log = record(&list);
        assert!(list.retain_if(|n| n % 2 == 0));
        assert_eq!(list.to_vec(), vec![0, 2, 4, 6]);
        assert_eq!(log.borrow()[0].len(), 4);

        assert!(list.remove_if(|&n| n > 3));
        assert!(list.retain_all(&[2]));
        assert_eq!(list.to_vec(), vec![2]);
        assert!(!list.remove_all(&[7, 9]));
        assert!(!list.retain_all(&[2]));
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn set_equal_value_is_silent() {
        let list = chars("ab");
        let log = record(&list);
        assert_eq!(list.set(0, 'a'), Ok('a'));
        assert!(log.borrow().is_empty());
        assert_eq!(list.set(0, 'q'), Ok('a'));
        let sub = only(&log);
        assert!(sub.was_replaced());
        assert_eq!((sub.removed(), sub.added()), (&['a'][..], &['q'][..]));
    }

    #[test]
    fn custom_equality_drives_no_op_detection() {
        fn same_parity(a: &u8, b: &u8) -> bool {
            a % 2 == b % 2
        }
        let list =
            ObservableList::with_equality(vec![1u8, 2], same_parity, NotifyConfig::default());
        let log = record(&list);
        assert_eq!(list.set(0, 3), Ok(1));
        assert!(log.borrow().is_empty());
        assert_eq!(list.to_vec(), vec![1, 2]);
        assert_eq!(list.set(0, 4), Ok(1));
        assert_eq!(list.to_vec(), vec![4, 2]);
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(list.index_of(&6), Some(0));
        assert!(!list.contains(&5));
    }

    #[test]
    fn set_all_shapes() {
        let list = chars("");
        let log = record(&list);
        assert!(list.set_all("ab".chars()));
        assert!(only(&log).was_added());
        log.borrow_mut().clear();

        assert!(!list.set_all("ab".chars()));
        assert!(log.borrow().is_empty());

        assert!(list.set_all("xyz".chars()));
        let sub = only(&log);
        assert!(sub.was_replaced());
        assert_eq!((sub.from(), sub.to()), (0, 3));
        log.borrow_mut().clear();

        assert!(list.set_all(std::iter::empty()));
        assert!(only(&log).was_removed());
    }

    #[test]
    fn replace_all_maps_elements() {
        let list = chars("ab");
        let log = record(&list);
        assert!(list.replace_all(|c| c.to_ascii_uppercase()));
        assert_eq!(list.to_vec(), vec!['A', 'B']);
        assert!(!list.replace_all(|c| *c));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn clear_reports_everything() {
        let list = chars("abc");
        let log = record(&list);
        list.clear();
        assert_eq!(only(&log).removed(), &['a', 'b', 'c']);
        log.borrow_mut().clear();
        list.clear();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn sort_reports_old_to_new() {
        let list = ObservableList::from_vec(vec![3, 1, 2]);
        let log = record(&list);
        list.sort();
        assert_eq!(list.to_vec(), vec![1, 2, 3]);

        let log = log.borrow();
        let change = &log[0];
        assert!(change.next());
        assert!(change.was_permuted().unwrap());
        assert_eq!(change.permutation(0), Ok(2));
        assert_eq!(change.permutation(1), Ok(0));
        assert_eq!(change.permutation(2), Ok(1));
        assert!(change.permutation(3).is_err());
    }

    #[test]
    fn sorted_list_fires_nothing() {
        let list = ObservableList::from_vec(vec![1, 2, 2, 3]);
        let log = record(&list);
        list.sort();
        list.sort_by_key(|n| *n / 10);
        assert!(log.borrow().is_empty());
        list.sort_by(|a, b| b.cmp(a));
        assert_eq!(list.to_vec(), vec![3, 2, 2, 1]);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn accessor_on_non_permutation_is_usage_error() {
        let list = chars("a");
        let log = record(&list);
        list.push('b');
        let log = log.borrow();
        assert!(log[0].next());
        assert_eq!(log[0].permutation(0), Err(CollectionError::NotPermutation));
    }

    #[test]
    fn reads() {
        let list = chars("abc");
        assert_eq!(list.len(), 3);
        assert!(!list.is_empty());
        assert_eq!(list.get(1), Some('b'));
        assert_eq!(list.get(7), None);
        assert_eq!(list.index_of(&'c'), Some(2));
        assert_eq!(list.with(|items| items.iter().collect::<String>()), "abc");
        assert!(ObservableList::<u8>::default().is_empty());
    }
}
