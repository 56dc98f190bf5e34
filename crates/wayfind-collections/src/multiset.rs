//! Order-preserving multiset with an occurrence index.
//!
//! [`IndexedMultiset`] keeps its elements in a plain vector and maintains
//! a map from each distinct value to the ascending list of slots it
//! occupies. Appends update the index in O(1); any mutation that shifts
//! slots (positional removal, sorting, reversing) rebuilds it in O(n), so
//! membership and occurrence queries stay O(1).

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::ops::{Add, BitAnd, Index, Sub};

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::CollectionError;
use crate::value_heap::ValueHeap;

/// Occurrence count reported for a value that is not present.
pub const INVALID: isize = -1;

/// Whether a container accepts a value that is already present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Every push appends (multiset semantics).
    #[default]
    Allow,
    /// Pushing a present value is a no-op (set semantics).
    Reject,
}

/// Occurrence data for one value, as returned by
/// [`IndexedMultiset::access`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessed {
    /// Number of occurrences, or [`INVALID`] when absent.
    pub occurrences: isize,
    /// Slots holding the value, most recently pushed first.
    pub positions: Vec<usize>,
}

impl Accessed {
    /// The value is not in the container.
    pub const NONE: Self = Self {
        occurrences: INVALID,
        positions: Vec::new(),
    };

    #[inline]
    pub fn is_none(&self) -> bool {
        self.occurrences == INVALID && self.positions.is_empty()
    }
}

/// A vector that also answers "is `v` here, how often, and where" in O(1).
#[derive(Clone)]
pub struct IndexedMultiset<T> {
    items: Vec<T>,
    index: HashMap<T, Vec<usize>>,
    policy: DuplicatePolicy,
}

impl<T> IndexedMultiset<T>
where
    T: Eq + Hash + Clone,
{
    /// An empty multiset that allows duplicates.
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::Allow, 0)
    }

    /// An empty multiset with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_policy(DuplicatePolicy::Allow, capacity)
    }

    /// An empty container that rejects duplicate pushes.
    pub fn unique() -> Self {
        Self::with_policy(DuplicatePolicy::Reject, 0)
    }

    pub fn with_policy(policy: DuplicatePolicy, capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            policy,
        }
    }

    #[inline]
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct values.
    #[inline]
    pub fn distinct(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }

    /// Bounds-checked positional access.
    pub fn get(&self, i: usize) -> Result<&T, CollectionError> {
        self.items.get(i).ok_or(CollectionError::IndexOutOfRange {
            index: i,
            len: self.items.len(),
        })
    }

    // -----------------------------------------------------------------------
    // Push
    // -----------------------------------------------------------------------

    /// Append `item`. Returns `false` only when the policy is
    /// [`DuplicatePolicy::Reject`] and `item` is already present.
    pub fn push(&mut self, item: T) -> bool {
        if self.policy == DuplicatePolicy::Reject && self.contains(&item) {
            return false;
        }
        let slot = self.items.len();
        self.index.entry(item.clone()).or_default().push(slot);
        self.items.push(item);
        true
    }

    /// Push every item in order. Returns how many were accepted.
    pub fn push_all(&mut self, items: impl IntoIterator<Item = T>) -> usize {
        items
            .into_iter()
            .fold(0, |n, item| n + usize::from(self.push(item)))
    }

    /// Append `item` only if it is absent, whatever the policy.
    pub fn push_unique(&mut self, item: T) -> bool {
        if self.contains(&item) {
            return false;
        }
        self.push(item)
    }

    // -----------------------------------------------------------------------
    // Pull
    // -----------------------------------------------------------------------

    /// Remove the most recently pushed occurrence of `item`.
    ///
    /// Returns the new length, or `None` if `item` is absent.
    pub fn pull(&mut self, item: &T) -> Option<usize> {
        let slot = *self.index.get(item)?.last()?;
        self.items.remove(slot);
        self.remap();
        Some(self.items.len())
    }

    /// Remove every occurrence of `item`.
    ///
    /// Returns the new length, or `None` if `item` is absent.
    pub fn pull_all(&mut self, item: &T) -> Option<usize> {
        if !self.contains(item) {
            return None;
        }
        self.items.retain(|v| v != item);
        self.remap();
        Some(self.items.len())
    }

    /// [`pull`](Self::pull) each value in turn, ignoring absent ones.
    /// Returns the new length.
    pub fn pull_many(&mut self, items: &[T]) -> usize {
        for item in items {
            self.pull(item);
        }
        self.items.len()
    }

    /// Remove and return the element at slot `i`.
    pub fn pull_at_index(&mut self, i: usize) -> Result<T, CollectionError> {
        self.check_index(i)?;
        let removed = self.items.remove(i);
        self.remap();
        Ok(removed)
    }

    /// Remove the elements at every slot in `indices`, all interpreted
    /// against the current layout. Duplicate indices count once.
    ///
    /// Slots are removed highest first so that no removal shifts a slot
    /// that is still pending. Nothing is removed if any index is out of
    /// range. Returns the new length.
    pub fn pull_multi_index(&mut self, indices: &[usize]) -> Result<usize, CollectionError> {
        let mut pending = ValueHeap::max();
        for &i in indices {
            self.check_index(i)?;
            pending.push(i);
        }

        let mut last = None;
        while let Ok(i) = pending.pop() {
            if last == Some(i) {
                continue;
            }
            self.items.remove(i);
            last = Some(i);
        }
        self.remap();
        Ok(self.items.len())
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[inline]
    pub fn contains(&self, item: &T) -> bool {
        self.index.contains_key(item)
    }

    /// How many times `item` occurs (zero when absent).
    #[inline]
    pub fn occurrences(&self, item: &T) -> usize {
        self.index.get(item).map_or(0, Vec::len)
    }

    /// Occurrence count and slots of `item`, or [`Accessed::NONE`].
    pub fn access(&self, item: &T) -> Accessed {
        match self.index.get(item) {
            Some(slots) => Accessed {
                occurrences: slots.len() as isize,
                positions: slots.iter().rev().copied().collect(),
            },
            None => Accessed::NONE,
        }
    }

    /// Slot of the earliest occurrence of `item`.
    #[inline]
    pub fn first_index_of(&self, item: &T) -> Option<usize> {
        self.index.get(item).and_then(|slots| slots.first().copied())
    }

    /// Slot of the latest occurrence of `item`.
    #[inline]
    pub fn last_index_of(&self, item: &T) -> Option<usize> {
        self.index.get(item).and_then(|slots| slots.last().copied())
    }

    // -----------------------------------------------------------------------
    // Queue / stack views
    // -----------------------------------------------------------------------

    /// The front of the queue.
    pub fn first(&self) -> Result<&T, CollectionError> {
        self.items
            .first()
            .ok_or(CollectionError::Empty { operation: "first" })
    }

    /// Remove and return the front of the queue.
    pub fn first_pop(&mut self) -> Result<T, CollectionError> {
        if self.items.is_empty() {
            return Err(CollectionError::Empty {
                operation: "first_pop",
            });
        }
        let front = self.items.remove(0);
        self.remap();
        Ok(front)
    }

    /// The top of the stack.
    pub fn top(&self) -> Result<&T, CollectionError> {
        self.items
            .last()
            .ok_or(CollectionError::Empty { operation: "top" })
    }

    /// Remove and return the top of the stack.
    pub fn top_pop(&mut self) -> Result<T, CollectionError> {
        let top = self
            .items
            .pop()
            .ok_or(CollectionError::Empty { operation: "top_pop" })?;
        // The tail slot shifts nothing, so trimming its entry is the same
        // as a full rebuild.
        if let Some(slots) = self.index.get_mut(&top) {
            slots.pop();
            if slots.is_empty() {
                self.index.remove(&top);
            }
        }
        Ok(top)
    }

    // -----------------------------------------------------------------------
    // Reflection and sampling
    // -----------------------------------------------------------------------

    /// The element mirrored across the middle: slot `len - 1 - i`.
    pub fn mirror(&self, i: usize) -> Result<&T, CollectionError> {
        self.mirror_from(0, i)
    }

    /// The element mirrored across the middle of `minimum..len`: slot
    /// `minimum + len - 1 - i`. Fails unless `minimum <= i < len`.
    pub fn mirror_from(&self, minimum: usize, i: usize) -> Result<&T, CollectionError> {
        self.check_index(i)?;
        let slot = minimum.saturating_add(self.items.len() - 1 - i);
        self.check_index(slot)?;
        Ok(&self.items[slot])
    }

    /// The element at `i` paired with its mirror.
    pub fn reflect(&self, i: usize) -> Result<(&T, &T), CollectionError> {
        self.reflect_from(0, i)
    }

    /// The element at `i` paired with its mirror over `minimum..len`.
    pub fn reflect_from(&self, minimum: usize, i: usize) -> Result<(&T, &T), CollectionError> {
        Ok((self.get(i)?, self.mirror_from(minimum, i)?))
    }

    /// A uniformly chosen element, or `None` when empty.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        self.items.choose(rng)
    }

    /// A new container holding `count` elements of `source` from `start`,
    /// with the same duplicate policy.
    pub fn copy_range(source: &Self, start: usize, count: usize) -> Result<Self, CollectionError> {
        let end = source.check_range(start, count)?;
        let mut out = Self::with_policy(source.policy, count);
        out.push_all(source.items[start..end].iter().cloned());
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Reordering
    // -----------------------------------------------------------------------

    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.items.sort();
        self.remap();
    }

    pub fn sort_by(&mut self, compare: impl FnMut(&T, &T) -> Ordering) {
        self.items.sort_by(compare);
        self.remap();
    }

    /// Sort the `count` elements starting at `start`.
    pub fn sort_range_by(
        &mut self,
        start: usize,
        count: usize,
        compare: impl FnMut(&T, &T) -> Ordering,
    ) -> Result<(), CollectionError> {
        let end = self.check_range(start, count)?;
        self.items[start..end].sort_by(compare);
        self.remap();
        Ok(())
    }

    pub fn reverse(&mut self) {
        self.items.reverse();
        self.remap();
    }

    /// Reverse the `count` elements starting at `start`.
    pub fn reverse_range(&mut self, start: usize, count: usize) -> Result<(), CollectionError> {
        let end = self.check_range(start, count)?;
        self.items[start..end].reverse();
        self.remap();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Set algebra
    // -----------------------------------------------------------------------

    /// Elements of `self` followed by elements of `other`, duplicates kept
    /// (subject to `self`'s policy).
    pub fn union(&self, other: &Self) -> Self {
        let mut out = Self::with_policy(self.policy, self.len() + other.len());
        out.push_all(self.items.iter().chain(other.items.iter()).cloned());
        out
    }

    /// Elements of `self` whose value `other` also contains.
    pub fn intersection(&self, other: &Self) -> Self {
        self.filtered(|v| other.contains(v))
    }

    /// Elements of `self` whose value `other` does not contain.
    pub fn difference(&self, other: &Self) -> Self {
        self.filtered(|v| !other.contains(v))
    }

    /// [`union`](Self::union) over operands that may be absent.
    pub fn try_union(left: Option<&Self>, right: Option<&Self>) -> Result<Self, CollectionError> {
        let (left, right) = Self::both(left, right)?;
        Ok(left.union(right))
    }

    /// [`intersection`](Self::intersection) over operands that may be absent.
    pub fn try_intersection(
        left: Option<&Self>,
        right: Option<&Self>,
    ) -> Result<Self, CollectionError> {
        let (left, right) = Self::both(left, right)?;
        Ok(left.intersection(right))
    }

    /// [`difference`](Self::difference) over operands that may be absent.
    pub fn try_difference(
        left: Option<&Self>,
        right: Option<&Self>,
    ) -> Result<Self, CollectionError> {
        let (left, right) = Self::both(left, right)?;
        Ok(left.difference(right))
    }

    /// Render as `0: a, 1: b, ...`.
    pub fn print_with_index(&self) -> String
    where
        T: fmt::Display,
    {
        self.items
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{i}: {v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Rebuild the occurrence index from the element order.
    fn remap(&mut self) {
        self.index.clear();
        for (slot, item) in self.items.iter().enumerate() {
            self.index.entry(item.clone()).or_default().push(slot);
        }
    }

    fn filtered(&self, keep: impl Fn(&T) -> bool) -> Self {
        let mut out = Self::with_policy(self.policy, 0);
        out.push_all(self.items.iter().filter(|v| keep(v)).cloned());
        out
    }

    fn both<'a>(
        left: Option<&'a Self>,
        right: Option<&'a Self>,
    ) -> Result<(&'a Self, &'a Self), CollectionError> {
        let left = left.ok_or(CollectionError::Uninitialized { operand: "left" })?;
        let right = right.ok_or(CollectionError::Uninitialized { operand: "right" })?;
        Ok((left, right))
    }

    #[inline]
    fn check_index(&self, i: usize) -> Result<(), CollectionError> {
        if i >= self.items.len() {
            return Err(CollectionError::IndexOutOfRange {
                index: i,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    fn check_range(&self, start: usize, count: usize) -> Result<usize, CollectionError> {
        let len = self.items.len();
        match start.checked_add(count) {
            Some(end) if end <= len => Ok(end),
            _ => Err(CollectionError::RangeOutOfBounds { start, count, len }),
        }
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<T: Eq + Hash + Clone> Default for IndexedMultiset<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for IndexedMultiset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: fmt::Debug> fmt::Debug for IndexedMultiset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<T: fmt::Display> fmt::Display for IndexedMultiset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Panics when `i` is out of range; [`get`](IndexedMultiset::get) is the
/// checked form.
impl<T> Index<usize> for IndexedMultiset<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.items[i]
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for IndexedMultiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = Self::new();
        out.push_all(iter);
        out
    }
}

impl<T: Eq + Hash + Clone> Extend<T> for IndexedMultiset<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.push_all(iter);
    }
}

impl<T> IntoIterator for IndexedMultiset<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a IndexedMultiset<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Eq + Hash + Clone> Add for &IndexedMultiset<T> {
    type Output = IndexedMultiset<T>;

    fn add(self, rhs: Self) -> IndexedMultiset<T> {
        self.union(rhs)
    }
}

impl<T: Eq + Hash + Clone> BitAnd for &IndexedMultiset<T> {
    type Output = IndexedMultiset<T>;

    fn bitand(self, rhs: Self) -> IndexedMultiset<T> {
        self.intersection(rhs)
    }
}

impl<T: Eq + Hash + Clone> Sub for &IndexedMultiset<T> {
    type Output = IndexedMultiset<T>;

    fn sub(self, rhs: Self) -> IndexedMultiset<T> {
        self.difference(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    fn assert_index_consistent<T: Eq + Hash + Clone + fmt::Debug>(m: &IndexedMultiset<T>) {
        let mut total = 0;
        for (value, slots) in &m.index {
            assert!(!slots.is_empty(), "empty slot list for {value:?}");
            assert!(slots.windows(2).all(|w| w[0] < w[1]));
            for &s in slots {
                assert_eq!(&m.items[s], value);
            }
            total += slots.len();
        }
        assert_eq!(total, m.items.len());
        for item in &m.items {
            assert_eq!(
                m.occurrences(item),
                m.items.iter().filter(|v| *v == item).count()
            );
        }
    }

    fn of(values: &[i32]) -> IndexedMultiset<i32> {
        values.iter().copied().collect()
    }

    #[test]
    fn occurrence_tracking() {
        let mut m = of(&[1, 1, 2, 1]);
        assert_eq!(m.access(&1).occurrences, 3);
        assert_eq!(m.access(&1).positions, vec![3, 1, 0]);

        assert_eq!(m.pull(&1), Some(3));
        assert_eq!(m.access(&1).occurrences, 2);
        assert!(m.contains(&1));
        assert_eq!(m.as_slice(), &[1, 1, 2]);

        assert_eq!(m.pull_all(&1), Some(1));
        assert_eq!(m.occurrences(&1), 0);
        assert!(!m.contains(&1));
        assert!(m.access(&1).is_none());
        assert_index_consistent(&m);
    }

    #[test]
    fn pull_absent_returns_sentinel() {
        let mut m = of(&[4, 5]);
        assert_eq!(m.pull(&9), None);
        assert_eq!(m.pull_all(&9), None);
        assert_eq!(m.access(&9), Accessed::NONE);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn pull_multi_index_removes_original_slots() {
        let mut m = of(&[10, 11, 12, 13, 14, 15]);
        assert_eq!(m.pull_multi_index(&[2, 5, 0]), Ok(3));
        assert_eq!(m.as_slice(), &[11, 13, 14]);
        assert_index_consistent(&m);
    }

    #[test]
    fn pull_multi_index_ignores_repeats_and_checks_bounds() {
        let mut m = of(&[1, 2, 3, 4]);
        assert_eq!(m.pull_multi_index(&[1, 1, 3]), Ok(2));
        assert_eq!(m.as_slice(), &[1, 3]);

        assert_eq!(
            m.pull_multi_index(&[0, 2]),
            Err(CollectionError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(m.as_slice(), &[1, 3], "failed removal must not mutate");
    }

    #[test]
    fn pull_at_index_bounds() {
        let mut m = of(&[7, 8, 9]);
        assert_eq!(m.pull_at_index(1), Ok(8));
        assert_eq!(
            m.pull_at_index(2),
            Err(CollectionError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            m.get(5),
            Err(CollectionError::IndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn push_pull_sequence() {
        let mut m = IndexedMultiset::with_capacity(17);
        m.push_all((1..=17).rev());
        assert_eq!(m.len(), 17);

        assert!(!m.push_unique(10));
        assert_eq!(m.len(), 17);

        for v in [
            15, 6, 12, 1, 11, 1, 17, 18, 19, 20, 18, 21, 26, 18, 23, 24, 25, 18, 26, 27,
        ] {
            m.push_unique(v);
        }
        assert_eq!(m.len(), 26);

        m.push_all([32, 33, 34, 33, 35, 36, 37, 33, 38, 33, 39, 40, 33, 41]);
        assert_eq!(m.len(), 40);

        m.pull(&15);
        assert!(!m.contains(&15));
        assert_eq!(m.len(), 39);

        assert_eq!(m.access(&33).occurrences, 5);
        assert_eq!(m.pull_all(&33), Some(34));

        assert_eq!(m.pull_many(&[13, 34, 19, 20, 6, 41, 21, 1, 38]), 25);
        for gone in [13, 34, 19, 20, 6, 41, 21, 1, 38] {
            assert!(!m.contains(&gone));
        }

        assert_eq!(m.pull_at_index(3), Ok(12));
        assert_eq!(m.len(), 24);

        m.pull_multi_index(&[2, 4, 6, 8, 23, 21, 19, 17]).unwrap();
        assert_eq!(m.len(), 16);
        for gone in [40, 37, 35, 27, 5, 8, 10, 12] {
            assert!(!m.contains(&gone));
        }
        assert_eq!(
            m.to_string(),
            "17, 16, 11, 9, 7, 4, 3, 2, 18, 26, 23, 24, 25, 32, 36, 39"
        );
        assert_index_consistent(&m);
    }

    #[test]
    fn queue_and_stack_views() {
        let mut m: IndexedMultiset<i32> = (1..=17).rev().collect();
        m.push(18);
        assert_eq!(m.first_pop(), Ok(17));
        assert_eq!(m.first_pop(), Ok(16));
        assert_eq!(m.top_pop(), Ok(18));
        assert_eq!(m.top_pop(), Ok(1));
        assert_eq!(m.len(), 14);
        assert_eq!(m.first(), Ok(&15));
        assert_eq!(m.top(), Ok(&2));
        assert_eq!(m.mirror(0), Ok(&2));
        assert_eq!(m.mirror(m.len() - 1), Ok(&15));
        assert_eq!(m.reflect(1), Ok((&14, &3)));
        assert_index_consistent(&m);

        let mut empty = IndexedMultiset::<i32>::new();
        assert_eq!(
            empty.first_pop(),
            Err(CollectionError::Empty {
                operation: "first_pop"
            })
        );
        assert!(empty.top().is_err());
    }

    #[test]
    fn top_pop_with_duplicates() {
        let mut m = of(&[5, 6, 5]);
        assert_eq!(m.top_pop(), Ok(5));
        assert_eq!(m.access(&5).positions, vec![0]);
        assert_eq!(m.top_pop(), Ok(6));
        assert!(!m.contains(&6));
        assert_index_consistent(&m);
    }

    #[test]
    fn mirror_within_a_window() {
        let m = of(&[10, 20, 30, 40, 50]);
        assert_eq!(m.mirror_from(2, 2), Ok(&50));
        assert_eq!(m.mirror_from(2, 3), Ok(&40));
        assert_eq!(m.mirror_from(2, 4), Ok(&30));
        assert_eq!(m.reflect_from(1, 2), Ok((&30, &40)));
        for i in 0..m.len() {
            assert_eq!(m.mirror_from(0, i), m.mirror(i));
        }
        assert_eq!(
            m.mirror_from(3, 1),
            Err(CollectionError::IndexOutOfRange { index: 6, len: 5 })
        );
        assert_eq!(
            m.reflect_from(0, 5),
            Err(CollectionError::IndexOutOfRange { index: 5, len: 5 })
        );
    }

    #[test]
    fn index_operator_matches_get() {
        let m = of(&[7, 8, 9]);
        for i in 0..m.len() {
            assert_eq!(Ok(&m[i]), m.get(i));
        }
        assert!(m.get(3).is_err());
    }

    #[test]
    #[should_panic]
    fn index_operator_panics_past_the_end() {
        let m = of(&[7, 8, 9]);
        let _ = m[3];
    }

    #[test]
    fn first_and_last_index() {
        let m = of(&[3, 1, 3, 2, 3]);
        assert_eq!(m.first_index_of(&3), Some(0));
        assert_eq!(m.last_index_of(&3), Some(4));
        assert_eq!(m.first_index_of(&2), Some(3));
        assert_eq!(m.last_index_of(&9), None);
    }

    #[test]
    fn set_algebra() {
        let m = of(&[15, 14, 13, 12, 11, 10, 8, 7, 6, 5, 4, 3, 2]);
        let evens = of(&[-2, 0, 2, 4, 6, 8, 10, 12, 14, 16]);

        let and = &evens & &m;
        assert!(and.contains(&2) && and.contains(&10));
        assert!(!and.contains(&16) && !and.contains(&18));

        let diff = &evens - &m;
        assert_eq!(diff.as_slice(), &[-2, 0, 16]);

        let joined = &of(&[1, 2]) + &of(&[2, 3]);
        assert_eq!(joined.as_slice(), &[1, 2, 2, 3]);
        assert_eq!(joined.occurrences(&2), 2);
        assert_index_consistent(&joined);

        // Operands are untouched.
        assert_eq!(m.len(), 13);
        assert_eq!(evens.len(), 10);
    }

    #[test]
    fn absent_operands_are_reported() {
        let m = of(&[1]);
        assert_eq!(
            IndexedMultiset::try_union(None, Some(&m)),
            Err(CollectionError::Uninitialized { operand: "left" })
        );
        assert_eq!(
            IndexedMultiset::try_difference(Some(&m), None),
            Err(CollectionError::Uninitialized { operand: "right" })
        );
        assert_eq!(
            IndexedMultiset::try_intersection(Some(&m), Some(&m)).map(|r| r.len()),
            Ok(1)
        );
    }

    #[test]
    fn reject_policy_keeps_values_unique() {
        let mut set = IndexedMultiset::unique();
        assert!(set.push("a"));
        assert!(!set.push("a"));
        assert_eq!(set.push_all(["b", "a", "c", "b"]), 2);
        assert_eq!(set.as_slice(), &["a", "b", "c"]);
        let joined = &set + &set;
        assert_eq!(joined.len(), 3);
    }

    #[test]
    fn sort_and_reverse_remap() {
        let mut m = of(&[4, 2, 9, 2, 7]);
        m.sort();
        assert_eq!(m.as_slice(), &[2, 2, 4, 7, 9]);
        assert_eq!(m.first_index_of(&9), Some(4));
        assert_index_consistent(&m);

        m.reverse();
        assert_eq!(m.first_index_of(&9), Some(0));
        assert_index_consistent(&m);

        m.reverse_range(1, 3).unwrap();
        assert_eq!(m.as_slice(), &[9, 2, 4, 7, 2]);
        assert_index_consistent(&m);

        m.sort_range_by(0, 3, |a, b| a.cmp(b)).unwrap();
        assert_eq!(m.as_slice(), &[2, 4, 9, 7, 2]);
        assert_index_consistent(&m);

        assert_eq!(
            m.reverse_range(3, 5),
            Err(CollectionError::RangeOutOfBounds {
                start: 3,
                count: 5,
                len: 5
            })
        );

        m.sort_by(|a, b| b.cmp(a));
        assert_eq!(m.as_slice(), &[9, 7, 4, 2, 2]);
        assert_index_consistent(&m);
    }

    #[test]
    fn copy_range_window() {
        let m = of(&[11, 12, 13, 14, 15, 16, 17, 18, 19, 20]);
        let w = IndexedMultiset::copy_range(&m, 3, m.len() - 3).unwrap();
        assert_eq!(w.len(), 7);
        assert_eq!(w[0], m[3]);
        assert!(IndexedMultiset::copy_range(&m, 0, 0).unwrap().is_empty());
        assert!(IndexedMultiset::copy_range(&m, 4, m.len()).is_err());
    }

    #[test]
    fn random_and_printing() {
        let mut rng = StdRng::seed_from_u64(11);
        let m = of(&[3, 6, 9]);
        for _ in 0..20 {
            let v = m.random(&mut rng).copied().unwrap();
            assert!(m.contains(&v));
        }
        assert!(IndexedMultiset::<i32>::new().random(&mut rng).is_none());
        assert_eq!(m.print_with_index(), "0: 3, 1: 6, 2: 9");
        assert_eq!(format!("{m:?}"), "[3, 6, 9]");
    }

    #[test]
    fn randomized_mutations_keep_index_consistent() {
        let mut rng = StdRng::seed_from_u64(0xfeed);
        let mut m = IndexedMultiset::new();
        let mut mirror: Vec<u8> = Vec::new();

        for _ in 0..1_500 {
            let v = rng.random_range(0..12u8);
            match rng.random_range(0..6u32) {
                0 | 1 => {
                    m.push(v);
                    mirror.push(v);
                }
                2 => {
                    let expected = mirror.iter().rposition(|&x| x == v);
                    let got = m.pull(&v);
                    match expected {
                        Some(p) => {
                            mirror.remove(p);
                            assert_eq!(got, Some(mirror.len()));
                        }
                        None => assert_eq!(got, None),
                    }
                }
                3 if !mirror.is_empty() => {
                    let i = rng.random_range(0..mirror.len());
                    assert_eq!(m.pull_at_index(i), Ok(mirror.remove(i)));
                }
                4 => {
                    m.sort();
                    mirror.sort();
                }
                _ => {
                    m.reverse();
                    mirror.reverse();
                }
            }
            assert_eq!(m.as_slice(), mirror.as_slice());
            assert_index_consistent(&m);
        }
    }
}
