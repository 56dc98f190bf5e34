//! Heap over plain values that carry no key of their own.
//!
//! Membership and updates go through [`ValueHeap::find`], a
//! comparator-pruned walk of the tree instead of a side-table lookup.

use std::cmp::Ordering;
use std::fmt;

use crate::error::CollectionError;
use crate::heap::{DEFAULT_CAPACITY, max_first, min_first};
use crate::sift;

/// Binary heap of values ordered by a caller-supplied comparator.
///
/// Uses the same convention as [`BinaryHeap`](crate::BinaryHeap):
/// `compare(a, b) == Greater` means `a` belongs closer to the root.
pub struct ValueHeap<T, C> {
    items: Vec<T>,
    compare: C,
}

impl<T: Ord> ValueHeap<T, fn(&T, &T) -> Ordering> {
    /// Heap that pops the smallest value first.
    pub fn min() -> Self {
        Self::new(min_first::<T>)
    }

    /// Heap that pops the largest value first.
    pub fn max() -> Self {
        Self::new(max_first::<T>)
    }
}

impl<T, C> ValueHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    pub fn new(compare: C) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, compare)
    }

    pub fn with_capacity(capacity: usize, compare: C) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            compare,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// The backing array in heap order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
        let slot = self.items.len() - 1;
        self.sift_up(slot);
    }

    /// Remove and return the highest-priority value.
    pub fn pop(&mut self) -> Result<T, CollectionError> {
        if self.items.is_empty() {
            return Err(CollectionError::Empty { operation: "pop" });
        }
        let first = self.items.swap_remove(0);
        self.sift_down(0);
        Ok(first)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Compact the backing storage to its current occupancy.
    pub fn shrink(&mut self) -> &[T] {
        self.items.shrink_to_fit();
        &self.items
    }

    /// Drain the heap in priority order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.items.len());
        while let Ok(v) = self.pop() {
            out.push(v);
        }
        out
    }

    fn sift_up(&mut self, slot: usize) -> usize {
        let compare = &self.compare;
        sift::sift_up(
            &mut self.items,
            slot,
            |a, b| compare(a, b) == Ordering::Greater,
            |_, _| {},
        )
    }

    fn sift_down(&mut self, slot: usize) -> usize {
        let compare = &self.compare;
        sift::sift_down(
            &mut self.items,
            slot,
            |a, b| compare(a, b) == Ordering::Greater,
            |_, _| {},
        )
    }
}

impl<T, C> ValueHeap<T, C>
where
    T: PartialEq,
    C: Fn(&T, &T) -> Ordering,
{
    /// Slot of a value equal to `value`, if present.
    ///
    /// Walks the tree with an explicit stack, skipping any subtree whose
    /// root `value` outranks: heap order guarantees it cannot appear
    /// below such a root. The walk visits at most `len + 1` slots, so a
    /// corrupted ordering terminates instead of looping.
    pub fn find(&self, value: &T) -> Option<usize> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }
        let mut budget = len + 1;
        let mut stack = vec![0usize];
        while let Some(slot) = stack.pop() {
            if budget == 0 {
                break;
            }
            budget -= 1;

            let here = &self.items[slot];
            if here == value {
                return Some(slot);
            }
            if (self.compare)(value, here) == Ordering::Greater {
                continue;
            }
            let left = slot * 2 + 1;
            for child in [left + 1, left] {
                if child < len {
                    stack.push(child);
                }
            }
        }
        None
    }

    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Replace a value equal to `old` with `new` and restore heap order.
    /// Returns `false` if `old` is not in the heap.
    pub fn update_value(&mut self, old: &T, new: T) -> bool {
        let Some(slot) = self.find(old) else {
            return false;
        };
        self.items[slot] = new;
        let slot = self.sift_up(slot);
        self.sift_down(slot);
        true
    }
}

impl<T: fmt::Debug, C> fmt::Debug for ValueHeap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueHeap")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}
