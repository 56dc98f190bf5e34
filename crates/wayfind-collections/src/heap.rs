//! Comparator-driven binary heap with O(1) membership and in-place
//! re-prioritisation.
//!
//! Every item exposes a stable key through [`HeapItem`]. The heap keeps a
//! side-table from key to slot, updated on every swap, so that
//! [`contains`](BinaryHeap::contains) and the `update_item*` family never
//! scan the backing array.

use std::cmp::Ordering;
use std::fmt;

use crate::error::CollectionError;
use crate::sift;

/// Initial backing capacity when none is given.
pub const DEFAULT_CAPACITY: usize = 32;

/// Side-table marker for a key with no live slot.
const VACANT: usize = usize::MAX;

/// Capability required of heap members: a stable key identifying the item.
///
/// Keys index a dense side-table, so they should be small arena indices
/// rather than arbitrary hashes or the item's own value. Two live items
/// never share a key. Plain values without an identity belong in a
/// [`ValueHeap`](crate::ValueHeap).
pub trait HeapItem {
    fn heap_key(&self) -> usize;
}

/// Natural min-ordering: smaller values outrank larger ones.
pub fn min_first<T: Ord>(a: &T, b: &T) -> Ordering {
    b.cmp(a)
}

/// Natural max-ordering: larger values outrank smaller ones.
pub fn max_first<T: Ord>(a: &T, b: &T) -> Ordering {
    a.cmp(b)
}

/// Binary heap ordered by a caller-supplied comparator.
///
/// `compare(a, b)` returns [`Ordering::Greater`] when `a` should sit
/// closer to the root than `b`. The root is always an item that no other
/// item outranks.
pub struct BinaryHeap<T, C> {
    items: Vec<T>,
    positions: Vec<usize>,
    compare: C,
}

impl<T: HeapItem + Ord> BinaryHeap<T, fn(&T, &T) -> Ordering> {
    /// Heap that pops the smallest item first.
    pub fn min() -> Self {
        Self::new(min_first::<T>)
    }

    /// Heap that pops the largest item first.
    pub fn max() -> Self {
        Self::new(max_first::<T>)
    }
}

impl<T, C> BinaryHeap<T, C>
where
    T: HeapItem,
    C: Fn(&T, &T) -> Ordering,
{
    /// Create an empty heap with [`DEFAULT_CAPACITY`] slots reserved.
    pub fn new(compare: C) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, compare)
    }

    /// Create an empty heap with room for `capacity` items before growing.
    ///
    /// Exceeding the capacity is never an error; the backing array grows.
    pub fn with_capacity(capacity: usize, compare: C) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
            compare,
        }
    }

    /// Number of live items.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Slots available before the backing array must grow.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// The highest-priority item, if any.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// The backing array in heap order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Current slot of the item with `key`, if it is live in this heap.
    #[inline]
    pub fn position_of(&self, key: usize) -> Option<usize> {
        match self.positions.get(key) {
            Some(&slot) if slot < self.items.len() && self.items[slot].heap_key() == key => {
                Some(slot)
            }
            _ => None,
        }
    }

    /// The live item with `key`.
    pub fn get(&self, key: usize) -> Option<&T> {
        self.position_of(key).map(|slot| &self.items[slot])
    }

    /// Whether an item with the same key as `item` is live in this heap.
    #[inline]
    pub fn contains(&self, item: &T) -> bool {
        self.contains_key(item.heap_key())
    }

    #[inline]
    pub fn contains_key(&self, key: usize) -> bool {
        self.position_of(key).is_some()
    }

    /// Insert `item` and sift it towards the root.
    ///
    /// If an item with the same key is already live it is replaced and
    /// repositioned instead, keeping keys unique. Fails without touching
    /// the heap when the key is too large for the side-table.
    pub fn add(&mut self, item: T) -> Result<(), CollectionError> {
        if let Some(slot) = self.position_of(item.heap_key()) {
            self.items[slot] = item;
            self.reposition(slot);
            return Ok(());
        }
        let slot = self.items.len();
        self.set_position(item.heap_key(), slot)?;
        self.items.push(item);
        self.sift_up(slot);
        Ok(())
    }

    /// Remove and return the root.
    pub fn remove_first(&mut self) -> Result<T, CollectionError> {
        if self.items.is_empty() {
            return Err(CollectionError::Empty {
                operation: "remove_first",
            });
        }
        let first = self.items.swap_remove(0);
        self.positions[first.heap_key()] = VACANT;
        if let Some(moved) = self.items.first() {
            let key = moved.heap_key();
            self.positions[key] = 0;
            self.sift_down(0);
        }
        Ok(first)
    }

    /// Replace the live item sharing `item`'s key and restore heap order
    /// around it, trying upward first and then downward.
    pub fn update_item(&mut self, item: T) -> Result<(), CollectionError> {
        let slot = self.replace(item)?;
        self.reposition(slot);
        Ok(())
    }

    /// Like [`update_item`](Self::update_item) for an item whose priority
    /// can only have improved.
    pub fn update_item_up(&mut self, item: T) -> Result<(), CollectionError> {
        let slot = self.replace(item)?;
        self.sift_up(slot);
        Ok(())
    }

    /// Like [`update_item`](Self::update_item) for an item whose priority
    /// can only have worsened.
    pub fn update_item_down(&mut self, item: T) -> Result<(), CollectionError> {
        let slot = self.replace(item)?;
        self.sift_down(slot);
        Ok(())
    }

    /// Mutate the live item with `key` in place, then restore heap order.
    pub fn update_with(
        &mut self,
        key: usize,
        f: impl FnOnce(&mut T),
    ) -> Result<(), CollectionError> {
        let slot = self.position_of(key).ok_or(CollectionError::NotInHeap)?;
        f(&mut self.items[slot]);
        debug_assert_eq!(self.items[slot].heap_key(), key, "update_with changed the key");
        self.reposition(slot);
        Ok(())
    }

    /// Remove every item, keeping the allocation.
    pub fn clear(&mut self) {
        for item in &self.items {
            self.positions[item.heap_key()] = VACANT;
        }
        self.items.clear();
    }

    /// Compact the backing storage to its current occupancy.
    pub fn shrink(&mut self) -> &[T] {
        let used = self
            .items
            .iter()
            .map(|item| item.heap_key() + 1)
            .max()
            .unwrap_or(0);
        self.positions.truncate(used);
        self.positions.shrink_to_fit();
        self.items.shrink_to_fit();
        &self.items
    }

    /// Consume the heap, returning the backing array in heap order.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn replace(&mut self, item: T) -> Result<usize, CollectionError> {
        let slot = self
            .position_of(item.heap_key())
            .ok_or(CollectionError::NotInHeap)?;
        self.items[slot] = item;
        Ok(slot)
    }

    #[inline]
    fn reposition(&mut self, slot: usize) {
        let slot = self.sift_up(slot);
        self.sift_down(slot);
    }

    fn set_position(&mut self, key: usize, slot: usize) -> Result<(), CollectionError> {
        if key >= self.positions.len() {
            let len = key
                .checked_add(1)
                .ok_or(CollectionError::KeyOutOfRange { key })?;
            self.positions
                .try_reserve(len - self.positions.len())
                .map_err(|_| CollectionError::KeyOutOfRange { key })?;
            self.positions.resize(len, VACANT);
        }
        self.positions[key] = slot;
        Ok(())
    }

    fn sift_up(&mut self, slot: usize) -> usize {
        let compare = &self.compare;
        let positions = &mut self.positions;
        sift::sift_up(
            &mut self.items,
            slot,
            |a, b| compare(a, b) == Ordering::Greater,
            |item, at| positions[item.heap_key()] = at,
        )
    }

    fn sift_down(&mut self, slot: usize) -> usize {
        let compare = &self.compare;
        let positions = &mut self.positions;
        sift::sift_down(
            &mut self.items,
            slot,
            |a, b| compare(a, b) == Ordering::Greater,
            |item, at| positions[item.heap_key()] = at,
        )
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BinaryHeap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryHeap")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}
