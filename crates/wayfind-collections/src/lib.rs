//! Containers backing the `wayfind` pathfinding stack.
//!
//! - [`IndexedMultiset`]: an ordered multiset with O(1) membership and
//!   occurrence queries, plus queue/stack views and set algebra.
//! - [`BinaryHeap`]: a priority queue over keyed items that supports
//!   in-place priority updates through a side table of positions.
//! - [`ValueHeap`]: a priority queue over plain values, with a pruned
//!   tree search for membership.
//!
//! Both heaps take a comparator where `compare(a, b) == Greater` means
//! `a` is served before `b`. [`min_first`] and [`max_first`] cover the
//! common cases.

mod error;
mod heap;
mod multiset;
mod sift;
mod value_heap;

pub use error::CollectionError;
pub use heap::{BinaryHeap, DEFAULT_CAPACITY, HeapItem, max_first, min_first};
pub use multiset::{Accessed, DuplicatePolicy, INVALID, IndexedMultiset};
pub use value_heap::ValueHeap;
