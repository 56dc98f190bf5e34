use thiserror::Error;

/// Errors raised by the containers in this crate.
///
/// Expected outcomes (pulling an absent value, searching a heap for a
/// value it does not hold) are reported through return values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// A positional access or removal named a slot past the end.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// A sub-range operation reached past the end.
    #[error("range {start}..{start}+{count} out of bounds for length {len}")]
    RangeOutOfBounds {
        start: usize,
        count: usize,
        len: usize,
    },
    /// A removal or peek was attempted on an empty container.
    #[error("{operation} on an empty container")]
    Empty { operation: &'static str },
    /// An operand that should hold a container was absent.
    #[error("{operand} container is uninitialized")]
    Uninitialized { operand: &'static str },
    /// A heap key is too large to index the position side-table.
    #[error("heap key {key} cannot be indexed")]
    KeyOutOfRange { key: usize },
    /// The item is not a live member of this heap.
    #[error("item is not a member of this heap")]
    NotInHeap,
}
