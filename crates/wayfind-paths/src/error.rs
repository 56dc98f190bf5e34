use thiserror::Error;
use wayfind_collections::CollectionError;
use wayfind_core::Point;

use crate::traits::NodeId;

/// Errors raised while building graphs or running searches.
///
/// Failing to find a path is not an error: it is reported through
/// [`SearchResult::found`](crate::SearchResult::found).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    /// A node id does not belong to the graph it was used with.
    #[error("node {0} is not part of this graph")]
    UnknownNode(NodeId),
    /// An edge was given a cost the search cannot work with.
    #[error("edge {from} -> {to} has invalid cost {cost}")]
    InvalidEdge { from: NodeId, to: NodeId, cost: f32 },
    /// A configuration value is out of its allowed range.
    #[error("invalid {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
    /// A textual grid has inconsistent line widths or no cells.
    #[error("invalid grid:\n{0}")]
    InvalidGrid(String),
    /// A textual grid contains a character with no meaning.
    #[error("grid contains invalid rune \u{201c}{ch}\u{201d} at {pos}")]
    InvalidRune { ch: char, pos: Point },
    /// A point lies outside the grid it was used with.
    #[error("point {0} is outside the grid")]
    OutOfGrid(Point),
    #[error(transparent)]
    Collection(#[from] CollectionError),
}
