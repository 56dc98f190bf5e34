use std::fmt;

/// Stable arena index of a node inside a [`NodeGraph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Per-node search state: scores and the back-link to the predecessor.
///
/// The search writes these in place, so at most one search may run over a
/// given graph at a time.
pub trait Node {
    /// Cost of the best known path from the origin.
    fn g(&self) -> f32;
    fn set_g(&mut self, g: f32);

    /// Estimated remaining cost to the destination.
    fn h(&self) -> f32;
    fn set_h(&mut self, h: f32);

    /// Total estimated cost through this node.
    #[inline]
    fn f(&self) -> f32 {
        self.g() + self.h()
    }

    fn parent(&self) -> Option<NodeId>;
    fn set_parent(&mut self, parent: Option<NodeId>);
}

/// Plain storage for [`Node`] state, for graphs that have nothing else to
/// keep per node.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeScores {
    pub g: f32,
    pub h: f32,
    pub parent: Option<NodeId>,
}

impl Node for NodeScores {
    #[inline]
    fn g(&self) -> f32 {
        self.g
    }

    #[inline]
    fn set_g(&mut self, g: f32) {
        self.g = g;
    }

    #[inline]
    fn h(&self) -> f32 {
        self.h
    }

    #[inline]
    fn set_h(&mut self, h: f32) {
        self.h = h;
    }

    #[inline]
    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }
}

/// The world as seen by the search: an arena of nodes addressed by
/// [`NodeId`], each with an ordered list of neighbour directions.
///
/// `node` and `node_mut` may panic for ids outside `0..node_count()`; the
/// search checks [`contains`](Self::contains) before touching a node.
pub trait NodeGraph {
    type Node: Node;

    fn node_count(&self) -> usize;

    #[inline]
    fn contains(&self, id: NodeId) -> bool {
        id.0 < self.node_count()
    }

    fn node(&self, id: NodeId) -> &Self::Node;
    fn node_mut(&mut self, id: NodeId) -> &mut Self::Node;

    /// How many neighbour directions `id` has.
    fn number_of_directions(&self, id: NodeId) -> usize;

    /// The neighbour of `id` in `direction`, if there is one.
    fn neighbour(&self, id: NodeId, direction: usize) -> Option<NodeId>;

    fn is_traversable(&self, id: NodeId) -> bool;

    /// Estimated cost from `from` to `to`. Must not overestimate for the
    /// search to return optimal paths.
    fn distance_heuristic(&self, from: NodeId, to: NodeId) -> f32;

    /// Cost of the step from `from` to its neighbour `to`.
    #[inline]
    fn cost(&self, from: NodeId, to: NodeId) -> f32 {
        self.distance_heuristic(from, to)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn scores_round_trip() {
        let s = NodeScores {
            g: 3.5,
            h: 1.0,
            parent: Some(NodeId(8)),
        };
        let json = serde_json::to_string(&s).unwrap();
        let back: NodeScores = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
