use std::fmt;

use crate::error::PathError;
use crate::traits::{NodeGraph, NodeId, NodeScores};

/// An outgoing edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub to: NodeId,
    pub cost: f32,
}

#[derive(Clone, Debug)]
struct Vertex {
    scores: NodeScores,
    edges: Vec<Edge>,
    traversable: bool,
}

type Heuristic = Box<dyn Fn(NodeId, NodeId) -> f32>;

/// General graph stored as adjacency lists in a node arena.
///
/// Step costs come from edge weights. Without a heuristic the search
/// degrades to Dijkstra's algorithm, which is always admissible.
#[derive(Default)]
pub struct AdjacencyGraph {
    vertices: Vec<Vertex>,
    heuristic: Option<Heuristic>,
}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(nodes),
            heuristic: None,
        }
    }

    /// Append a traversable node with no edges.
    pub fn add_node(&mut self) -> NodeId {
        self.vertices.push(Vertex {
            scores: NodeScores::default(),
            edges: Vec::new(),
            traversable: true,
        });
        NodeId(self.vertices.len() - 1)
    }

    /// Connect `a` and `b` in both directions.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, cost: f32) -> Result<(), PathError> {
        self.add_directed_edge(a, b, cost)?;
        if a != b {
            self.add_directed_edge(b, a, cost)?;
        }
        Ok(())
    }

    /// Connect `from` to `to` only. Re-adding an edge overwrites its cost.
    pub fn add_directed_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        cost: f32,
    ) -> Result<(), PathError> {
        self.check(to)?;
        if !cost.is_finite() || cost < 0.0 {
            return Err(PathError::InvalidEdge { from, to, cost });
        }
        let edges = &mut self.vertex_mut(from)?.edges;
        match edges.iter_mut().find(|e| e.to == to) {
            Some(edge) => edge.cost = cost,
            None => edges.push(Edge { to, cost }),
        }
        Ok(())
    }

    pub fn set_traversable(&mut self, id: NodeId, traversable: bool) -> Result<(), PathError> {
        self.vertex_mut(id)?.traversable = traversable;
        Ok(())
    }

    /// Install an estimate of the remaining cost between two nodes. It
    /// must never exceed the true least cost for paths to stay optimal.
    pub fn set_heuristic(&mut self, heuristic: impl Fn(NodeId, NodeId) -> f32 + 'static) {
        self.heuristic = Some(Box::new(heuristic));
    }

    /// Outgoing edges of `id`.
    pub fn edges(&self, id: NodeId) -> Result<&[Edge], PathError> {
        self.check(id)?;
        Ok(&self.vertices[id.0].edges)
    }

    /// Weight of the edge `from -> to`, if it exists.
    pub fn edge_cost(&self, from: NodeId, to: NodeId) -> Option<f32> {
        self.vertices
            .get(from.0)?
            .edges
            .iter()
            .find(|e| e.to == to)
            .map(|e| e.cost)
    }

    fn check(&self, id: NodeId) -> Result<(), PathError> {
        if id.0 >= self.vertices.len() {
            return Err(PathError::UnknownNode(id));
        }
        Ok(())
    }

    fn vertex_mut(&mut self, id: NodeId) -> Result<&mut Vertex, PathError> {
        self.vertices
            .get_mut(id.0)
            .ok_or(PathError::UnknownNode(id))
    }
}

impl NodeGraph for AdjacencyGraph {
    type Node = NodeScores;

    #[inline]
    fn node_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn node(&self, id: NodeId) -> &NodeScores {
        &self.vertices[id.0].scores
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut NodeScores {
        &mut self.vertices[id.0].scores
    }

    #[inline]
    fn number_of_directions(&self, id: NodeId) -> usize {
        self.vertices[id.0].edges.len()
    }

    #[inline]
    fn neighbour(&self, id: NodeId, direction: usize) -> Option<NodeId> {
        self.vertices[id.0].edges.get(direction).map(|e| e.to)
    }

    #[inline]
    fn is_traversable(&self, id: NodeId) -> bool {
        self.vertices[id.0].traversable
    }

    fn distance_heuristic(&self, from: NodeId, to: NodeId) -> f32 {
        match &self.heuristic {
            Some(h) => h(from, to),
            None => 0.0,
        }
    }

    fn cost(&self, from: NodeId, to: NodeId) -> f32 {
        self.edge_cost(from, to).unwrap_or(f32::INFINITY)
    }
}

impl fmt::Debug for AdjacencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdjacencyGraph")
            .field("vertices", &self.vertices)
            .field("heuristic", &self.heuristic.is_some())
            .finish()
    }
}
