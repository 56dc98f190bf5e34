//! Rectangular grid graphs.
//!
//! Cells are addressed by [`Point`] for callers and by row-major
//! [`NodeId`] for the search. Every step between adjacent cells costs one,
//! including diagonal steps in an eight-way grid, so Manhattan and
//! Chebyshev distances are exact lower bounds for their neighbourhoods.

use wayfind_core::{Point, Range};

use crate::distance::{chebyshev, manhattan};
use crate::error::PathError;
use crate::traits::{NodeGraph, NodeId, NodeScores};

/// Which surrounding cells count as neighbours.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Neighborhood {
    /// Up, right, down, left.
    #[default]
    Four,
    /// The four cardinals and the four diagonals.
    Eight,
}

impl Neighborhood {
    #[inline]
    pub fn directions(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    /// Admissible distance for unit-cost moves in this neighbourhood.
    #[inline]
    pub fn distance(self, a: Point, b: Point) -> i32 {
        match self {
            Self::Four => manhattan(a, b),
            Self::Eight => chebyshev(a, b),
        }
    }

    #[inline]
    fn step(self, p: Point, direction: usize) -> Option<Point> {
        match self {
            Self::Four => p.neighbors_4().get(direction).copied(),
            Self::Eight => p.neighbors_8().get(direction).copied(),
        }
    }
}

/// Character for a floor cell in [`GridGraph::parse`].
pub const FLOOR: char = '.';
/// Character for a wall cell in [`GridGraph::parse`].
pub const WALL: char = '#';

/// A grid of floor and wall cells.
#[derive(Clone, Debug)]
pub struct GridGraph {
    range: Range,
    neighborhood: Neighborhood,
    walls: Vec<bool>,
    scores: Vec<NodeScores>,
}

impl GridGraph {
    /// An all-floor grid covering `range`.
    pub fn new(range: Range, neighborhood: Neighborhood) -> Self {
        let n = range.len();
        Self {
            range,
            neighborhood,
            walls: vec![false; n],
            scores: vec![NodeScores::default(); n],
        }
    }

    /// Parse a grid drawn with [`WALL`] and [`FLOOR`] characters, one row
    /// per line, anchored at (0, 0).
    ///
    /// Leading and trailing whitespace of the whole text is ignored. Every
    /// line must have the same width.
    pub fn parse(text: &str, neighborhood: Neighborhood) -> Result<Self, PathError> {
        let text = text.trim();
        let rows: Vec<&str> = text.lines().collect();
        let width = rows.first().map_or(0, |r| r.chars().count());
        if width == 0 {
            return Err(PathError::InvalidGrid(text.to_string()));
        }
        if rows.iter().any(|r| r.chars().count() != width) {
            return Err(PathError::InvalidGrid(text.to_string()));
        }

        let mut grid = Self::new(
            Range::sized(width as i32, rows.len() as i32),
            neighborhood,
        );
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let pos = Point::new(x as i32, y as i32);
                match ch {
                    WALL => grid.set_wall(pos, true)?,
                    FLOOR => {}
                    _ => return Err(PathError::InvalidRune { ch, pos }),
                }
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn range(&self) -> Range {
        self.range
    }

    #[inline]
    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    /// Node for the cell at `p`.
    #[inline]
    pub fn node_at(&self, p: Point) -> Option<NodeId> {
        self.range.index_of(p).map(NodeId)
    }

    /// Cell of node `id`.
    #[inline]
    pub fn point(&self, id: NodeId) -> Option<Point> {
        self.range.point_at(id.0)
    }

    /// Map a node path to cell coordinates, skipping foreign ids.
    pub fn path_points(&self, path: &[NodeId]) -> Vec<Point> {
        path.iter().filter_map(|&id| self.point(id)).collect()
    }

    pub fn set_wall(&mut self, p: Point, wall: bool) -> Result<(), PathError> {
        let idx = self.index(p)?;
        self.walls[idx] = wall;
        Ok(())
    }

    /// Whether `p` is a wall. Cells outside the grid count as walls.
    #[inline]
    pub fn is_wall(&self, p: Point) -> bool {
        self.range.index_of(p).is_none_or(|i| self.walls[i])
    }

    /// Render the grid back to text, marking `path` cells with `mark`.
    pub fn render(&self, path: &[NodeId], mark: char) -> String {
        let mut cells: Vec<char> = self
            .walls
            .iter()
            .map(|&w| if w { WALL } else { FLOOR })
            .collect();
        for id in path {
            if let Some(c) = cells.get_mut(id.0) {
                *c = mark;
            }
        }
        let width = self.range.width().max(1) as usize;
        cells
            .chunks(width)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn index(&self, p: Point) -> Result<usize, PathError> {
        self.range.index_of(p).ok_or(PathError::OutOfGrid(p))
    }
}

impl NodeGraph for GridGraph {
    type Node = NodeScores;

    #[inline]
    fn node_count(&self) -> usize {
        self.scores.len()
    }

    #[inline]
    fn node(&self, id: NodeId) -> &NodeScores {
        &self.scores[id.0]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut NodeScores {
        &mut self.scores[id.0]
    }

    #[inline]
    fn number_of_directions(&self, _id: NodeId) -> usize {
        self.neighborhood.directions()
    }

    fn neighbour(&self, id: NodeId, direction: usize) -> Option<NodeId> {
        let p = self.point(id)?;
        let q = self.neighborhood.step(p, direction)?;
        self.node_at(q)
    }

    #[inline]
    fn is_traversable(&self, id: NodeId) -> bool {
        !self.walls.get(id.0).copied().unwrap_or(true)
    }

    fn distance_heuristic(&self, from: NodeId, to: NodeId) -> f32 {
        match (self.point(from), self.point(to)) {
            (Some(a), Some(b)) => self.neighborhood.distance(a, b) as f32,
            _ => f32::INFINITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astar::AStarSearch;

    const ROOM: &str = "
.....
.###.
...#.
.#...
";

    #[test]
    fn parse_and_size() {
        let g = GridGraph::parse(ROOM, Neighborhood::Four).unwrap();
        assert_eq!(g.range().size(), Point::new(5, 4));
        assert!(g.is_wall(Point::new(1, 1)));
        assert!(!g.is_wall(Point::new(0, 0)));
        assert!(g.is_wall(Point::new(-1, 0)));
        assert_eq!(g.render(&[], '*'), ROOM.trim());
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            GridGraph::parse("..\n...", Neighborhood::Four),
            Err(PathError::InvalidGrid(_))
        ));
        assert!(matches!(
            GridGraph::parse("   ", Neighborhood::Four),
            Err(PathError::InvalidGrid(_))
        ));
        assert_eq!(
            GridGraph::parse("..\n.x", Neighborhood::Four).unwrap_err(),
            PathError::InvalidRune {
                ch: 'x',
                pos: Point::new(1, 1)
            }
        );
    }

    #[test]
    fn ids_and_points_round_trip() {
        let g = GridGraph::new(Range::new(2, 3, 6, 5), Neighborhood::Four);
        let id = g.node_at(Point::new(4, 4)).unwrap();
        assert_eq!(id, NodeId(6));
        assert_eq!(g.point(id), Some(Point::new(4, 4)));
        assert_eq!(g.node_at(Point::new(0, 0)), None);
        assert_eq!(g.point(NodeId(8)), None);

        let mut g = g;
        assert_eq!(
            g.set_wall(Point::new(9, 9), true),
            Err(PathError::OutOfGrid(Point::new(9, 9)))
        );
    }

    #[test]
    fn neighbours_respect_bounds() {
        let g = GridGraph::new(Range::sized(3, 3), Neighborhood::Eight);
        let corner = g.node_at(Point::new(0, 0)).unwrap();
        let found: Vec<_> = (0..g.number_of_directions(corner))
            .filter_map(|d| g.neighbour(corner, d))
            .collect();
        assert_eq!(found.len(), 3);
        assert_eq!(g.neighbour(corner, 8), None);
    }

    #[test]
    fn walls_are_routed_around() {
        let mut g = GridGraph::parse(ROOM, Neighborhood::Four).unwrap();
        let from = g.node_at(Point::new(0, 2)).unwrap();
        let to = g.node_at(Point::new(4, 2)).unwrap();
        let r = AStarSearch::default().search(&mut g, from, to).unwrap();
        assert!(r.found);
        // Around the bottom: (0,2) (1,2) (2,2) (2,3) (3,3) (4,3) (4,2)
        assert_eq!(r.path.len(), 7);
        let pts = g.path_points(&r.path);
        assert!(pts.iter().all(|&p| !g.is_wall(p)));
        assert!(pts.windows(2).all(|w| w[0].is_adjacent(w[1])));
    }

    #[test]
    fn diagonal_moves_shorten_paths() {
        let mut g = GridGraph::new(Range::sized(6, 6), Neighborhood::Eight);
        let from = g.node_at(Point::new(0, 0)).unwrap();
        let to = g.node_at(Point::new(5, 3)).unwrap();
        let r = AStarSearch::default().search(&mut g, from, to).unwrap();
        assert_eq!(r.path.len(), 6);
    }

    #[test]
    fn walled_in_target_is_unreachable() {
        let mut g = GridGraph::parse(
            "
.....
..#..
.#.#.
..#..
",
            Neighborhood::Four,
        )
        .unwrap();
        let from = g.node_at(Point::new(0, 0)).unwrap();
        let to = g.node_at(Point::new(2, 2)).unwrap();
        let r = AStarSearch::default().search(&mut g, from, to).unwrap();
        assert!(!r.found);
        assert_eq!(
            g.render(&[from], '@').lines().next(),
            Some("@....")
        );
    }
}
