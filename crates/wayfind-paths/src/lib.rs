//! A* search and amortised path requests over generic node graphs.
//!
//! - [`AStarSearch`] runs a bounded A* over anything implementing
//!   [`NodeGraph`], writing scores and parent links into the graph's
//!   [`Node`]s.
//! - [`PathRequestQueue`] defers searches and resolves them in FIFO
//!   order, a few per call, invoking success or failure callbacks.
//! - [`PathManager`] drives a queue from a frame loop at a configured pace.
//!
//! Two ready-made graphs are included: [`AdjacencyGraph`] for arbitrary
//! weighted graphs and [`GridGraph`] for rectangular tile maps.
//!
//! # Trait hierarchy
//!
//! | Trait | Role |
//! |---|---|
//! | [`Node`] | per-node `g`/`h` scores and parent link |
//! | [`NodeGraph`] | node arena, neighbour directions, heuristic and step cost |

mod adjacency;
mod astar;
mod config;
mod diagnostics;
mod distance;
mod error;
mod grid;
mod manager;
mod request;
mod traits;

pub use adjacency::{AdjacencyGraph, Edge};
pub use astar::{AStarSearch, SearchResult, SearchStatus};
pub use config::{ManagerConfig, SearchConfig};
pub use diagnostics::SearchTimings;
pub use distance::{chebyshev, manhattan};
pub use error::PathError;
pub use grid::{FLOOR, GridGraph, Neighborhood, WALL};
pub use manager::{ManagerStatus, PathManager};
pub use request::{PathCallback, PathRequest, PathRequestQueue};
pub use traits::{Node, NodeGraph, NodeId, NodeScores};
