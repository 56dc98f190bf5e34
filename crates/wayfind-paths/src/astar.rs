use std::cmp::Ordering;
use std::collections::HashSet;

use log::debug;
use wayfind_collections::{BinaryHeap, HeapItem};

use crate::config::SearchConfig;
use crate::diagnostics::{SearchTimings, Stopwatch};
use crate::error::PathError;
use crate::traits::{Node, NodeGraph, NodeId};

/// Why a search stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// The destination was reached.
    Found,
    /// Every reachable node was expanded without reaching the destination.
    OpenExhausted,
    /// The expansion budget ran out first.
    DepthExhausted,
}

/// Outcome of [`AStarSearch::search`].
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub found: bool,
    /// Origin to destination inclusive; empty unless `found`.
    pub path: Vec<NodeId>,
    /// Number of nodes popped from the open set.
    pub expanded: usize,
    pub status: SearchStatus,
    /// Present only when diagnostics are enabled and a path was found.
    pub timings: Option<SearchTimings>,
}

impl SearchResult {
    fn failed(status: SearchStatus, expanded: usize) -> Self {
        Self {
            found: false,
            path: Vec::new(),
            expanded,
            status,
            timings: None,
        }
    }
}

/// Open-set entry. The scores are copied from the node when it is
/// (re)queued so ordering never has to reach back into the graph.
#[derive(Copy, Clone, Debug)]
struct OpenEntry {
    node: NodeId,
    f: f32,
    h: f32,
}

impl HeapItem for OpenEntry {
    #[inline]
    fn heap_key(&self) -> usize {
        self.node.0
    }
}

/// Lowest `f` first, ties broken by lowest `h`.
fn open_order(a: &OpenEntry, b: &OpenEntry) -> Ordering {
    b.f.total_cmp(&a.f).then(b.h.total_cmp(&a.h))
}

type OpenSet = BinaryHeap<OpenEntry, fn(&OpenEntry, &OpenEntry) -> Ordering>;

/// A* over any [`NodeGraph`].
///
/// The open and closed sets are allocated per call. Node scores and parent
/// links live in the graph and are overwritten by every search, so only
/// one search may run over a graph at a time.
#[derive(Clone, Debug, Default)]
pub struct AStarSearch {
    config: SearchConfig,
}

impl AStarSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find a least-cost path from `origin` to `destination`.
    ///
    /// Running out of nodes or of expansion budget yields
    /// `Ok` with `found == false`. Only ids foreign to `graph` are errors.
    pub fn search<G: NodeGraph>(
        &self,
        graph: &mut G,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<SearchResult, PathError> {
        for id in [origin, destination] {
            if !graph.contains(id) {
                return Err(PathError::UnknownNode(id));
            }
        }

        let mut stopwatch = self.config.diagnostics.then(Stopwatch::start);

        let h = graph.distance_heuristic(origin, destination);
        {
            let start = graph.node_mut(origin);
            start.set_g(0.0);
            start.set_h(h);
            start.set_parent(None);
        }

        if origin == destination {
            return Ok(SearchResult {
                found: true,
                path: vec![origin],
                expanded: 0,
                status: SearchStatus::Found,
                timings: stopwatch.as_mut().map(|sw| SearchTimings {
                    search: sw.lap(),
                    reconstruction: Default::default(),
                }),
            });
        }

        let mut open: OpenSet = BinaryHeap::with_capacity(self.config.map_size, open_order);
        let mut closed: HashSet<NodeId> = HashSet::new();
        open.add(OpenEntry {
            node: origin,
            f: h,
            h,
        })?;

        let mut depth = self.config.depth;
        let mut expanded = 0;

        let status = loop {
            if open.is_empty() {
                break SearchStatus::OpenExhausted;
            }
            if depth == 0 {
                break SearchStatus::DepthExhausted;
            }
            depth -= 1;

            let current = open.remove_first()?.node;
            closed.insert(current);
            expanded += 1;

            if current == destination {
                break SearchStatus::Found;
            }

            let current_g = graph.node(current).g();
            for direction in 0..graph.number_of_directions(current) {
                let Some(next) = graph.neighbour(current, direction) else {
                    continue;
                };
                if !graph.contains(next) || !graph.is_traversable(next) || closed.contains(&next) {
                    continue;
                }

                let tentative_g = current_g + graph.cost(current, next);
                let queued = open.contains_key(next.0);
                if queued && tentative_g >= graph.node(next).g() {
                    continue;
                }

                let h = graph.distance_heuristic(next, destination);
                let node = graph.node_mut(next);
                node.set_g(tentative_g);
                node.set_h(h);
                node.set_parent(Some(current));

                let entry = OpenEntry {
                    node: next,
                    f: tentative_g + h,
                    h,
                };
                if queued {
                    open.update_item(entry)?;
                } else {
                    open.add(entry)?;
                }
            }
        };

        if status != SearchStatus::Found {
            if self.config.diagnostics {
                debug!("no path {origin} -> {destination}: {status:?} after {expanded} expansions");
            }
            return Ok(SearchResult::failed(status, expanded));
        }

        let search_time = stopwatch.as_mut().map(Stopwatch::lap);
        let path = reconstruct(graph, origin, destination, closed.len());
        let timings = stopwatch.as_mut().zip(search_time).map(|(sw, search)| {
            let t = SearchTimings {
                search,
                reconstruction: sw.lap(),
            };
            debug!(
                "path {origin} -> {destination} ({} nodes, {expanded} expanded) found in {:?}, reconstructed in {:?}",
                path.len(),
                t.search,
                t.reconstruction
            );
            t
        });

        Ok(SearchResult {
            found: true,
            path,
            expanded,
            status,
            timings,
        })
    }
}

/// Walk parent links back from `destination` and return the path in
/// forward order. At most `limit + 1` links are followed.
fn reconstruct<G: NodeGraph>(
    graph: &G,
    origin: NodeId,
    destination: NodeId,
    limit: usize,
) -> Vec<NodeId> {
    let mut path = vec![destination];
    let mut cursor = destination;
    while cursor != origin && path.len() <= limit {
        match graph.node(cursor).parent() {
            Some(parent) => {
                path.push(parent);
                cursor = parent;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
