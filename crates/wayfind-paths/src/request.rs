//! FIFO queue of deferred path requests.
//!
//! Callers enqueue `(origin, destination, callbacks)` and a driver loop
//! resolves them a few at a time with [`PathRequestQueue::compute_next`]
//! or [`PathRequestQueue::compute_batch`], spreading search cost over
//! several ticks. Callbacks run synchronously and may enqueue further
//! requests through a shared reference to the queue.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;

use log::{trace, warn};

use crate::astar::AStarSearch;
use crate::config::SearchConfig;
use crate::traits::{NodeGraph, NodeId};

/// Receives the resolved path.
pub type PathCallback = Box<dyn FnOnce(Vec<NodeId>)>;

/// A pending search and what to do with its outcome.
pub struct PathRequest {
    pub origin: NodeId,
    pub destination: NodeId,
    on_success: PathCallback,
    on_failure: Option<PathCallback>,
}

impl PathRequest {
    pub fn new(
        origin: NodeId,
        destination: NodeId,
        on_success: impl FnOnce(Vec<NodeId>) + 'static,
    ) -> Self {
        Self {
            origin,
            destination,
            on_success: Box::new(on_success),
            on_failure: None,
        }
    }

    /// Called with an empty path when no path is found.
    pub fn on_failure(mut self, on_failure: impl FnOnce(Vec<NodeId>) + 'static) -> Self {
        self.on_failure = Some(Box::new(on_failure));
        self
    }

    fn fail(self) {
        if let Some(f) = self.on_failure {
            f(Vec::new());
        }
    }
}

impl fmt::Debug for PathRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRequest")
            .field("origin", &self.origin)
            .field("destination", &self.destination)
            .field("on_failure", &self.on_failure.is_some())
            .finish_non_exhaustive()
    }
}

/// Resets the in-progress flag when a computation ends, even by unwinding.
struct Computing<'a>(&'a Cell<bool>);

impl<'a> Computing<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for Computing<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Single-threaded FIFO of [`PathRequest`]s.
///
/// At most one request is resolved at a time: a `compute_next` issued from
/// inside a callback returns `false` without doing anything. This guards
/// re-entry on one thread only; the queue is not `Sync`.
#[derive(Default)]
pub struct PathRequestQueue {
    pending: RefCell<VecDeque<PathRequest>>,
    computing: Cell<bool>,
    search: AStarSearch,
}

impl PathRequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A queue whose searches use `config`.
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            search: AStarSearch::new(config),
            ..Self::default()
        }
    }

    #[inline]
    pub fn search(&self) -> &AStarSearch {
        &self.search
    }

    /// Enqueue a search from `origin` to `destination`.
    pub fn request_path(
        &self,
        origin: NodeId,
        destination: NodeId,
        on_success: impl FnOnce(Vec<NodeId>) + 'static,
        on_failure: impl FnOnce(Vec<NodeId>) + 'static,
    ) {
        self.push(PathRequest::new(origin, destination, on_success).on_failure(on_failure));
    }

    /// Enqueue a prepared request.
    pub fn push(&self, request: PathRequest) {
        trace!(
            "path request {} -> {} queued",
            request.origin, request.destination
        );
        self.pending.borrow_mut().push_back(request);
    }

    /// Number of requests waiting.
    #[inline]
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Whether a request is being resolved right now.
    #[inline]
    pub fn is_computing(&self) -> bool {
        self.computing.get()
    }

    /// Resolve the oldest request and run its callback.
    ///
    /// Returns `false` if the queue is empty or a request is already being
    /// resolved.
    pub fn compute_next<G: NodeGraph>(&self, graph: &mut G) -> bool {
        let Some(_guard) = Computing::enter(&self.computing) else {
            trace!("compute_next skipped: already computing");
            return false;
        };
        // Release the borrow before any callback can push.
        let Some(request) = self.pending.borrow_mut().pop_front() else {
            return false;
        };

        match self.search.search(graph, request.origin, request.destination) {
            Ok(result) if result.found => {
                trace!(
                    "path request {} -> {} resolved with {} nodes",
                    request.origin,
                    request.destination,
                    result.path.len()
                );
                (request.on_success)(result.path);
            }
            Ok(result) => {
                trace!(
                    "path request {} -> {} failed: {:?}",
                    request.origin, request.destination, result.status
                );
                request.fail();
            }
            Err(err) => {
                warn!(
                    "path request {} -> {} dropped: {err}",
                    request.origin, request.destination
                );
                request.fail();
            }
        }
        true
    }

    /// Resolve up to `n` requests, stopping early when nothing is left.
    /// Returns how many were resolved.
    pub fn compute_batch<G: NodeGraph>(&self, graph: &mut G, n: usize) -> usize {
        let mut done = 0;
        while done < n && self.compute_next(graph) {
            done += 1;
        }
        done
    }
}

impl fmt::Debug for PathRequestQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRequestQueue")
            .field("pending", &self.len())
            .field("computing", &self.is_computing())
            .field("search", &self.search)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::AdjacencyGraph;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn line(n: usize) -> AdjacencyGraph {
        let mut g = AdjacencyGraph::new();
        let ids: Vec<_> = (0..n).map(|_| g.add_node()).collect();
        for w in ids.windows(2) {
            g.add_edge(w[0], w[1], 1.0).unwrap();
        }
        g
    }

    fn recorder(log: &Log, tag: &'static str) -> impl FnOnce(Vec<NodeId>) + 'static {
        let log = Rc::clone(log);
        move |path| log.borrow_mut().push(format!("{tag}:{}", path.len()))
    }

    #[test]
    fn requests_resolve_in_fifo_order() {
        let mut g = line(4);
        let queue = PathRequestQueue::new();
        let log: Log = Rc::default();
        for (tag, to) in [("R1", 3), ("R2", 1), ("R3", 2)] {
            queue.request_path(NodeId(0), NodeId(to), recorder(&log, tag), recorder(&log, "fail"));
        }
        assert_eq!(queue.len(), 3);

        assert!(queue.compute_next(&mut g));
        assert!(queue.compute_next(&mut g));
        assert!(queue.compute_next(&mut g));
        assert!(!queue.compute_next(&mut g));
        assert_eq!(*log.borrow(), ["R1:4", "R2:2", "R3:3"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn failure_callback_gets_empty_path() {
        let mut g = line(2);
        let lonely = g.add_node();
        let queue = PathRequestQueue::new();
        let log: Log = Rc::default();
        queue.request_path(NodeId(0), lonely, recorder(&log, "ok"), recorder(&log, "fail"));
        queue.push(PathRequest::new(NodeId(0), NodeId(99), recorder(&log, "ok")).on_failure(recorder(&log, "unknown")));
        // No failure callback at all: resolved silently.
        queue.push(PathRequest::new(NodeId(0), lonely, recorder(&log, "ok")));

        assert_eq!(queue.compute_batch(&mut g, 10), 3);
        assert_eq!(*log.borrow(), ["fail:0", "unknown:0"]);
    }

    #[test]
    fn batch_stops_when_queue_drains() {
        let mut g = line(3);
        let queue = PathRequestQueue::new();
        for _ in 0..3 {
            queue.push(PathRequest::new(NodeId(0), NodeId(2), |_| {}));
        }
        assert_eq!(queue.compute_batch(&mut g, 2), 2);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.compute_batch(&mut g, 5), 1);
        assert_eq!(queue.compute_batch(&mut g, 5), 0);
    }

    #[test]
    fn nested_compute_is_refused_but_enqueue_works() {
        let mut g = line(3);
        let queue = Rc::new(PathRequestQueue::new());
        let nested: Rc<Cell<Option<bool>>> = Rc::default();

        let q = Rc::clone(&queue);
        let seen = Rc::clone(&nested);
        queue.push(PathRequest::new(NodeId(0), NodeId(2), move |_| {
            assert!(q.is_computing());
            let mut other = line(3);
            seen.set(Some(q.compute_next(&mut other)));
            q.push(PathRequest::new(NodeId(2), NodeId(0), |_| {}));
        }));

        assert!(queue.compute_next(&mut g));
        assert_eq!(nested.get(), Some(false));
        assert!(!queue.is_computing());
        assert_eq!(queue.len(), 1);
        assert!(queue.compute_next(&mut g));
    }

    #[test]
    fn queue_config_reaches_the_search() {
        let mut g = line(10);
        let queue = PathRequestQueue::with_config(SearchConfig::default().with_depth(3));
        let log: Log = Rc::default();
        queue.request_path(NodeId(0), NodeId(9), recorder(&log, "ok"), recorder(&log, "fail"));
        queue.compute_next(&mut g);
        assert_eq!(*log.borrow(), ["fail:0"]);
        assert_eq!(queue.search().config().depth, 3);
    }
}
