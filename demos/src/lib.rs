//! Shared swarm simulation used by the demo binary.
//!
//! Demonstrates: grid graphs, deferred path requests resolved a few per
//! tick by a [`PathManager`], and occupancy tracking with an
//! [`IndexedMultiset`].

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use wayfind_collections::IndexedMultiset;
use wayfind_core::{Point, Range};
use wayfind_paths::{
    GridGraph, ManagerConfig, Neighborhood, NodeGraph, NodeId, PathError, PathManager,
    PathRequestQueue, SearchConfig,
};

pub const WIDTH: i32 = 48;
pub const HEIGHT: i32 = 16;
const WALL_PERCENT: u32 = 22;
const AGENT_GLYPHS: &str = "abcdefghijklmnopqrstuvwxyz";

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
struct Agent {
    pos: Point,
    ch: char,
    path: Vec<Point>,
    step: usize,
    waiting: bool,
}

impl Agent {
    fn is_idle(&self) -> bool {
        !self.waiting && self.step >= self.path.len()
    }
}

/// Paths delivered by request callbacks, keyed by agent index.
type Inbox = Rc<RefCell<Vec<(usize, Vec<NodeId>)>>>;

// ---------------------------------------------------------------------------
// Swarm
// ---------------------------------------------------------------------------

/// Counters reported after each tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub ticks: u32,
    pub requested: u32,
    pub resolved: u32,
    pub failed: u32,
    pub moves: u32,
}

pub struct Swarm {
    grid: GridGraph,
    agents: Vec<Agent>,
    occupied: IndexedMultiset<Point>,
    queue: PathRequestQueue,
    manager: PathManager,
    inbox: Inbox,
    rng: StdRng,
    stats: Stats,
}

impl Swarm {
    /// Build a random cave with `agents` walkers on it.
    pub fn new(seed: u64, agents: usize, pacing: ManagerConfig) -> Result<Self, PathError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let range = Range::sized(WIDTH, HEIGHT);
        let mut grid = GridGraph::new(range, Neighborhood::Eight);
        for p in range {
            if rng.random_range(0..100) < WALL_PERCENT {
                grid.set_wall(p, true)?;
            }
        }

        let floors: Vec<Point> = range.iter().filter(|&p| !grid.is_wall(p)).collect();
        let mut occupied = IndexedMultiset::with_capacity(agents);
        let mut walkers = Vec::with_capacity(agents);
        for (i, ch) in AGENT_GLYPHS.chars().cycle().take(agents).enumerate() {
            let Some(&pos) = floors.get(rng.random_range(0..floors.len().max(1))) else {
                break;
            };
            debug!("agent {i} '{ch}' starts at {pos}");
            occupied.push(pos);
            walkers.push(Agent {
                pos,
                ch,
                path: Vec::new(),
                step: 0,
                waiting: false,
            });
        }

        let search = SearchConfig::default()
            .with_map_size(range.len())
            .with_diagnostics(log::log_enabled!(log::Level::Debug));

        Ok(Self {
            grid,
            agents: walkers,
            occupied,
            queue: PathRequestQueue::with_config(search),
            manager: PathManager::new(pacing)?,
            inbox: Rc::default(),
            rng,
            stats: Stats::default(),
        })
    }

    #[inline]
    pub fn stats(&self) -> Stats {
        self.stats
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn manager_mut(&mut self) -> &mut PathManager {
        &mut self.manager
    }

    /// Cells currently shared by more than one agent.
    pub fn crowded(&self) -> Vec<Point> {
        let mut seen = IndexedMultiset::unique();
        for p in &self.occupied {
            if self.occupied.occurrences(p) > 1 {
                seen.push(*p);
            }
        }
        seen.to_vec()
    }

    /// Advance one frame: queue new destinations, let the manager resolve
    /// some requests, then move every agent one step.
    pub fn tick(&mut self) {
        self.stats.ticks += 1;
        self.request_destinations();
        self.manager.tick(&self.queue, &mut self.grid);
        self.collect_paths();
        self.step_agents();
    }

    fn request_destinations(&mut self) {
        let range = self.grid.range();
        for (i, agent) in self.agents.iter_mut().enumerate() {
            if !agent.is_idle() {
                continue;
            }
            let target = Point::new(
                self.rng.random_range(0..range.width()),
                self.rng.random_range(0..range.height()),
            );
            let (Some(from), Some(to)) = (self.grid.node_at(agent.pos), self.grid.node_at(target))
            else {
                continue;
            };
            let ok = Rc::clone(&self.inbox);
            let failed = Rc::clone(&self.inbox);
            self.queue.request_path(
                from,
                to,
                move |path| ok.borrow_mut().push((i, path)),
                move |path| failed.borrow_mut().push((i, path)),
            );
            agent.waiting = true;
            self.stats.requested += 1;
        }
    }

    fn collect_paths(&mut self) {
        for (i, path) in self.inbox.borrow_mut().drain(..) {
            let Some(agent) = self.agents.get_mut(i) else {
                continue;
            };
            agent.waiting = false;
            if path.is_empty() {
                self.stats.failed += 1;
                continue;
            }
            self.stats.resolved += 1;
            agent.path = self.grid.path_points(&path);
            // The first point is where the agent already stands.
            agent.step = 1;
        }
    }

    fn step_agents(&mut self) {
        for agent in &mut self.agents {
            let Some(&next) = agent.path.get(agent.step) else {
                continue;
            };
            if self.grid.is_wall(next) {
                agent.path.clear();
                continue;
            }
            self.occupied.pull(&agent.pos);
            self.occupied.push(next);
            agent.pos = next;
            agent.step += 1;
            self.stats.moves += 1;
        }
    }

    /// Text frame: walls, floors and agent glyphs.
    pub fn render(&self) -> String {
        let mut rows: Vec<Vec<char>> = self
            .grid
            .render(&[], '.')
            .lines()
            .map(|l| l.chars().collect())
            .collect();
        for agent in &self.agents {
            let (x, y) = (agent.pos.x as usize, agent.pos.y as usize);
            if let Some(c) = rows.get_mut(y).and_then(|r| r.get_mut(x)) {
                *c = agent.ch;
            }
        }
        rows.into_iter()
            .map(|r| r.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Print a summary line at info level.
    pub fn report(&self) {
        let s = self.stats;
        info!(
            "tick {}: {} requested, {} resolved, {} failed, {} pending, {} moves, {} crowded cells",
            s.ticks,
            s.requested,
            s.resolved,
            s.failed,
            self.pending(),
            s.moves,
            self.crowded().len()
        );
    }

    /// Number of walkable cells, for sanity checks.
    pub fn floor_count(&self) -> usize {
        (0..self.grid.node_count())
            .filter(|&i| self.grid.is_traversable(NodeId(i)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swarm(agents: usize) -> Swarm {
        Swarm::new(7, agents, ManagerConfig::default().with_computations_per_frame(4)).unwrap()
    }

    #[test]
    fn agents_start_on_floor() {
        let s = swarm(6);
        assert_eq!(s.agents.len(), 6);
        assert!(s.agents.iter().all(|a| !s.grid.is_wall(a.pos)));
        assert_eq!(s.occupied.len(), 6);
        assert!(s.floor_count() > 0);
    }

    #[test]
    fn ticks_resolve_requests_and_move_agents() {
        let mut s = swarm(5);
        for _ in 0..40 {
            s.tick();
        }
        let st = s.stats();
        assert_eq!(st.ticks, 40);
        assert!(st.requested >= 5);
        assert!(st.resolved + st.failed > 0);
        assert!(st.resolved + st.failed <= st.requested);
        assert_eq!(s.occupied.len(), s.agents.len());
        for a in &s.agents {
            assert!(s.occupied.contains(&a.pos));
        }
    }

    #[test]
    fn paused_manager_stalls_the_swarm() {
        let mut s = swarm(3);
        s.manager_mut().pause();
        for _ in 0..5 {
            s.tick();
        }
        assert_eq!(s.stats().moves, 0);
        assert_eq!(s.stats().resolved + s.stats().failed, 0);
        assert_eq!(s.pending(), 3);
    }

    #[test]
    fn render_shows_agents() {
        let s = swarm(2);
        let frame = s.render();
        assert_eq!(frame.lines().count(), HEIGHT as usize);
        assert!(frame.lines().all(|l| l.chars().count() == WIDTH as usize));
        assert!(frame.contains('a'));
    }

    #[test]
    fn rejects_bad_pacing() {
        let pacing = ManagerConfig::default().with_frames_between_computations(0);
        assert!(Swarm::new(1, 1, pacing).is_err());
    }
}
