use log::info;

use crate::config::ManagerConfig;
use crate::error::PathError;
use crate::request::PathRequestQueue;
use crate::traits::NodeGraph;

/// Whether a [`PathManager`] resolves requests on tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ManagerStatus {
    Paused,
    Running,
}

/// Paces a [`PathRequestQueue`] over a frame loop.
///
/// Call [`tick`](Self::tick) once per frame. Every
/// `frames_between_computations` ticks it resolves up to
/// `computations_per_frame` requests. The first computing tick comes only
/// after a full interval has elapsed, so the very first tick never
/// computes.
#[derive(Debug)]
pub struct PathManager {
    config: ManagerConfig,
    paused: bool,
    frames: u32,
}

impl PathManager {
    pub fn new(config: ManagerConfig) -> Result<Self, PathError> {
        config.validate()?;
        Ok(Self {
            config,
            paused: false,
            frames: 0,
        })
    }

    #[inline]
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Advance one frame. Returns how many requests were resolved.
    pub fn tick<G: NodeGraph>(&mut self, queue: &PathRequestQueue, graph: &mut G) -> usize {
        if self.paused {
            return 0;
        }
        let mut done = 0;
        if self.frames >= self.config.frames_between_computations {
            done = queue.compute_batch(graph, self.config.computations_per_frame as usize);
            self.frames = 0;
        }
        self.frames += 1;
        done
    }

    /// Stop resolving requests until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        self.paused = true;
        info!("path manager paused");
    }

    pub fn resume(&mut self) {
        self.paused = false;
        info!("path manager resumed");
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn status(&self) -> ManagerStatus {
        let status = if self.paused {
            ManagerStatus::Paused
        } else {
            ManagerStatus::Running
        };
        info!("path manager is {status:?}");
        status
    }
}

impl Default for PathManager {
    fn default() -> Self {
        Self {
            config: ManagerConfig::default(),
            paused: false,
            frames: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridGraph, Neighborhood};
    use crate::request::PathRequest;
    use crate::traits::NodeId;
    use wayfind_core::Range;

    fn queue_of(n: usize) -> PathRequestQueue {
        let queue = PathRequestQueue::new();
        for _ in 0..n {
            queue.push(PathRequest::new(NodeId(0), NodeId(3), |_| {}));
        }
        queue
    }

    #[test]
    fn first_tick_is_skipped() {
        let mut g = GridGraph::new(Range::sized(4, 1), Neighborhood::Four);
        let queue = queue_of(3);
        let mut m = PathManager::default();
        let per_tick: Vec<_> = (0..4).map(|_| m.tick(&queue, &mut g)).collect();
        assert_eq!(per_tick, [0, 1, 1, 1]);
        assert!(queue.is_empty());
    }

    #[test]
    fn pacing_follows_config() {
        let mut g = GridGraph::new(Range::sized(4, 1), Neighborhood::Four);
        let queue = queue_of(10);
        let config = ManagerConfig::default()
            .with_computations_per_frame(3)
            .with_frames_between_computations(2);
        let mut m = PathManager::new(config).unwrap();
        let per_tick: Vec<_> = (0..6).map(|_| m.tick(&queue, &mut g)).collect();
        assert_eq!(per_tick, [0, 0, 3, 0, 3, 0]);
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn paused_manager_does_nothing() {
        let mut g = GridGraph::new(Range::sized(4, 1), Neighborhood::Four);
        let queue = queue_of(2);
        let mut m = PathManager::default();
        m.tick(&queue, &mut g);
        m.pause();
        assert_eq!(m.status(), ManagerStatus::Paused);
        assert!(m.is_paused());
        assert_eq!(m.tick(&queue, &mut g), 0);
        assert_eq!(queue.len(), 2);
        m.resume();
        assert_eq!(m.status(), ManagerStatus::Running);
        assert_eq!(m.tick(&queue, &mut g), 1);
    }

    #[test]
    fn rejects_zero_pacing() {
        let config = ManagerConfig::default().with_computations_per_frame(0);
        assert!(PathManager::new(config).is_err());
    }
}
