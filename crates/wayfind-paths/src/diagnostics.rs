use std::time::{Duration, Instant};

/// Wall-clock timings of one successful search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchTimings {
    /// Time spent expanding nodes until the destination was popped.
    pub search: Duration,
    /// Time spent walking parent links into the final path.
    pub reconstruction: Duration,
}

/// Lap timer.
#[derive(Debug)]
pub(crate) struct Stopwatch {
    last: Instant,
}

impl Stopwatch {
    pub(crate) fn start() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Time since the previous lap (or start), restarting the lap.
    pub(crate) fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now - self.last;
        self.last = now;
        elapsed
    }
}
