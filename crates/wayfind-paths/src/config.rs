use crate::error::PathError;

/// Tuning for a single A* search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Maximum number of nodes expanded before giving up.
    pub depth: u32,
    /// Expected node count; pre-sizes the open set. Larger graphs still work.
    pub map_size: usize,
    /// Measure search and reconstruction time and log them at debug level.
    pub diagnostics: bool,
}

impl SearchConfig {
    pub const DEFAULT_DEPTH: u32 = i32::MAX as u32;
    pub const DEFAULT_MAP_SIZE: usize = 10_000;

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_map_size(mut self, map_size: usize) -> Self {
        self.map_size = map_size;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: Self::DEFAULT_DEPTH,
            map_size: Self::DEFAULT_MAP_SIZE,
            diagnostics: false,
        }
    }
}

/// Pacing for [`PathManager`](crate::PathManager).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ManagerConfig {
    /// Requests resolved on each computing tick.
    pub computations_per_frame: u32,
    /// Ticks between computing ticks.
    pub frames_between_computations: u32,
}

impl ManagerConfig {
    pub fn with_computations_per_frame(mut self, n: u32) -> Self {
        self.computations_per_frame = n;
        self
    }

    pub fn with_frames_between_computations(mut self, n: u32) -> Self {
        self.frames_between_computations = n;
        self
    }

    /// Both values must be at least one.
    pub fn validate(&self) -> Result<(), PathError> {
        if self.computations_per_frame == 0 {
            return Err(PathError::InvalidConfig {
                field: "computations_per_frame",
                reason: "must be at least 1",
            });
        }
        if self.frames_between_computations == 0 {
            return Err(PathError::InvalidConfig {
                field: "frames_between_computations",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            computations_per_frame: 1,
            frames_between_computations: 1,
        }
    }
}
