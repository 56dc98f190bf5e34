//! **wayfind-core**: geometry types shared across the *wayfind* crates.
//!
//! Grid-backed graphs in `wayfind-paths` map cells to arena indices through
//! [`Range`]; the search itself never sees a coordinate.

pub mod geom;

pub use geom::{Point, Range, RangeIter};
