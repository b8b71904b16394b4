//! Spatial indexing for O(log n) hit testing.
//!
//! This module provides an R-tree over the laid-out node rectangles of the
//! current scene.

mod rtree;

pub use rtree::{NodeHitIndex, NodeRect};
