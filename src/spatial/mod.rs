//! Spatial indexing for O(log n) hit testing.
//!
//! This module provides an R-tree over laid-out person cards so the
//! rendering layer can map pointer positions and viewport rectangles back
//! to persons.

mod rtree;

pub use rtree::{CardRect, SpatialIndex};
