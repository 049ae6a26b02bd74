//! Layout algorithms for the family chart.
//!
//! This module turns a [`FamilyGraph`](crate::graph::FamilyGraph) into card
//! positions: persons are grouped into family units, ranked into generation
//! rows, then placed recursively with memoized subtree widths. Connector
//! geometry for the rendering layer is derived from the final positions.

pub mod connectors;
pub mod family_tree;
pub mod family_units;
pub mod generations;

pub use connectors::{ChildDrop, Connector, Segment};
pub use family_tree::{
    FamilyLayoutResult, FamilyTreeLayout, LayoutConfig, LayoutNodeView, LayoutPosition,
    LayoutSnapshot,
};
pub use family_units::{FamilyUnit, FamilyUnits, UnitGroup};
pub use generations::Generations;
