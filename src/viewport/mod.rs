//! Viewport math for the rendered chart.
//!
//! - `transform`: pure pan/zoom/fit state
//! - `gesture`: thin pointer adapter that separates clicks from drags

pub mod gesture;
pub mod transform;

pub use gesture::{PointerGesture, PointerRelease};
pub use transform::{ViewportConfig, ViewportTransform, WorldRect};
