//! Coordinate and geometry types.
//!
//! Shapes live in a target-local normalized space:
//! - origin top-left, `(1, 1)` bottom-right
//! - +X right, +Y down
//!
//! Text and render-texture sizes are expressed in physical pixels; the
//! conversion to normalized space is a [`Transform`](crate::transform::Transform).

mod geometry;
mod rect;
mod vector;
mod viewport;

pub use geometry::{Circle, Triangle};
pub use rect::Rectangle;
pub use vector::{Vector2f, Vector3f};
pub use viewport::Viewport;
