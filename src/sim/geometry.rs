//! Axis-aligned rectangle geometry
//!
//! Every collision query in the simulation reduces to one overlap test
//! between two pixel-space rectangles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in continuous pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `size` with its top-left corner at `origin`
    #[inline]
    pub fn square(origin: Vec2, size: f32) -> Self {
        Self::new(origin.x, origin.y, size, size)
    }
}

/// Strict overlap test: rectangles that only share an edge do not intersect.
#[inline]
pub fn rects_intersect(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}
