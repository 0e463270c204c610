//! Geometric types for canvas points and dimensions

use serde::{Deserialize, Serialize};

/// Point in logical canvas coordinates (image pixel space, zoom independent)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamp into `[0, width] x [0, height]`
    ///
    /// NaN coordinates collapse to the origin edge so a bad pointer sample
    /// can never leave the canvas.
    pub fn clamped(self, dims: CanvasDimensions) -> Self {
        let clamp = |v: f32, max: f32| {
            if v.is_nan() { 0.0 } else { v.clamp(0.0, max) }
        };
        Self {
            x: clamp(self.x, dims.width as f32),
            y: clamp(self.y, dims.height as f32),
        }
    }

    /// Squared distance to another point
    pub fn distance_sq(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Raw pointer position as reported by the host (device pixels)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Size of the drawing surface in logical pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasDimensions {
    pub width: u32,
    pub height: u32,
}

impl CanvasDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Smaller of the two sides
    pub fn min_side(&self) -> u32 {
        self.width.min(self.height)
    }

    /// Check if a logical point lies inside the canvas (edges inclusive)
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width as f32 && p.y <= self.height as f32
    }
}

/// Size requested for the enclosing node's display area
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}
