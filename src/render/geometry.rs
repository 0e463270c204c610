//! Shared layout math for the overlay
//!
//! Used both when building the scene description and when hit-testing
//! pointer events, so markers are grabbed exactly where they are drawn.

use crate::domain::{CanvasDimensions, Point};

/// Label placement offsets relative to the marker center
pub mod label {
    /// Horizontal offset for points in the left half
    pub const OFFSET_RIGHT: f32 = 30.0;
    /// Horizontal offset for points in the right half
    pub const OFFSET_LEFT: f32 = -35.0;
    /// Vertical offset for points in the top half
    pub const OFFSET_DOWN: f32 = 25.0;
    /// Vertical offset for points in the bottom half
    pub const OFFSET_UP: f32 = -25.0;
}

/// Marker radius for a canvas, growing slowly with its size
#[inline]
pub fn marker_radius(dims: CanvasDimensions, min_radius: f32) -> f32 {
    let side = dims.min_side().max(1) as f32;
    (side.ln() * 4.0).max(min_radius)
}

/// Where the label of a point goes: toward the canvas center
#[inline]
pub fn label_position(p: Point, dims: CanvasDimensions) -> Point {
    let x = if p.x < dims.width as f32 / 2.0 {
        p.x + label::OFFSET_RIGHT
    } else {
        p.x + label::OFFSET_LEFT
    };
    let y = if p.y < dims.height as f32 / 2.0 {
        p.y + label::OFFSET_DOWN
    } else {
        p.y + label::OFFSET_UP
    };
    Point::new(x, y)
}

/// Index of the nearest point within `radius` of `at`
pub fn hit_test(points: &[Point], at: Point, radius: f32) -> Option<usize> {
    let radius_sq = radius * radius;
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.distance_sq(at)))
        .filter(|(_, d)| *d <= radius_sq)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_radius() {
        let r = marker_radius(CanvasDimensions::new(512, 400), 8.0);
        assert!((r - 400f32.ln() * 4.0).abs() < 1e-4);
        assert_eq!(marker_radius(CanvasDimensions::new(2, 2), 8.0), 8.0);
    }

    #[test]
    fn test_label_points_inward() {
        let dims = CanvasDimensions::new(400, 400);
        assert_eq!(label_position(Point::new(60.0, 60.0), dims), Point::new(90.0, 85.0));
        assert_eq!(
            label_position(Point::new(340.0, 340.0), dims),
            Point::new(305.0, 315.0)
        );
    }

    #[test]
    fn test_hit_test_picks_nearest() {
        let points = [Point::new(10.0, 10.0), Point::new(20.0, 10.0)];
        assert_eq!(hit_test(&points, Point::new(16.0, 10.0), 8.0), Some(1));
        assert_eq!(hit_test(&points, Point::new(14.0, 10.0), 8.0), Some(0));
        assert_eq!(hit_test(&points, Point::new(100.0, 100.0), 8.0), None);
        assert_eq!(hit_test(&[], Point::new(0.0, 0.0), 8.0), None);
    }
}
