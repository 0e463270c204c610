//! Bounded, ordered set of calibration points
//!
//! Labels are positional: index 0 is always shown as top-left, index 1 as
//! top-right and so on. Removing or reordering points changes which label a
//! point carries. Points have no identity beyond their position in the set.

use super::geometry::{CanvasDimensions, Point};

/// Maximum number of points in a complete set
pub const MAX_POINTS: usize = 4;

/// Minimum number of points a removal may leave behind
pub const MIN_POINTS: usize = 1;

/// Fraction of width/height used to inset the default corners
pub const DEFAULT_INSET: f32 = 0.15;

/// Positional label for a point index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CornerLabel {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    /// Any index past the four corners
    Extra(usize),
}

impl CornerLabel {
    /// Label for a position in the set
    pub fn for_index(index: usize) -> Self {
        match index {
            0 => CornerLabel::TopLeft,
            1 => CornerLabel::TopRight,
            2 => CornerLabel::BottomRight,
            3 => CornerLabel::BottomLeft,
            n => CornerLabel::Extra(n),
        }
    }

    /// Display text for this label
    pub fn text(self) -> String {
        match self {
            CornerLabel::TopLeft => "top-left".to_string(),
            CornerLabel::TopRight => "top-right".to_string(),
            CornerLabel::BottomRight => "bottom-right".to_string(),
            CornerLabel::BottomLeft => "bottom-left".to_string(),
            CornerLabel::Extra(n) => format!("P{}", n + 1),
        }
    }
}

/// Ordered collection of up to four points plus the single selected index
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointSet {
    points: Vec<Point>,
    selected: Option<usize>,
}

impl PointSet {
    /// Empty set, nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from restored points, keeping at most [`MAX_POINTS`]
    pub fn from_points(mut points: Vec<Point>) -> Self {
        points.truncate(MAX_POINTS);
        Self {
            points,
            selected: None,
        }
    }

    /// Four-corner inset layout for the given canvas
    pub fn default_layout(dims: CanvasDimensions, inset: f32) -> Vec<Point> {
        // Snap the f32 inset back to its decimal value so 400 * 0.15 lands on 60.0
        let inset = (f64::from(inset.clamp(0.0, 0.5)) * 1e6).round() / 1e6;
        let (w, h) = (f64::from(dims.width), f64::from(dims.height));
        let near_x = (w * inset) as f32;
        let far_x = (w * (1.0 - inset)) as f32;
        let near_y = (h * inset) as f32;
        let far_y = (h * (1.0 - inset)) as f32;
        vec![
            Point::new(near_x, near_y),
            Point::new(far_x, near_y),
            Point::new(far_x, far_y),
            Point::new(near_x, far_y),
        ]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() == MAX_POINTS
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Append a point and select it. Ignored once the set is full.
    pub fn add(&mut self, point: Point) -> bool {
        if self.points.len() >= MAX_POINTS {
            return false;
        }
        self.points.push(point);
        self.selected = Some(self.points.len() - 1);
        true
    }

    /// Remove the point at `index`. Ignored when only one point is left.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.points.len() <= MIN_POINTS {
            return false;
        }
        debug_assert!(index < self.points.len(), "remove index {index} out of range");
        if index >= self.points.len() {
            return false;
        }
        self.points.remove(index);
        self.selected = None;
        true
    }

    /// Replace the point at `index` with `point` clamped into the canvas
    pub fn move_point(&mut self, index: usize, point: Point, dims: CanvasDimensions) -> Option<Point> {
        debug_assert!(index < self.points.len(), "move index {index} out of range");
        let slot = self.points.get_mut(index)?;
        *slot = point.clamped(dims);
        Some(*slot)
    }

    /// Replace every point with the default inset layout
    pub fn reset_to_default(&mut self, dims: CanvasDimensions) {
        self.reset_with_inset(dims, DEFAULT_INSET);
    }

    /// Like [`PointSet::reset_to_default`] with a configurable inset
    pub fn reset_with_inset(&mut self, dims: CanvasDimensions, inset: f32) {
        self.points = Self::default_layout(dims, inset);
        self.selected = None;
    }

    /// Replace all points (restore path), dropping the selection
    pub fn replace(&mut self, points: Vec<Point>) {
        *self = Self::from_points(points);
    }

    /// The first `min(len, 4)` points, published to downstream consumers
    pub fn first_four(&self) -> &[Point] {
        &self.points[..self.points.len().min(MAX_POINTS)]
    }

    pub fn select(&mut self, index: usize) {
        if index < self.points.len() {
            self.selected = Some(index);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Positional label of the point at `index`
    pub fn label(&self, index: usize) -> CornerLabel {
        CornerLabel::for_index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(w: u32, h: u32) -> CanvasDimensions {
        CanvasDimensions::new(w, h)
    }

    #[test]
    fn test_add_beyond_capacity_is_ignored() {
        let mut set = PointSet::new();
        for _ in 0..5 {
            set.add(Point::new(10.0, 10.0));
        }
        assert_eq!(set.len(), 4);
        assert!(!set.add(Point::new(1.0, 1.0)));
        assert_eq!(set.selected(), Some(3));
    }

    #[test]
    fn test_remove_keeps_last_point() {
        let mut set = PointSet::from_points(vec![Point::new(5.0, 5.0)]);
        assert!(!set.remove(0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut set = PointSet::new();
        set.add(Point::new(1.0, 1.0));
        set.add(Point::new(2.0, 2.0));
        assert_eq!(set.selected(), Some(1));
        assert!(set.remove(0));
        assert_eq!(set.points(), &[Point::new(2.0, 2.0)]);
        assert_eq!(set.selected(), None);
    }

    #[test]
    fn test_length_stays_bounded_under_mixed_sequence() {
        let mut set = PointSet::new();
        let ops = [true, true, false, true, true, true, true, false, false, false, false, true];
        for (i, add) in ops.iter().enumerate() {
            if *add {
                set.add(Point::new(i as f32, i as f32));
            } else if !set.is_empty() {
                set.remove(0);
            }
            assert!(set.len() <= MAX_POINTS);
        }
        assert!(set.len() >= MIN_POINTS);
    }

    #[test]
    fn test_move_clamps_into_canvas() {
        let mut set = PointSet::new();
        set.reset_to_default(dims(200, 100));
        let probes = [
            Point::new(-50.0, -1.0),
            Point::new(1e9, 1e9),
            Point::new(150.0, 42.0),
            Point::new(f32::NAN, 300.0),
        ];
        for p in probes {
            let moved = set.move_point(2, p, dims(200, 100)).unwrap();
            assert!((0.0..=200.0).contains(&moved.x));
            assert!((0.0..=100.0).contains(&moved.y));
        }
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_default_layout_400() {
        let mut set = PointSet::new();
        set.reset_to_default(dims(400, 400));
        assert_eq!(
            set.points(),
            &[
                Point::new(60.0, 60.0),
                Point::new(340.0, 60.0),
                Point::new(340.0, 340.0),
                Point::new(60.0, 340.0),
            ]
        );
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut a = PointSet::new();
        a.add(Point::new(3.0, 4.0));
        a.reset_to_default(dims(800, 600));
        let first = a.clone();
        a.reset_to_default(dims(800, 600));
        assert_eq!(a, first);
    }

    #[test]
    fn test_first_four_caps_restored_points() {
        let set = PointSet::from_points((0..6).map(|i| Point::new(i as f32, 0.0)).collect());
        assert_eq!(set.len(), 4);
        assert_eq!(set.first_four().len(), 4);

        let small = PointSet::from_points(vec![Point::new(1.0, 1.0)]);
        assert_eq!(small.first_four().len(), 1);
    }

    #[test]
    fn test_labels_are_positional() {
        let mut set = PointSet::new();
        set.reset_to_default(dims(100, 100));
        let second = set.get(1).unwrap();
        set.remove(0);
        assert_eq!(set.get(0), Some(second));
        assert_eq!(set.label(0), CornerLabel::TopLeft);
        assert_eq!(CornerLabel::for_index(5).text(), "P6");
    }
}
