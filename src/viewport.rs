//! Mapping from host device pixels to logical canvas coordinates
//!
//! The host canvas can be zoomed and panned at any time, so nothing here is
//! cached: every conversion reads the live [`HostTransform`].

use crate::domain::{Point, ScreenPoint};
use crate::host::ViewportSource;

/// Zoom factor and canvas origin reported by the host
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostTransform {
    /// Host zoom; 2.0 means one logical pixel covers two device pixels
    pub scale: f32,
    /// On-screen origin of the canvas, in host-logical units (after dividing by `scale`)
    pub origin: Point,
}

impl Default for HostTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            origin: Point::default(),
        }
    }
}

impl HostTransform {
    pub fn new(scale: f32, origin: Point) -> Self {
        Self { scale, origin }
    }

    /// Scale usable as a divisor
    fn effective_scale(&self) -> f32 {
        if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            log::warn!("Ignoring invalid host scale {}", self.scale);
            1.0
        }
    }

    /// Convert a raw device position into logical canvas space
    pub fn to_logical(&self, raw: ScreenPoint) -> Point {
        let scale = self.effective_scale();
        Point::new(raw.x / scale - self.origin.x, raw.y / scale - self.origin.y)
    }

    /// Convert a logical canvas position back into device pixels
    pub fn to_screen(&self, p: Point) -> ScreenPoint {
        let scale = self.effective_scale();
        ScreenPoint::new((p.x + self.origin.x) * scale, (p.y + self.origin.y) * scale)
    }
}

/// Convert using whatever transform the host reports right now
pub fn to_logical(source: &impl ViewportSource, raw: ScreenPoint) -> Point {
    source.transform().to_logical(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct LiveViewport {
        scale: Cell<f32>,
    }

    impl ViewportSource for LiveViewport {
        fn transform(&self) -> HostTransform {
            HostTransform::new(self.scale.get(), Point::new(10.0, 10.0))
        }
    }

    #[test]
    fn test_divides_by_scale_then_subtracts_origin() {
        let t = HostTransform::new(2.0, Point::new(10.0, 5.0));
        assert_eq!(t.to_logical(ScreenPoint::new(120.0, 50.0)), Point::new(50.0, 20.0));
    }

    #[test]
    fn test_to_screen_inverts_to_logical() {
        let t = HostTransform::new(0.5, Point::new(3.0, 4.0));
        let p = Point::new(17.0, 29.0);
        assert_eq!(t.to_logical(t.to_screen(p)), p);
    }

    #[test]
    fn test_invalid_scale_falls_back_to_identity() {
        for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let t = HostTransform::new(scale, Point::default());
            assert_eq!(t.to_logical(ScreenPoint::new(8.0, 9.0)), Point::new(8.0, 9.0));
        }
    }

    #[test]
    fn test_reads_live_scale_every_call() {
        let viewport = LiveViewport {
            scale: Cell::new(1.0),
        };
        let raw = ScreenPoint::new(100.0, 100.0);
        assert_eq!(to_logical(&viewport, raw), Point::new(90.0, 90.0));
        viewport.scale.set(2.0);
        assert_eq!(to_logical(&viewport, raw), Point::new(40.0, 40.0));
    }
}
