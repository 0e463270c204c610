//! Overlay scene description
//!
//! [`build_scene`] turns editor state into a flat list of things to draw.
//! It never mutates anything; the host's drawing toolkit (or
//! [`super::image::rasterize`]) turns the scene into pixels.

use std::fmt;

use super::geometry;
use crate::background::ImageReference;
use crate::config::RenderConfig;
use crate::domain::{CanvasDimensions, MAX_POINTS, Point, PointSet};

/// Straight (non-premultiplied) RGBA color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }
}

/// Per-index stroke colors of the selected marker
pub const PALETTE: [Color; 4] = [
    Color::rgb(0x07, 0xf9, 0x07),
    Color::rgb(0xf9, 0x07, 0xf9),
    Color::rgb(0xf9, 0x07, 0x07),
    Color::rgb(0x07, 0x07, 0xf9),
];

pub const NEUTRAL_FILL: Color = Color::rgb(0x22, 0x22, 0x22);
pub const IDLE_STROKE: Color = Color::rgb(0x66, 0x66, 0x66);
pub const IDLE_FILL: Color = Color::rgba(100, 100, 100, 153);
pub const SELECTED_FILL: Color = Color::rgba(255, 255, 255, 204);
pub const CENTER_DOT: Color = Color::rgb(255, 0, 0);
pub const OUTLINE: Color = Color::rgba(255, 255, 0, 204);
pub const READY: Color = Color::rgba(0, 128, 0, 204);
pub const NOT_READY: Color = Color::rgba(128, 0, 0, 204);

/// Help text shown in the corner of the canvas
pub const INSTRUCTIONS: &str =
    "Shift+click: add point\nDrag: move point\nRight-drag release: delete point";

/// What fills the canvas behind the markers
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Background {
    /// The background image, stretched to the canvas
    Image { width: u32, height: u32 },
    /// No image loaded
    Fill(Color),
}

/// Ring drawn for one point
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub index: usize,
    pub center: Point,
    pub radius: f32,
    pub stroke: Color,
    pub stroke_width: f32,
    pub fill: Color,
    pub center_dot_radius: f32,
    pub selected: bool,
}

/// Text drawn next to a point
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub index: usize,
    pub text: String,
    pub position: Point,
    pub font_size: f32,
}

/// Point count readout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusReadout {
    pub count: usize,
    pub capacity: usize,
    /// True once all four corners exist
    pub ready: bool,
}

impl StatusReadout {
    pub fn new(count: usize) -> Self {
        let count = count.min(MAX_POINTS);
        Self {
            count,
            capacity: MAX_POINTS,
            ready: count == MAX_POINTS,
        }
    }

    /// Points still missing before mapping is possible
    pub fn remaining(&self) -> usize {
        self.capacity - self.count
    }

    /// Background color of the readout badge
    pub fn color(&self) -> Color {
        if self.ready { READY } else { NOT_READY }
    }

    /// Longer status line, e.g. "3/4 need 1 more point"
    pub fn describe(&self) -> String {
        match self.remaining() {
            0 => format!("{self} ready for mapping"),
            1 => format!("{self} need 1 more point"),
            n => format!("{self} need {n} more points"),
        }
    }
}

impl fmt::Display for StatusReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.count, self.capacity)
    }
}

/// Everything the overlay shows for one editor state
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayScene {
    pub dimensions: CanvasDimensions,
    pub background: Background,
    pub markers: Vec<Marker>,
    pub labels: Vec<Label>,
    /// Closed quadrilateral, present only with exactly four points
    pub outline: Option<[Point; 4]>,
    pub outline_width: f32,
    pub status: StatusReadout,
    pub instructions: &'static str,
}

/// Build the overlay for the current state
pub fn build_scene(
    points: &PointSet,
    dims: CanvasDimensions,
    image: Option<&ImageReference>,
    config: &RenderConfig,
) -> OverlayScene {
    let radius = geometry::marker_radius(dims, config.min_marker_radius);
    let selected = points.selected();

    let markers = points
        .first_four()
        .iter()
        .enumerate()
        .map(|(index, &center)| {
            let is_selected = selected == Some(index);
            Marker {
                index,
                center,
                radius,
                stroke: if is_selected {
                    PALETTE[index % PALETTE.len()]
                } else {
                    IDLE_STROKE
                },
                stroke_width: config.marker_stroke_width,
                fill: if is_selected { SELECTED_FILL } else { IDLE_FILL },
                center_dot_radius: config.center_dot_radius,
                selected: is_selected,
            }
        })
        .collect();

    let labels = points
        .first_four()
        .iter()
        .enumerate()
        .map(|(index, &p)| Label {
            index,
            text: points.label(index).text(),
            position: geometry::label_position(p, dims),
            font_size: config.label_font_size,
        })
        .collect();

    let outline = match points.first_four() {
        &[a, b, c, d] => Some([a, b, c, d]),
        _ => None,
    };

    let background = match image {
        Some(img) => Background::Image {
            width: img.width(),
            height: img.height(),
        },
        None => Background::Fill(NEUTRAL_FILL),
    };

    OverlayScene {
        dimensions: dims,
        background,
        markers,
        labels,
        outline,
        outline_width: config.outline_width,
        status: StatusReadout::new(points.len()),
        instructions: INSTRUCTIONS,
    }
}
