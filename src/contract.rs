//! Consumer side of the `coordinates` contract
//!
//! This module contains:
//! - Parsing of the published coordinates (objects or pairs)
//! - Rescaling and clamping into the reference image
//! - The human-readable point summary
//! - The filled quadrilateral selection mask

use anyhow::Context;
use image::{GrayImage, Luma, RgbaImage};
use serde_json::Value;
use tiny_skia::{FillRule, Paint, Transform};

use crate::domain::{CanvasDimensions, CornerLabel, MAX_POINTS, Point};
use crate::render::image::{build_outline_path, with_pixmap};

/// Integer pixel position as consumed downstream
pub type PixelPoint = [i32; 2];

/// Everything a consumer derives from one `coordinates` value
#[derive(Debug, Clone)]
pub struct Selection {
    /// First four points as a JSON array of `[x, y]` pairs
    pub four_points: String,
    pub point_info: String,
    pub mask: GrayImage,
}

fn coordinate(value: &Value) -> anyhow::Result<i32> {
    value
        .as_f64()
        .map(|v| v.round_ties_even() as i32)
        .with_context(|| format!("coordinate {value} is not a number"))
}

fn pixel_point(entry: &Value) -> anyhow::Result<Option<PixelPoint>> {
    match entry {
        // Missing keys count as 0
        Value::Object(map) => {
            let x = map.get("x").map(coordinate).transpose()?.unwrap_or(0);
            let y = map.get("y").map(coordinate).transpose()?.unwrap_or(0);
            Ok(Some([x, y]))
        }
        Value::Array(pair) if pair.len() >= 2 => {
            Ok(Some([coordinate(&pair[0])?, coordinate(&pair[1])?]))
        }
        _ => Ok(None),
    }
}

/// Parse a coordinates value into rounded pixel positions
///
/// Entries may be `{"x", "y"}` objects or `[x, y]` arrays. Entries of any
/// other shape are skipped. Malformed JSON, or a non-numeric coordinate in
/// any entry, yields an empty list.
pub fn parse_coordinates(raw: &str) -> Vec<PixelPoint> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    let parsed = serde_json::from_str::<Vec<Value>>(raw)
        .context("parsing coordinates JSON")
        .and_then(|entries| {
            entries
                .iter()
                .filter_map(|entry| pixel_point(entry).transpose())
                .collect::<anyhow::Result<Vec<_>>>()
        });
    match parsed {
        Ok(points) => points,
        Err(err) => {
            log::warn!("Failed to parse coordinates: {:#}", err);
            Vec::new()
        }
    }
}

/// Rescale points drawn on the canvas into reference image pixels
pub fn normalize_to_image(
    points: &mut [PixelPoint],
    canvas: CanvasDimensions,
    image: CanvasDimensions,
) {
    if canvas.width == 0 || canvas.height == 0 {
        log::warn!("Cannot normalize against an empty canvas");
        return;
    }
    for p in points.iter_mut() {
        p[0] = (i64::from(p[0]) * i64::from(image.width) / i64::from(canvas.width)) as i32;
        p[1] = (i64::from(p[1]) * i64::from(image.height) / i64::from(canvas.height)) as i32;
    }
}

/// Clamp points into `[0, width] x [0, height]`
pub fn clamp_to_image(points: &mut [PixelPoint], image: CanvasDimensions) {
    let (w, h) = (image.width as i32, image.height as i32);
    for p in points.iter_mut() {
        p[0] = p[0].clamp(0, w);
        p[1] = p[1].clamp(0, h);
    }
}

/// One-line summary such as `top-left: (10, 20) | top-right: (90, 20)`
pub fn point_info(points: &[PixelPoint]) -> String {
    if points.is_empty() {
        return "no points selected".to_string();
    }
    points
        .iter()
        .take(MAX_POINTS)
        .enumerate()
        .map(|(i, [x, y])| format!("{}: ({}, {})", CornerLabel::for_index(i).text(), x, y))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Filled mask of the quadrilateral spanned by the first four points
///
/// Fewer than four points produce an all-zero mask.
pub fn selection_mask(points: &[PixelPoint], width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let [a, b, c, d] = match points {
        [a, b, c, d, ..] => [*a, *b, *c, *d],
        _ => return mask,
    };
    let corners = [a, b, c, d].map(|[x, y]| Point::new(x as f32, y as f32));
    let Some(path) = build_outline_path(&corners) else {
        return mask;
    };

    let mut canvas = RgbaImage::new(width, height);
    with_pixmap(&mut canvas, |pixmap| {
        let mut paint = Paint::default();
        paint.set_color_rgba8(255, 255, 255, 255);
        paint.anti_alias = false;
        pixmap.fill_path(
            &path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    });

    for (x, y, px) in canvas.enumerate_pixels() {
        mask.put_pixel(x, y, Luma([px.0[3]]));
    }
    mask
}

/// Derive the consumer outputs from a `coordinates` value
///
/// With `normalize` set, points are rescaled from canvas to image pixels
/// before clamping.
pub fn resolve(
    coordinates: &str,
    canvas: CanvasDimensions,
    image: CanvasDimensions,
    normalize: bool,
) -> Selection {
    let mut points = parse_coordinates(coordinates);
    if normalize {
        normalize_to_image(&mut points, canvas, image);
    }
    clamp_to_image(&mut points, image);
    points.truncate(MAX_POINTS);

    Selection {
        // Plain integer pairs always serialize
        four_points: serde_json::to_string(&points).unwrap_or_else(|_| "[]".to_string()),
        point_info: point_info(&points),
        mask: selection_mask(&points, image.width, image.height),
    }
}
