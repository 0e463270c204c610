//! Overlay rasterization using tiny-skia
//!
//! Draws an [`OverlayScene`] onto an RgbaImage for previews and exports.
//! Text (labels, status) is left to the host toolkit.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::overlay::{Background, CENTER_DOT, Color, Marker, OverlayScene};
use crate::domain::Point;

/// Convert RgbaImage to Pixmap, apply drawing function, and copy back
pub(crate) fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    img.copy_from_slice(pixmap.data());
}

fn paint(color: Color) -> Paint<'static> {
    let [r, g, b, a] = color.0;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

/// Build a closed polygon path through the given points
pub(crate) fn build_outline_path(points: &[Point; 4]) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(points[0].x, points[0].y);
    for p in &points[1..] {
        pb.line_to(p.x, p.y);
    }
    pb.close();
    pb.finish()
}

fn draw_marker(pixmap: &mut Pixmap, marker: &Marker) {
    let Some(ring) = PathBuilder::from_circle(marker.center.x, marker.center.y, marker.radius)
    else {
        return;
    };
    pixmap.fill_path(
        &ring,
        &paint(marker.fill),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
    pixmap.stroke_path(
        &ring,
        &paint(marker.stroke),
        &round_stroke(marker.stroke_width),
        Transform::identity(),
        None,
    );

    if let Some(dot) =
        PathBuilder::from_circle(marker.center.x, marker.center.y, marker.center_dot_radius)
    {
        pixmap.fill_path(
            &dot,
            &paint(CENTER_DOT),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}

/// Start image for the scene: the background stretched to the canvas, or a flat fill
fn base_image(scene: &OverlayScene, background: Option<&RgbaImage>) -> RgbaImage {
    let (w, h) = (
        scene.dimensions.width.max(1),
        scene.dimensions.height.max(1),
    );
    match (scene.background, background) {
        (Background::Image { .. }, Some(img)) if img.dimensions() == (w, h) => img.clone(),
        (Background::Image { .. }, Some(img)) => imageops::resize(img, w, h, FilterType::Triangle),
        (Background::Fill(color), _) => RgbaImage::from_pixel(w, h, Rgba(color.0)),
        (Background::Image { .. }, None) => {
            log::debug!("Scene expects a background image but none was given");
            RgbaImage::from_pixel(w, h, Rgba(super::overlay::NEUTRAL_FILL.0))
        }
    }
}

/// Draw the whole scene: background, outline, then markers on top
pub fn rasterize(scene: &OverlayScene, background: Option<&RgbaImage>) -> RgbaImage {
    let mut img = base_image(scene, background);

    with_pixmap(&mut img, |pixmap| {
        if let Some(outline) = &scene.outline
            && let Some(path) = build_outline_path(outline)
        {
            pixmap.stroke_path(
                &path,
                &paint(super::overlay::OUTLINE),
                &round_stroke(scene.outline_width),
                Transform::identity(),
                None,
            );
        }

        for marker in &scene.markers {
            draw_marker(pixmap, marker);
        }
    });

    img
}
