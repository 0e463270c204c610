//! Overlay rendering module
//!
//! This module contains:
//! - Layout math shared by drawing and hit-testing (geometry.rs)
//! - The pure scene description of the overlay (overlay.rs)
//! - Rasterization of a scene using tiny-skia (image.rs)

pub mod geometry;
pub mod image;
pub mod overlay;

pub use overlay::{Background, Color, Label, Marker, OverlayScene, StatusReadout, build_scene};
