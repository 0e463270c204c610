//! Pure domain types with minimal dependencies
//!
//! This module contains core types used throughout the editor.
//! Types here must not depend on the host, the renderer or image
//! decoding so they can be shared by every other module.

pub mod geometry;
pub mod points;
pub mod selection;

pub use geometry::*;
pub use points::*;
pub use selection::*;
