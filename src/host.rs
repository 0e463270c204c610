//! Interfaces the embedding node editor provides to a session
//!
//! Each collaborator is a narrow trait. A session is generic over one
//! [`Host`] value implementing all of them, which the embedding code wires
//! up explicitly.

use crate::background::ImagePayload;
use crate::domain::{DisplaySize, ScreenPoint};
use crate::render::OverlayScene;
use crate::viewport::HostTransform;

/// Name of the slot holding the full point set
pub const POINTS_STORE_SLOT: &str = "points_store";
/// Name of the slot holding the capped downstream coordinates
pub const COORDINATES_SLOT: &str = "coordinates";

/// Persisted widget storage owned by the host
pub trait SlotStore {
    /// Current value of a named slot, `None` if the host never allocated it
    fn slot(&self, name: &str) -> Option<String>;

    /// Write both projections in one step
    fn commit_slots(&mut self, points_store: String, coordinates: String);

    /// Persist (or drop) the background image payload
    fn store_image(&mut self, payload: Option<&ImagePayload>);
}

/// Sizing of the enclosing node
pub trait DisplayHost {
    fn resize_display(&mut self, size: DisplaySize);
}

/// Drawing surface that shows the overlay
pub trait OverlaySink {
    fn present(&mut self, scene: &OverlayScene);
}

/// Context menu and file picker
pub trait MenuHost {
    fn open_context_menu(&mut self, at: ScreenPoint);
    fn close_context_menu(&mut self);
    /// Ask the user for an image file; the host later calls back with it
    fn pick_image_file(&mut self);
}

/// Live zoom/pan state of the host canvas
pub trait ViewportSource {
    fn transform(&self) -> HostTransform;
}

/// Everything a session needs from its host
pub trait Host: SlotStore + DisplayHost + OverlaySink + MenuHost + ViewportSource {}

impl<T> Host for T where T: SlotStore + DisplayHost + OverlaySink + MenuHost + ViewportSource {}
