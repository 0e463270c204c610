//! In-memory host used by session tests

use std::collections::HashMap;

use crate::background::ImagePayload;
use crate::domain::{DisplaySize, ScreenPoint};
use crate::host::{
    COORDINATES_SLOT, DisplayHost, MenuHost, OverlaySink, POINTS_STORE_SLOT, SlotStore,
    ViewportSource,
};
use crate::render::OverlayScene;
use crate::viewport::HostTransform;

/// Records every call a session makes into its host
#[derive(Default)]
pub struct RecordingHost {
    pub slots: HashMap<String, String>,
    pub commits: Vec<(String, String)>,
    pub stored_image: Option<ImagePayload>,
    pub display_sizes: Vec<DisplaySize>,
    pub presented: Vec<OverlayScene>,
    pub menu_opened_at: Vec<ScreenPoint>,
    pub menu_closed: usize,
    pub file_requests: usize,
    pub transform: HostTransform,
}

impl RecordingHost {
    /// Host with both slots allocated and empty
    pub fn new() -> Self {
        Self::with_points_store("")
    }

    pub fn with_points_store(raw: &str) -> Self {
        let mut host = Self::default();
        host.slots
            .insert(POINTS_STORE_SLOT.to_string(), raw.to_string());
        host.slots
            .insert(COORDINATES_SLOT.to_string(), String::new());
        host
    }

    pub fn without_slot(name: &str) -> Self {
        let mut host = Self::new();
        host.slots.remove(name);
        host
    }

    /// Forget recorded calls, keeping slot values
    pub fn clear_log(&mut self) {
        self.commits.clear();
        self.display_sizes.clear();
        self.presented.clear();
        self.menu_opened_at.clear();
        self.menu_closed = 0;
        self.file_requests = 0;
    }
}

impl SlotStore for RecordingHost {
    fn slot(&self, name: &str) -> Option<String> {
        self.slots.get(name).cloned()
    }

    fn commit_slots(&mut self, points_store: String, coordinates: String) {
        self.slots
            .insert(POINTS_STORE_SLOT.to_string(), points_store.clone());
        self.slots
            .insert(COORDINATES_SLOT.to_string(), coordinates.clone());
        self.commits.push((points_store, coordinates));
    }

    fn store_image(&mut self, payload: Option<&ImagePayload>) {
        self.stored_image = payload.cloned();
    }
}

impl DisplayHost for RecordingHost {
    fn resize_display(&mut self, size: DisplaySize) {
        self.display_sizes.push(size);
    }
}

impl OverlaySink for RecordingHost {
    fn present(&mut self, scene: &OverlayScene) {
        self.presented.push(scene.clone());
    }
}

impl MenuHost for RecordingHost {
    fn open_context_menu(&mut self, at: ScreenPoint) {
        self.menu_opened_at.push(at);
    }

    fn close_context_menu(&mut self) {
        self.menu_closed += 1;
    }

    fn pick_image_file(&mut self) {
        self.file_requests += 1;
    }
}

impl ViewportSource for RecordingHost {
    fn transform(&self) -> HostTransform {
        self.transform
    }
}
