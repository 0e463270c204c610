//! Session state: the single owner of points, canvas size and image
//!
//! Every handler runs to completion on the interaction thread. After any
//! change, [`Session::finish`] publishes both slot projections and redraws.

use crate::background::{
    BackgroundImage, BackgroundImageManager, ImagePayload, ImageSource, LoadOutcome, LoadTicket,
    accepts_mime, decode,
};
use crate::config::MapperConfig;
use crate::domain::{CanvasDimensions, DisplaySize, DragState, Point, PointSet};
use crate::host::Host;
use crate::render::{OverlayScene, build_scene};
use crate::store::{CoordinateStore, deserialize_points, project, try_deserialize_points};

/// One editor instance bound to one host node
pub struct Session<H: Host> {
    pub(super) host: H,
    pub(super) config: MapperConfig,
    pub(super) dims: CanvasDimensions,
    pub(super) display: DisplaySize,
    pub(super) points: PointSet,
    pub(super) store: CoordinateStore,
    pub(super) background: BackgroundImageManager,
    pub(super) drag: Option<DragState>,
}

impl<H: Host> Session<H> {
    /// Open an editor with the configured default canvas size
    pub fn new(host: H, config: MapperConfig) -> anyhow::Result<Self> {
        let dims = config.default_dimensions();
        Self::with_dimensions(host, config, dims)
    }

    /// Open an editor, restoring points from the host's `points_store` slot
    ///
    /// Fails only when the host lacks one of the required slots.
    pub fn with_dimensions(
        host: H,
        config: MapperConfig,
        dims: CanvasDimensions,
    ) -> anyhow::Result<Self> {
        let store = CoordinateStore::attach(&host)?;
        let restored = store.load(&host);
        let dims = CanvasDimensions::new(dims.width.max(1), dims.height.max(1));
        let display = DisplaySize {
            width: config.initial_node_width,
            height: dims.height + config.node_padding_y,
        };

        let mut session = Self {
            host,
            config,
            dims,
            display,
            points: PointSet::new(),
            store,
            background: BackgroundImageManager::new(),
            drag: None,
        };
        session.apply_restored(restored);
        session.fit_display();
        log::info!(
            "Editor opened at {}x{} with {} points",
            session.dims.width,
            session.dims.height,
            session.points.len()
        );
        session.finish();
        Ok(session)
    }

    /// Restore entry point for session reconstruction
    ///
    /// The image goes first since a size change resets the layout; the
    /// stored points then replace that layout when present. Both slots are
    /// rewritten afterwards since the host's copy may not match the last
    /// commit.
    pub fn restore(&mut self, points_store: &str, image: Option<&ImagePayload>) {
        if let Some(payload) = image {
            self.load_image(ImageSource::from_payload(payload));
        }
        self.apply_restored(deserialize_points(points_store));
        self.store.invalidate();
        self.finish();
    }

    /// Start over with the default layout, ignoring stored points
    pub fn new_canvas(&mut self) {
        self.drag = None;
        self.reset_layout();
        self.store.invalidate();
        self.finish();
    }

    fn apply_restored(&mut self, restored: Vec<Point>) {
        if restored.is_empty() {
            self.reset_layout();
        } else {
            let dims = self.dims;
            self.points
                .replace(restored.into_iter().map(|p| p.clamped(dims)).collect());
        }
    }

    pub(super) fn reset_layout(&mut self) {
        self.points.reset_with_inset(self.dims, self.config.corner_inset);
    }

    /// Publish both projections and redraw
    pub(super) fn finish(&mut self) {
        self.store.sync(&self.points, &mut self.host);
        self.redraw();
    }

    /// Present the current overlay without touching the store
    pub fn redraw(&mut self) {
        let scene = self.scene();
        self.host.present(&scene);
    }

    /// Overlay for the current state
    pub fn scene(&self) -> OverlayScene {
        build_scene(
            &self.points,
            self.dims,
            self.background.current(),
            &self.config.render,
        )
    }

    // ------------------------------------------------------------------
    // Width/height controls
    // ------------------------------------------------------------------

    /// Width control changed
    ///
    /// Only widths past the threshold resize the node and redraw.
    pub fn set_width(&mut self, width: u32) {
        self.resize_canvas(CanvasDimensions::new(width.max(1), self.dims.height));
        if self.dims.width > self.config.width_threshold {
            self.fit_display();
            self.finish();
        } else {
            self.store.sync(&self.points, &mut self.host);
        }
    }

    /// Height control changed; always resizes and redraws
    pub fn set_height(&mut self, height: u32) {
        self.resize_canvas(CanvasDimensions::new(self.dims.width, height.max(1)));
        self.fit_display();
        self.finish();
    }

    /// Adopt new bounds, pulling any point that fell outside back in
    fn resize_canvas(&mut self, dims: CanvasDimensions) {
        self.dims = dims;
        for i in 0..self.points.len() {
            if let Some(p) = self.points.get(i)
                && !dims.contains(p)
            {
                self.points.move_point(i, p, dims);
            }
        }
    }

    /// Size the node around the canvas
    fn fit_display(&mut self) {
        if self.dims.width > self.config.width_threshold {
            self.display.width = self.dims.width + self.config.node_padding_x;
        }
        self.display.height = self.dims.height + self.config.node_padding_y;
        self.host.resize_display(self.display);
    }

    // ------------------------------------------------------------------
    // Background image
    // ------------------------------------------------------------------

    /// Register a new load; earlier pending loads become stale
    pub fn begin_image_load(&mut self) -> LoadTicket {
        self.background.begin_load()
    }

    /// Deliver a decode started with [`Session::begin_image_load`]
    ///
    /// Returns true when the image was applied.
    pub fn finish_image_load(
        &mut self,
        ticket: LoadTicket,
        result: anyhow::Result<BackgroundImage>,
    ) -> bool {
        let new_dims = match self.background.complete(ticket, result) {
            LoadOutcome::Applied(image) => {
                self.host.store_image(Some(&image.payload));
                image.dimensions()
            }
            LoadOutcome::Stale | LoadOutcome::Failed => return false,
        };

        if new_dims != self.dims {
            log::info!(
                "Canvas resized by image: {}x{} -> {}x{}",
                self.dims.width,
                self.dims.height,
                new_dims.width,
                new_dims.height
            );
            self.dims = new_dims;
            self.fit_display();
            self.drag = None;
            self.reset_layout();
        }
        self.finish();
        true
    }

    /// Decode and apply an image in one step
    pub fn load_image(&mut self, source: ImageSource) -> bool {
        let ticket = self.begin_image_load();
        let result = decode(&source, &self.config.image);
        self.finish_image_load(ticket, result)
    }

    /// A file was pasted or dropped onto the node
    ///
    /// Returns false for anything that is not an image so the host can
    /// offer it to other handlers.
    pub fn on_file_dropped(&mut self, file: ImageSource) -> bool {
        match &file {
            ImageSource::File { mime_type, .. } if accepts_mime(mime_type) => {
                self.load_image(file);
                true
            }
            ImageSource::File { mime_type, .. } => {
                log::debug!("Ignoring dropped file of type {}", mime_type);
                false
            }
            ImageSource::Base64 { .. } => {
                self.load_image(file);
                true
            }
        }
    }

    /// The backend produced a reference image (base64 JPEG)
    pub fn on_executed(&mut self, bg_image: &str) -> bool {
        self.load_image(ImageSource::Base64 {
            mime_type: "image/jpeg".to_string(),
            payload: bg_image.to_string(),
        })
    }

    /// Drop the background image; points are untouched
    pub fn clear_image(&mut self) -> bool {
        let cleared = self.background.clear();
        if cleared {
            self.host.store_image(None);
        }
        self.finish();
        cleared
    }

    // ------------------------------------------------------------------
    // Host-side edits
    // ------------------------------------------------------------------

    /// The host changed the raw `points_store` value
    ///
    /// Unparseable input keeps the current points. Either way the slot is
    /// rewritten from the point set, since the raw text may hold entries
    /// that were truncated or clamped away.
    pub fn on_points_store_edited(&mut self, raw: &str) -> bool {
        let applied = match try_deserialize_points(raw) {
            Ok(points) => {
                let dims = self.dims;
                self.drag = None;
                self.points
                    .replace(points.into_iter().map(|p| p.clamped(dims)).collect());
                true
            }
            Err(err) => {
                log::warn!("Ignoring unparseable points_store edit: {}", err);
                false
            }
        };
        self.store.invalidate();
        self.finish();
        applied
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    pub fn dimensions(&self) -> CanvasDimensions {
        self.dims
    }

    pub fn display_size(&self) -> DisplaySize {
        self.display
    }

    pub fn image(&self) -> Option<&BackgroundImage> {
        self.background.current()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The downstream `coordinates` value for the current points
    pub fn coordinates(&self) -> String {
        project(&self.points).coordinates
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Tear the session down, handing the host back
    pub fn into_host(self) -> H {
        self.host
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::RecordingHost;
    use super::*;
    use crate::background::image::tests::png_file;
    use crate::host::{COORDINATES_SLOT, POINTS_STORE_SLOT, SlotStore};
    use crate::store::serialize_points;

    fn session_400() -> Session<RecordingHost> {
        Session::with_dimensions(
            RecordingHost::new(),
            MapperConfig::default(),
            CanvasDimensions::new(400, 400),
        )
        .unwrap()
    }

    fn session_with_store(raw: &str) -> Session<RecordingHost> {
        Session::with_dimensions(
            RecordingHost::with_points_store(raw),
            MapperConfig::default(),
            CanvasDimensions::new(400, 400),
        )
        .unwrap()
    }

    #[test]
    fn test_missing_slot_is_fatal() {
        let host = RecordingHost::without_slot(COORDINATES_SLOT);
        assert!(Session::new(host, MapperConfig::default()).is_err());
    }

    #[test]
    fn test_opens_with_default_layout() {
        let session = session_400();
        assert_eq!(
            session.points().points(),
            &[
                Point::new(60.0, 60.0),
                Point::new(340.0, 60.0),
                Point::new(340.0, 340.0),
                Point::new(60.0, 340.0),
            ]
        );
        let host = session.host();
        assert_eq!(host.commits.len(), 1);
        assert_eq!(host.presented.len(), 1);
        assert_eq!(
            host.slot(COORDINATES_SLOT).unwrap(),
            session.coordinates()
        );
    }

    #[test]
    fn test_restores_stored_points() {
        let host = RecordingHost::with_points_store(r#"[{"x":1,"y":2},{"x":900,"y":3}]"#);
        let session =
            Session::with_dimensions(host, MapperConfig::default(), CanvasDimensions::new(400, 400))
                .unwrap();
        // Restored points are clamped into the canvas
        assert_eq!(
            session.points().points(),
            &[Point::new(1.0, 2.0), Point::new(400.0, 3.0)]
        );
    }

    #[test]
    fn test_malformed_store_opens_with_defaults() {
        let host = RecordingHost::with_points_store("{bad");
        let session = Session::new(host, MapperConfig::default()).unwrap();
        assert_eq!(session.points().len(), 4);
        assert!(session.points().is_complete());
    }

    #[test]
    fn test_image_with_new_size_resets_points() {
        let mut session = session_400();
        session.host_mut().clear_log();
        session.on_points_store_edited(r#"[{"x":5,"y":5}]"#);
        assert_eq!(session.points().len(), 1);

        assert!(session.load_image(png_file(800, 600)));
        assert_eq!(session.dimensions(), CanvasDimensions::new(800, 600));
        assert_eq!(
            session.points().points(),
            &[
                Point::new(120.0, 90.0),
                Point::new(680.0, 90.0),
                Point::new(680.0, 510.0),
                Point::new(120.0, 510.0),
            ]
        );
        let host = session.host();
        assert!(host.stored_image.is_some());
        assert_eq!(
            host.display_sizes.last(),
            Some(&DisplaySize {
                width: 845,
                height: 850
            })
        );
        assert!(host.presented.last().unwrap().outline.is_some());
    }

    #[test]
    fn test_image_with_same_size_keeps_points() {
        let mut session = session_400();
        session.on_points_store_edited(r#"[{"x":5,"y":5}]"#);
        assert!(session.load_image(png_file(400, 400)));
        assert_eq!(session.points().points(), &[Point::new(5.0, 5.0)]);
        assert!(session.image().is_some());
    }

    #[test]
    fn test_decode_failure_leaves_state() {
        let mut session = session_400();
        let before = session.points().clone();
        let bad = ImageSource::File {
            name: "broken.png".to_string(),
            last_modified: 0,
            mime_type: "image/png".to_string(),
            bytes: b"not an image".to_vec(),
        };
        assert!(!session.load_image(bad));
        assert_eq!(session.points(), &before);
        assert_eq!(session.dimensions(), CanvasDimensions::new(400, 400));
        assert!(session.image().is_none());
    }

    #[test]
    fn test_stale_decode_is_ignored() {
        let mut session = session_400();
        let slow = session.begin_image_load();
        let fast = session.begin_image_load();
        let config = session.config().image;

        let fast_img = decode(&png_file(300, 200), &config).unwrap();
        let slow_img = decode(&png_file(640, 480), &config).unwrap();
        assert!(session.finish_image_load(fast, Ok(fast_img)));
        assert!(!session.finish_image_load(slow, Ok(slow_img)));
        assert_eq!(session.dimensions(), CanvasDimensions::new(300, 200));
    }

    #[test]
    fn test_clear_image_keeps_points() {
        let mut session = session_400();
        session.load_image(png_file(200, 100));
        let points = session.points().clone();
        assert!(session.clear_image());
        assert!(session.image().is_none());
        assert_eq!(session.points(), &points);
        assert!(session.host().stored_image.is_none());
    }

    #[test]
    fn test_dropped_non_image_is_rejected() {
        let mut session = session_400();
        let text = ImageSource::File {
            name: "notes.txt".to_string(),
            last_modified: 0,
            mime_type: "text/plain".to_string(),
            bytes: b"hello".to_vec(),
        };
        assert!(!session.on_file_dropped(text));
        assert!(session.on_file_dropped(png_file(64, 64)));
        assert_eq!(session.dimensions(), CanvasDimensions::new(64, 64));
    }

    #[test]
    fn test_width_threshold_controls_redraw() {
        let mut session = session_400();
        session.host_mut().clear_log();

        session.set_width(200);
        assert_eq!(session.dimensions().width, 200);
        assert!(session.host().presented.is_empty());
        assert!(session.host().display_sizes.is_empty());
        // Points past the new edge are pulled back in
        assert!(session.points().points().iter().all(|p| p.x <= 200.0));

        session.set_width(300);
        assert_eq!(session.host().presented.len(), 1);
        assert_eq!(session.display_size().width, 345);
    }

    #[test]
    fn test_height_always_redraws() {
        let mut session = session_400();
        session.host_mut().clear_log();
        session.set_height(100);
        assert_eq!(session.host().presented.len(), 1);
        assert_eq!(session.display_size().height, 350);
    }

    #[test]
    fn test_points_store_edit() {
        let mut session = session_400();
        assert!(!session.on_points_store_edited("[oops"));
        assert_eq!(session.points().len(), 4);

        assert!(session.on_points_store_edited(r#"[{"x":10,"y":20}]"#));
        assert_eq!(session.points().points(), &[Point::new(10.0, 20.0)]);
        assert_eq!(
            session.host().slot(POINTS_STORE_SLOT).unwrap(),
            r#"[{"x":10.0,"y":20.0}]"#
        );
    }

    #[test]
    fn test_points_store_edit_rewrites_raw_slot() {
        let mut session = session_400();
        let raw = r#"[{"x":60,"y":60},{"x":340,"y":60},{"x":340,"y":340},{"x":60,"y":340},{"x":999,"y":-5}]"#;
        session
            .host_mut()
            .slots
            .insert(POINTS_STORE_SLOT.to_string(), raw.to_string());

        assert!(session.on_points_store_edited(raw));
        assert_eq!(session.points().len(), 4);
        let expected = serialize_points(session.points().points());
        assert_eq!(session.host().slot(POINTS_STORE_SLOT).unwrap(), expected);
        assert_eq!(session.host().slot(COORDINATES_SLOT).unwrap(), expected);
    }

    #[test]
    fn test_points_store_edit_clamps_raw_slot() {
        let mut session = session_with_store(r#"[{"x":400,"y":0}]"#);
        let raw = r#"[{"x":900,"y":-40}]"#;
        session
            .host_mut()
            .slots
            .insert(POINTS_STORE_SLOT.to_string(), raw.to_string());

        assert!(session.on_points_store_edited(raw));
        assert_eq!(
            session.host().slot(POINTS_STORE_SLOT).unwrap(),
            r#"[{"x":400.0,"y":0.0}]"#
        );
    }

    #[test]
    fn test_unparseable_edit_restores_slot_text() {
        let mut session = session_400();
        session
            .host_mut()
            .slots
            .insert(POINTS_STORE_SLOT.to_string(), "[oops".to_string());

        assert!(!session.on_points_store_edited("[oops"));
        assert_eq!(
            session.host().slot(POINTS_STORE_SLOT).unwrap(),
            serialize_points(session.points().points())
        );
    }

    #[test]
    fn test_restore_rewrites_raw_slot() {
        let mut session = session_400();
        let defaults = serialize_points(session.points().points());
        let raw = r#"[{"x":60,"y":60},{"x":340,"y":60},{"x":340,"y":340},{"x":60,"y":340},{"x":1,"y":1}]"#;
        session
            .host_mut()
            .slots
            .insert(POINTS_STORE_SLOT.to_string(), raw.to_string());

        session.restore(raw, None);
        assert_eq!(session.host().slot(POINTS_STORE_SLOT).unwrap(), defaults);
    }

    #[test]
    fn test_restore_with_image_payload() {
        let mut session = session_400();
        let payload = decode(&png_file(320, 240), &session.config().image)
            .unwrap()
            .payload;
        session.restore(r#"[{"x":30,"y":40}]"#, Some(&payload));
        assert_eq!(session.dimensions(), CanvasDimensions::new(320, 240));
        assert_eq!(session.points().points(), &[Point::new(30.0, 40.0)]);
    }

    #[test]
    fn test_new_canvas_ignores_store() {
        let host = RecordingHost::with_points_store(r#"[{"x":1,"y":1}]"#);
        let mut session =
            Session::with_dimensions(host, MapperConfig::default(), CanvasDimensions::new(400, 400))
                .unwrap();
        session.new_canvas();
        assert_eq!(session.points().len(), 4);
        assert_eq!(session.points().get(0), Some(Point::new(60.0, 60.0)));
    }
}
