//! Pointer and menu handlers
//!
//! Translates raw host input into point-set transitions. Every handler
//! returns an [`Outcome`]; anything other than [`Outcome::Ignored`] ends
//! with a sync of both slots and a redraw.

use crate::domain::{DragState, PointerButton, PointerEvent, PointerKind};
use crate::host::Host;
use crate::render::geometry::{hit_test, marker_radius};
use crate::session::messages::{MenuAction, Outcome};
use crate::session::state::Session;
use crate::viewport;

impl<H: Host> Session<H> {
    /// Handle one pointer event from the host canvas
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Outcome {
        let outcome = match event.kind {
            PointerKind::Down => self.pointer_down(event),
            PointerKind::Move => self.pointer_move(event),
            PointerKind::Up => self.pointer_up(event),
            PointerKind::DoubleClick => self.double_click(),
        };
        if outcome.is_transition() {
            self.finish();
        }
        outcome
    }

    /// Handle a context menu entry; the menu always closes
    pub fn handle_menu(&mut self, action: MenuAction) -> Outcome {
        self.host.close_context_menu();
        match action {
            MenuAction::LoadImage => {
                self.host.pick_image_file();
                Outcome::ImageRequested
            }
            MenuAction::ClearImage => {
                self.clear_image();
                Outcome::ImageCleared
            }
            MenuAction::ResetPoints => {
                self.drag = None;
                self.reset_layout();
                self.finish();
                Outcome::Reset
            }
            MenuAction::MarkDefault => {
                log::info!(
                    "Current layout marked as default: {}",
                    self.coordinates()
                );
                Outcome::Observed
            }
        }
    }

    fn pointer_down(&mut self, event: PointerEvent) -> Outcome {
        let at = viewport::to_logical(&self.host, event.position);
        let radius = marker_radius(self.dims, self.config.render.min_marker_radius);

        // Grabbing an existing point wins over adding one
        if let Some(index) = hit_test(self.points.first_four(), at, radius) {
            self.points.select(index);
            self.drag = Some(DragState {
                index,
                button: event.button,
            });
            log::debug!("Drag started on point {}", index);
            return Outcome::Selected(index);
        }

        if event.modifiers.shift {
            let point = at.clamped(self.dims);
            if self.points.add(point) {
                let index = self.points.len() - 1;
                log::debug!("Added point {} at ({}, {})", index, point.x, point.y);
                return Outcome::Added(index);
            }
            log::debug!("Point set is full, ignoring add");
            return Outcome::Rejected;
        }

        if event.button == PointerButton::Secondary {
            self.host.open_context_menu(event.client);
            return Outcome::MenuOpened;
        }

        Outcome::Ignored
    }

    fn pointer_move(&mut self, event: PointerEvent) -> Outcome {
        let Some(index) = self.drag.map(|drag| drag.index) else {
            return Outcome::Ignored;
        };
        let at = viewport::to_logical(&self.host, event.position);
        match self.points.move_point(index, at, self.dims) {
            Some(_) => Outcome::Moved(index),
            None => {
                log::warn!("Dragged point {} no longer exists", index);
                self.drag = None;
                Outcome::Ignored
            }
        }
    }

    fn pointer_up(&mut self, event: PointerEvent) -> Outcome {
        let Some(drag) = self.drag.take() else {
            return Outcome::Ignored;
        };
        let delete = drag.deletes_on_release() || event.button == PointerButton::Secondary;
        if delete && self.points.remove(drag.index) {
            log::debug!("Removed point {}", drag.index);
            return Outcome::Removed(drag.index);
        }
        self.points.clear_selection();
        Outcome::Released(drag.index)
    }

    fn double_click(&mut self) -> Outcome {
        self.drag = None;
        self.points.clear_selection();
        if self.config.double_click_resets {
            self.reset_layout();
            Outcome::Reset
        } else {
            Outcome::Observed
        }
    }
}
