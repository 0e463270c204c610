//! Pointer input and gesture state types

use super::geometry::ScreenPoint;

/// Mouse button that produced a pointer event
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    #[default]
    Primary,
    /// Right button; acts as the "delete" modifier when releasing a drag
    Secondary,
}

/// Keyboard modifiers held during a pointer event
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
}

/// Phase of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    DoubleClick,
}

/// Raw pointer event delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Position in host device pixels, before zoom/pan correction
    pub position: ScreenPoint,
    /// Position in client (window) coordinates, used to place menus
    pub client: ScreenPoint,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            position: ScreenPoint::new(x, y),
            client: ScreenPoint::new(x, y),
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Down, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Up, x, y)
    }

    pub fn double_click(x: f32, y: f32) -> Self {
        Self::new(PointerKind::DoubleClick, x, y)
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn with_client(mut self, x: f32, y: f32) -> Self {
        self.client = ScreenPoint::new(x, y);
        self
    }
}

/// In-progress drag of an existing point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Index of the point being dragged
    pub index: usize,
    /// Button that started the gesture; Secondary deletes on release
    pub button: PointerButton,
}

impl DragState {
    /// Whether releasing this drag should remove the point
    pub fn deletes_on_release(&self) -> bool {
        self.button == PointerButton::Secondary
    }
}
