//! Message types for an editor session
//!
//! This module contains:
//! - MenuAction for the context menu entries
//! - Outcome describing what a handled event did

/// Context menu entries, each mapped to one session operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Ask the host for an image file
    LoadImage,
    /// Drop the background image, keep the points
    ClearImage,
    /// Restore the default corner layout
    ResetPoints,
    /// Observation point only; logs the current layout
    MarkDefault,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::LoadImage,
        MenuAction::ClearImage,
        MenuAction::ResetPoints,
        MenuAction::MarkDefault,
    ];

    /// Menu entry text
    pub fn title(self) -> &'static str {
        match self {
            MenuAction::LoadImage => "Load image",
            MenuAction::ClearImage => "Clear image",
            MenuAction::ResetPoints => "Reset points",
            MenuAction::MarkDefault => "Set as default points",
        }
    }
}

/// What an input event did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A point was appended at this index
    Added(usize),
    /// A drag started on this point
    Selected(usize),
    /// The dragged point moved
    Moved(usize),
    /// A drag ended and the point stayed
    Released(usize),
    /// A drag ended by deleting this point
    Removed(usize),
    /// Points went back to the default layout
    Reset,
    /// The context menu was opened
    MenuOpened,
    /// The host was asked for an image file
    ImageRequested,
    /// The background image was dropped
    ImageCleared,
    /// A menu action with no effect on state
    Observed,
    /// The gesture was valid but blocked by a point-count limit
    Rejected,
    /// Not a gesture this editor reacts to
    Ignored,
}

impl Outcome {
    /// Whether the event changed the session in a way the user should see
    pub fn is_transition(self) -> bool {
        !matches!(self, Outcome::Ignored)
    }
}
