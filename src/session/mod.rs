//! Editor session module
//!
//! This module contains:
//! - Session state and the operations the host drives (state.rs)
//! - Pointer and context menu handlers (controller.rs)
//! - Message types for menu actions and event outcomes (messages.rs)

pub mod controller;
pub mod messages;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use messages::{MenuAction, Outcome};
pub use state::Session;
