//! Four-point quadrilateral calibration editor
//!
//! A [`Session`] owns the canvas size, the point set and the background
//! image of one editor instance. The embedding node editor implements
//! [`host::Host`] and forwards pointer, menu, file and widget events.

pub mod background;
pub mod config;
pub mod contract;
pub mod domain;
pub mod host;
pub mod render;
pub mod session;
pub mod store;
pub mod viewport;

pub use config::MapperConfig;
pub use session::{MenuAction, Outcome, Session};
