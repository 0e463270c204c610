//! Background image loading and ownership
//!
//! This module contains:
//! - Decoding, downscaling and payload encoding (image.rs)
//! - The manager that owns the current image and resolves racing loads (manager.rs)

pub mod image;
pub mod manager;

pub use image::{
    BackgroundImage, ImagePayload, ImageSource, REFERENCE_IMAGE_NAME, accepts_mime, decode,
};
pub use manager::{BackgroundImageManager, LoadOutcome, LoadTicket};

/// The session's view of the background image
pub type ImageReference = BackgroundImage;
