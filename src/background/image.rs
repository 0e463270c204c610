//! Background image decoding and bounded re-encoding
//!
//! Decoding is a pure function of its input so the host may run it off the
//! interaction thread and hand the result back with its load ticket.

use anyhow::Context;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::config::ImageConfig;
use crate::domain::CanvasDimensions;

/// Name given to images that arrive without a file name
pub const REFERENCE_IMAGE_NAME: &str = "reference_image";

/// Persisted description of the background image
///
/// `base64_payload` never carries a `data:` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub name: String,
    /// Milliseconds since the epoch, as reported for the source file
    pub last_modified: u64,
    /// Size of the original source in bytes
    pub size: u64,
    pub mime_type: String,
    pub base64_payload: String,
}

/// Where an image load comes from
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// Raw file picked, pasted or dropped by the user
    File {
        name: String,
        last_modified: u64,
        mime_type: String,
        bytes: Vec<u8>,
    },
    /// Base64 data from a stored payload or the backend
    Base64 { mime_type: String, payload: String },
}

impl ImageSource {
    /// Source for a previously persisted payload
    pub fn from_payload(payload: &ImagePayload) -> Self {
        ImageSource::Base64 {
            mime_type: payload.mime_type.clone(),
            payload: payload.base64_payload.clone(),
        }
    }
}

/// Decoded background image together with its persisted form
#[derive(Clone, Debug)]
pub struct BackgroundImage {
    pub rgba: RgbaImage,
    pub payload: ImagePayload,
}

impl BackgroundImage {
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    /// Canvas size this image defines
    pub fn dimensions(&self) -> CanvasDimensions {
        CanvasDimensions::new(self.width(), self.height())
    }
}

/// Whether a dropped or pasted file is something we can load
pub fn accepts_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// Strip an optional `data:<mime>;base64,` prefix
pub fn strip_data_url(payload: &str) -> &str {
    let payload = payload.trim();
    if payload.starts_with("data:")
        && let Some((_, data)) = payload.split_once(',')
    {
        return data;
    }
    payload
}

/// Largest size within `max_width x max_height` that keeps the aspect ratio
///
/// Images already inside the bound are returned unchanged.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || (width <= max_width && height <= max_height) {
        return (width, height);
    }
    let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_width.max(1));
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_height.max(1));
    (w, h)
}

fn encode_jpeg_base64(img: &DynamicImage, quality: u8) -> anyhow::Result<String> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)))
        .context("encoding JPEG payload")?;
    Ok(STANDARD.encode(&buf))
}

/// Decode a source and produce the bounded image plus its payload
///
/// Files are always re-encoded as JPEG. Base64 sources that already fit
/// the bound keep their payload untouched so restoring a session does not
/// degrade the image.
pub fn decode(source: &ImageSource, config: &ImageConfig) -> anyhow::Result<BackgroundImage> {
    // `kept` holds a stored payload we may reuse verbatim
    let (bytes, name, last_modified, mime_type, kept) = match source {
        ImageSource::File {
            name,
            last_modified,
            mime_type,
            bytes,
        } => (
            bytes.clone(),
            name.clone(),
            *last_modified,
            mime_type.clone(),
            None,
        ),
        ImageSource::Base64 { mime_type, payload } => {
            let data = strip_data_url(payload);
            let bytes = STANDARD
                .decode(data)
                .context("invalid base64 image payload")?;
            (
                bytes,
                REFERENCE_IMAGE_NAME.to_string(),
                0,
                mime_type.clone(),
                Some(data.to_string()),
            )
        }
    };

    let decoded = image::load_from_memory(&bytes).context("decoding image")?;
    let (src_w, src_h) = (decoded.width(), decoded.height());
    if src_w == 0 || src_h == 0 {
        anyhow::bail!("image has no pixels");
    }

    let (w, h) = fit_within(src_w, src_h, config.max_width, config.max_height);
    let resized = (w, h) != (src_w, src_h);
    let bounded = if resized {
        log::debug!("Downscaling background {}x{} -> {}x{}", src_w, src_h, w, h);
        decoded.resize_exact(w, h, FilterType::Triangle)
    } else {
        decoded
    };

    let (mime_type, base64_payload) = match kept {
        Some(data) if !resized => (mime_type, data),
        _ => (
            "image/jpeg".to_string(),
            encode_jpeg_base64(&bounded, config.jpeg_quality)?,
        ),
    };

    log::debug!(
        "Background image decoded: {}x{} ({})",
        bounded.width(),
        bounded.height(),
        mime_type
    );

    Ok(BackgroundImage {
        rgba: bounded.to_rgba8(),
        payload: ImagePayload {
            name,
            last_modified,
            size: bytes.len() as u64,
            mime_type,
            base64_payload,
        },
    })
}
