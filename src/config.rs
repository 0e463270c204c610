//! Configuration persistence for screen-mapper settings

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::{CanvasDimensions, DEFAULT_INSET};

/// Bounds and encoding settings for stored background images
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Largest stored image width in pixels
    pub max_width: u32,
    /// Largest stored image height in pixels
    pub max_height: u32,
    /// JPEG quality for the persisted payload (1-100)
    pub jpeg_quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_width: 1024,
            max_height: 768,
            jpeg_quality: 80,
        }
    }
}

/// Overlay drawing settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Lower bound for the marker radius; the radius otherwise grows with ln(min side)
    pub min_marker_radius: f32,
    /// Radius of the center dot drawn inside every marker
    pub center_dot_radius: f32,
    /// Stroke width of the connecting quadrilateral
    pub outline_width: f32,
    /// Stroke width of marker rings
    pub marker_stroke_width: f32,
    /// Label font size in pixels
    pub label_font_size: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            min_marker_radius: 8.0,
            center_dot_radius: 3.0,
            outline_width: 2.0,
            marker_stroke_width: 4.0,
            label_font_size: 14.0,
        }
    }
}

/// Editor configuration, loaded once per session and injected into it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Canvas width used when the host provides no width
    #[serde(default = "default_canvas_width")]
    pub default_width: u32,
    /// Canvas height used when the host provides no height
    #[serde(default = "default_canvas_height")]
    pub default_height: u32,
    /// Inset fraction of the default corner layout
    #[serde(default = "default_corner_inset")]
    pub corner_inset: f32,
    /// Width above which the node is widened and the overlay redrawn
    #[serde(default = "default_width_threshold")]
    pub width_threshold: u32,
    /// Node width used until the canvas is wide enough to drive it
    #[serde(default = "default_initial_node_width")]
    pub initial_node_width: u32,
    /// Horizontal padding added around the canvas when sizing the node
    #[serde(default = "default_node_padding_x")]
    pub node_padding_x: u32,
    /// Vertical padding added around the canvas when sizing the node
    #[serde(default = "default_node_padding_y")]
    pub node_padding_y: u32,
    /// Whether a double click resets the points to the default layout
    #[serde(default = "default_double_click_resets")]
    pub double_click_resets: bool,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

fn default_canvas_width() -> u32 {
    512
}

fn default_canvas_height() -> u32 {
    512
}

fn default_corner_inset() -> f32 {
    DEFAULT_INSET
}

fn default_width_threshold() -> u32 {
    256
}

fn default_initial_node_width() -> u32 {
    600
}

fn default_node_padding_x() -> u32 {
    45
}

fn default_node_padding_y() -> u32 {
    250
}

fn default_double_click_resets() -> bool {
    true
}

impl MapperConfig {
    /// Directory name under the user config dir
    pub const ID: &'static str = "screen-mapper";

    /// Default config file location
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Canvas size used before any image or control sets one
    pub fn default_dimensions(&self) -> CanvasDimensions {
        CanvasDimensions::new(self.default_width.max(1), self.default_height.max(1))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("Could not determine config directory for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    /// Save configuration to an explicit file, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            default_width: default_canvas_width(),
            default_height: default_canvas_height(),
            corner_inset: default_corner_inset(),
            width_threshold: default_width_threshold(),
            initial_node_width: default_initial_node_width(),
            node_padding_x: default_node_padding_x(),
            node_padding_y: default_node_padding_y(),
            double_click_resets: default_double_click_resets(),
            image: ImageConfig::default(),
            render: RenderConfig::default(),
        }
    }
}
