//! Editor and import settings with environment overrides.
//!
//! Recognised variables:
//! - `FLOORPLAN_GEMINI_API_KEY` (falls back to `GEMINI_API_KEY`)
//! - `FLOORPLAN_GEMINI_MODEL`: default `gemini-2.5-flash`
//! - `FLOORPLAN_GEMINI_BASE_URL`: default Generative Language v1beta endpoint
//! - `FLOORPLAN_REQUEST_TIMEOUT_SECS`: default 120
//! - `FLOORPLAN_CONNECT_TIMEOUT_SECS`: default 10
//! - `FLOORPLAN_EXPORT_DIR`: where PNG/PDF exports are written; the user's
//!   download directory when unset (native only, read by
//!   [`ExportConfig::from_env`](crate::export::ExportConfig::from_env))

use crate::plan::{DEFAULT_WALL_HEIGHT, DEFAULT_WALL_THICKNESS};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Interaction constants for the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// On-screen snap distance; divided by the zoom factor before use
    pub snap_radius: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Zoom multiplier per wheel notch
    pub wheel_zoom_step: f32,
    /// Centimeters
    pub wall_thickness: f32,
    /// Centimeters
    pub wall_height: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_radius: 20.0,
            min_zoom: 0.5,
            max_zoom: 5.0,
            wheel_zoom_step: 1.1,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            wall_height: DEFAULT_WALL_HEIGHT,
        }
    }
}

impl EditorConfig {
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

/// Settings for the remote floor plan recognition call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_owned(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_owned(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ImportConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key/value source; unset or unparsable values
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = non_empty("FLOORPLAN_GEMINI_API_KEY").or_else(|| non_empty("GEMINI_API_KEY"));
        let model = non_empty("FLOORPLAN_GEMINI_MODEL").unwrap_or(defaults.model);
        let base_url = non_empty("FLOORPLAN_GEMINI_BASE_URL")
            .unwrap_or(defaults.base_url)
            .trim_end_matches('/')
            .to_owned();

        Self {
            api_key,
            model,
            base_url,
            request_timeout_secs: parse_u64(&lookup, "FLOORPLAN_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            connect_timeout_secs: parse_u64(&lookup, "FLOORPLAN_CONNECT_TIMEOUT_SECS", defaults.connect_timeout_secs),
        }
    }
}

pub(crate) fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    lookup(key)
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
