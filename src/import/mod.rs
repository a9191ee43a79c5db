//! Turning a photo of a floor plan into an editable [`FloorPlan`].
//!
//! The photo is sent to a multimodal model which answers with the plan's
//! geometry as JSON. Everything around that call (validation, scale, plan
//! assembly) is local and synchronous; [`ImportJob`] runs the whole import in
//! the background for the UI.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::config::ImportConfig;
use crate::id_generator::generate_id;
use crate::plan::{Corner, FloorPlan, Opening, Room, Scale, Unit, Wall};

mod gemini;
mod job;

pub use gemini::{GeminiClient, PROMPT};
pub use job::ImportJob;

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Please enter a Gemini API Key first.")]
    MissingApiKey,

    #[error("Total width must be a positive number.")]
    InvalidWidth,

    #[error("Could not read image: {0}")]
    Image(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClientBuild(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Model service returned {status}: {body}")]
    Response { status: u16, body: String },

    #[error("The model returned no text.")]
    EmptyReply,

    #[error("Failed to parse floor plan data.")]
    Parse,

    #[error("Failed to start import runtime: {0}")]
    Runtime(String),

    #[error("Import was interrupted.")]
    WorkerStopped,
}

/// Everything needed to import one photo.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub image: Vec<u8>,
    pub file_name: String,
    /// Real-world width of the whole image, in `unit`
    pub real_width: Option<f32>,
    pub unit: Unit,
    pub api_key: String,
}

/// What the importer needs to know about the photo itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
}

impl ImageInfo {
    pub fn read(bytes: &[u8]) -> ImportResult<Self> {
        let format = image::guess_format(bytes).map_err(|e| ImportError::Image(e.to_string()))?;
        let (width, height) = image::ImageReader::with_format(Cursor::new(bytes), format)
            .into_dimensions()
            .map_err(|e| ImportError::Image(e.to_string()))?;
        Ok(Self {
            width,
            height,
            mime_type: format.to_mime_type().to_owned(),
        })
    }
}

/// Geometry maps as returned by the model.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlanGeometry {
    pub corners: HashMap<String, Corner>,
    pub walls: HashMap<String, Wall>,
    pub openings: HashMap<String, Opening>,
    pub rooms: HashMap<String, Room>,
}

/// Parse the optional width field of the import form. Blank means unknown.
pub fn parse_width(input: &str) -> ImportResult<Option<f32>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f32>() {
        Ok(width) if width.is_finite() && width > 0.0 => Ok(Some(width)),
        _ => Err(ImportError::InvalidWidth),
    }
}

/// Image pixels per `unit`, or the fallback ratio when the width is unknown.
pub fn compute_scale(image_width: u32, real_width: Option<f32>, unit: Unit) -> Scale {
    match real_width {
        Some(width) if width > 0.0 && image_width > 0 => Scale::new(image_width as f32 / width, unit),
        _ => Scale::fallback(unit),
    }
}

/// Remove markdown code fences the model sometimes wraps around JSON.
pub fn strip_markdown_fences(reply: &str) -> String {
    reply.replace("```json", "").replace("```", "").trim().to_owned()
}

pub fn parse_plan_reply(reply: &str) -> ImportResult<PlanGeometry> {
    let json = strip_markdown_fences(reply);
    serde_json::from_str(&json).map_err(|e| {
        log::error!("Failed to parse model reply ({e}): {reply}");
        ImportError::Parse
    })
}

/// Assemble a plan from model geometry, dropping references that do not
/// resolve and rebuilding each corner's wall list from the walls.
pub fn build_plan(geometry: PlanGeometry, file_name: &str, scale: Scale) -> FloorPlan {
    let PlanGeometry {
        mut corners,
        mut walls,
        mut openings,
        rooms,
    } = geometry;

    walls.retain(|id, wall| {
        let valid = wall.start_corner_id != wall.end_corner_id
            && corners.contains_key(&wall.start_corner_id)
            && corners.contains_key(&wall.end_corner_id);
        if !valid {
            log::warn!("Dropping imported wall {id} with unresolved corners");
        }
        valid
    });
    openings.retain(|id, opening| {
        let valid = walls.contains_key(&opening.wall_id);
        if !valid {
            log::warn!("Dropping imported opening {id} on missing wall {}", opening.wall_id);
        }
        valid
    });

    for corner in corners.values_mut() {
        corner.wall_ids.clear();
    }
    let mut wall_ids: Vec<&String> = walls.keys().collect();
    wall_ids.sort();
    for wall_id in wall_ids {
        let wall = &walls[wall_id];
        for corner_id in [&wall.start_corner_id, &wall.end_corner_id] {
            if let Some(corner) = corners.get_mut(corner_id) {
                corner.wall_ids.push(wall_id.clone());
            }
        }
    }

    let mut plan = FloorPlan::new(generate_id(), plan_name(file_name), scale);
    plan.corners = corners;
    plan.walls = walls;
    plan.openings = openings;
    plan.rooms = rooms;
    plan
}

/// File name without its extension.
fn plan_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(file_name)
        .to_owned()
}

/// Run one import end to end.
pub async fn run_import(request: ImportRequest, config: &ImportConfig) -> ImportResult<FloorPlan> {
    if request.api_key.trim().is_empty() {
        return Err(ImportError::MissingApiKey);
    }

    let info = ImageInfo::read(&request.image)?;
    log::info!(
        "Importing {} ({}x{}, {})",
        request.file_name,
        info.width,
        info.height,
        info.mime_type
    );

    let client = GeminiClient::new(request.api_key.trim(), config)?;
    let reply = client.generate(PROMPT, &info.mime_type, &request.image).await?;
    let geometry = parse_plan_reply(&reply)?;
    let scale = compute_scale(info.width, request.real_width, request.unit);
    let plan = build_plan(geometry, &request.file_name, scale);

    log::info!(
        "Imported plan {} with {} corners and {} walls",
        plan.name,
        plan.corners.len(),
        plan.walls.len()
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"```json
{
  "corners": {
    "a": { "id": "a", "x": 0, "y": 0, "wallIds": ["w1"] },
    "b": { "id": "b", "x": 200, "y": 0 }
  },
  "walls": {
    "w1": { "id": "w1", "startCornerId": "a", "endCornerId": "b", "thickness": 25, "height": 250, "type": "exterior" },
    "w2": { "id": "w2", "startCornerId": "a", "endCornerId": "ghost" }
  },
  "openings": {
    "d1": { "id": "d1", "wallId": "w1", "type": "door", "distanceFromStart": 40, "width": 90, "height": 210 },
    "d2": { "id": "d2", "wallId": "w2", "type": "window", "distanceFromStart": 10, "width": 60, "height": 100 }
  },
  "rooms": {
    "r1": { "id": "r1", "name": "Living", "type": "living", "labelPosition": { "x": 100, "y": 50 } }
  }
}
```"#;

    #[test]
    fn test_scale_without_width_uses_fallback() {
        let scale = compute_scale(1000, None, Unit::Meters);
        assert_eq!(scale.pixels_per_meter(), 50.0);
        let scale = compute_scale(1000, None, Unit::Feet);
        assert!((scale.pixels_per_meter() - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_scale_from_real_width() {
        let scale = compute_scale(1000, Some(10.0), Unit::Meters);
        assert_eq!(scale.pixels_per_unit, 100.0);

        let scale = compute_scale(1000, Some(10.0), Unit::Feet);
        assert_eq!(scale.unit, Unit::Feet);
        assert!((scale.pixels_per_meter() - 1000.0 / 3.048).abs() < 0.01);
        assert!((scale.to_units(100.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_width() {
        assert_eq!(parse_width("").unwrap(), None);
        assert_eq!(parse_width("  12.5 ").unwrap(), Some(12.5));
        assert!(matches!(parse_width("-3"), Err(ImportError::InvalidWidth)));
        assert!(matches!(parse_width("wide"), Err(ImportError::InvalidWidth)));
    }

    #[test]
    fn test_strip_markdown_fences() {
        assert_eq!(strip_markdown_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_markdown_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_unparsable_reply() {
        let err = parse_plan_reply("I could not find a floor plan in this image.").unwrap_err();
        assert!(matches!(err, ImportError::Parse));
        assert_eq!(err.to_string(), "Failed to parse floor plan data.");
    }

    #[test]
    fn test_build_plan_drops_dangling_references() {
        let geometry = parse_plan_reply(REPLY).unwrap();
        let plan = build_plan(geometry, "apartment.final.jpg", Scale::default());

        assert_eq!(plan.name, "apartment.final");
        assert_eq!(plan.walls.len(), 1);
        assert_eq!(plan.openings.len(), 1);
        assert!(plan.openings.contains_key("d1"));
        assert_eq!(plan.rooms["r1"].name, "Living");
        assert_eq!(plan.corners["a"].wall_ids, vec!["w1".to_owned()]);
        assert_eq!(plan.corners["b"].wall_ids, vec!["w1".to_owned()]);
        assert_eq!(plan.walls["w1"].thickness, 25.0);
        assert!(plan.is_consistent());
        assert_ne!(plan.id, "1");
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let geometry = parse_plan_reply("{\"corners\": {}}").unwrap();
        assert!(geometry.walls.is_empty());
        assert!(geometry.rooms.is_empty());
    }

    #[test]
    fn test_image_info_reads_png_header() {
        let image = image::RgbaImage::new(64, 32);
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let info = ImageInfo::read(&bytes).unwrap();
        assert_eq!((info.width, info.height), (64, 32));
        assert_eq!(info.mime_type, "image/png");
        assert!(matches!(ImageInfo::read(b"not an image"), Err(ImportError::Image(_))));
    }

    #[test]
    fn test_missing_api_key_fails_before_reading_image() {
        let request = ImportRequest {
            image: Vec::new(),
            file_name: "plan.png".into(),
            real_width: None,
            unit: Unit::Meters,
            api_key: "  ".into(),
        };
        let result = futures::executor::block_on(run_import(request, &ImportConfig::default()));
        assert!(matches!(result, Err(ImportError::MissingApiKey)));
    }
}
