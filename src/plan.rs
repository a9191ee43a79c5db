use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::util::time;

/// Pixels per meter used when no real-world reference is known.
pub const DEFAULT_PIXELS_PER_METER: f32 = 50.0;
/// Thickness of a freshly drawn wall, in centimeters.
pub const DEFAULT_WALL_THICKNESS: f32 = 20.0;
/// Height of a freshly drawn wall, in centimeters.
pub const DEFAULT_WALL_HEIGHT: f32 = 240.0;

/// A position on the drawing surface, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl From<egui::Pos2> for Point {
    fn from(pos: egui::Pos2) -> Self {
        Self::new(pos.x, pos.y)
    }
}

impl From<Point> for egui::Pos2 {
    fn from(point: Point) -> Self {
        egui::pos2(point.x, point.y)
    }
}

/// A vertex of the plan graph. `wall_ids` lists the walls ending here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corner {
    pub id: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub wall_ids: Vec<String>,
}

impl Corner {
    pub fn new(id: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            x: position.x,
            y: position.y,
            wall_ids: Vec::new(),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallType {
    #[default]
    Interior,
    Exterior,
}

fn default_wall_thickness() -> f32 {
    DEFAULT_WALL_THICKNESS
}

fn default_wall_height() -> f32 {
    DEFAULT_WALL_HEIGHT
}

/// An edge between two distinct corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wall {
    pub id: String,
    pub start_corner_id: String,
    pub end_corner_id: String,
    /// Centimeters
    #[serde(default = "default_wall_thickness")]
    pub thickness: f32,
    /// Centimeters
    #[serde(default = "default_wall_height")]
    pub height: f32,
    #[serde(default, rename = "type")]
    pub wall_type: WallType,
}

impl Wall {
    pub fn new(
        id: impl Into<String>,
        start_corner_id: impl Into<String>,
        end_corner_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start_corner_id: start_corner_id.into(),
            end_corner_id: end_corner_id.into(),
            thickness: DEFAULT_WALL_THICKNESS,
            height: DEFAULT_WALL_HEIGHT,
            wall_type: WallType::Interior,
        }
    }

    pub fn with_dimensions(mut self, thickness: f32, height: f32) -> Self {
        self.thickness = thickness;
        self.height = height;
        self
    }

    pub fn touches(&self, corner_id: &str) -> bool {
        self.start_corner_id == corner_id || self.end_corner_id == corner_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    Door,
    Window,
    #[default]
    Opening,
}

/// A door or window cut into a wall. Only produced by import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opening {
    pub id: String,
    pub wall_id: String,
    #[serde(default, rename = "type")]
    pub kind: OpeningKind,
    /// Surface pixels along the wall, measured from its start corner
    #[serde(default)]
    pub distance_from_start: f32,
    /// Centimeters
    #[serde(default)]
    pub width: f32,
    /// Centimeters
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// A labelled area. Only produced by import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub room_type: String,
    #[serde(default)]
    pub label_position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "ft")]
    Feet,
    #[serde(rename = "cm")]
    Centimeters,
}

impl Unit {
    pub fn meters_per_unit(self) -> f32 {
        match self {
            Unit::Meters => 1.0,
            Unit::Feet => 0.3048,
            Unit::Centimeters => 0.01,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Meters => "m",
            Unit::Feet => "ft",
            Unit::Centimeters => "cm",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Conversion between surface pixels and real-world length, for the whole plan.
///
/// `pixels_per_unit` is expressed per `unit`, so a length in pixels divided by
/// it is a length in that unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scale {
    pub pixels_per_unit: f32,
    pub unit: Unit,
}

impl Scale {
    pub fn new(pixels_per_unit: f32, unit: Unit) -> Self {
        Self { pixels_per_unit, unit }
    }

    /// The default ratio of [`DEFAULT_PIXELS_PER_METER`], expressed in `unit`.
    pub fn fallback(unit: Unit) -> Self {
        Self::new(DEFAULT_PIXELS_PER_METER * unit.meters_per_unit(), unit)
    }

    pub fn pixels_per_meter(&self) -> f32 {
        self.pixels_per_unit / self.unit.meters_per_unit()
    }

    pub fn to_units(&self, pixels: f32) -> f32 {
        pixels / self.pixels_per_unit
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::fallback(Unit::Meters)
    }
}

/// The whole editable plan. Edits produce a new value; see [`crate::command::Command`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPlan {
    pub id: String,
    pub name: String,
    /// Seconds since the UNIX epoch
    pub created_at: u64,
    /// Seconds since the UNIX epoch
    pub updated_at: u64,
    pub scale: Scale,
    pub corners: HashMap<String, Corner>,
    pub walls: HashMap<String, Wall>,
    pub openings: HashMap<String, Opening>,
    pub rooms: HashMap<String, Room>,
}

impl FloorPlan {
    pub fn new(id: impl Into<String>, name: impl Into<String>, scale: Scale) -> Self {
        let now = time::timestamp_secs();
        Self {
            id: id.into(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            scale,
            corners: HashMap::new(),
            walls: HashMap::new(),
            openings: HashMap::new(),
            rooms: HashMap::new(),
        }
    }

    /// The plan shown at startup: a 300x300 px square room at 50 px/m.
    pub fn default_template() -> Self {
        let mut plan = Self::new("1", "New Floorplan", Scale::fallback(Unit::Meters));

        let corners = [
            ("c1", 100.0, 100.0, ["w1", "w4"]),
            ("c2", 400.0, 100.0, ["w1", "w2"]),
            ("c3", 400.0, 400.0, ["w2", "w3"]),
            ("c4", 100.0, 400.0, ["w3", "w4"]),
        ];
        for (id, x, y, walls) in corners {
            let mut corner = Corner::new(id, Point::new(x, y));
            corner.wall_ids = walls.iter().map(|w| (*w).to_owned()).collect();
            plan.corners.insert(id.to_owned(), corner);
        }

        let walls = [("w1", "c1", "c2"), ("w2", "c2", "c3"), ("w3", "c3", "c4"), ("w4", "c4", "c1")];
        for (id, start, end) in walls {
            let wall = Wall::new(id, start, end).with_dimensions(10.0, DEFAULT_WALL_HEIGHT);
            plan.walls.insert(id.to_owned(), wall);
        }

        plan
    }

    pub fn corner(&self, id: &str) -> Option<&Corner> {
        self.corners.get(id)
    }

    pub fn wall(&self, id: &str) -> Option<&Wall> {
        self.walls.get(id)
    }

    /// Both endpoints of a wall, or `None` if either is missing.
    pub fn wall_endpoints(&self, wall: &Wall) -> Option<(&Corner, &Corner)> {
        let start = self.corners.get(&wall.start_corner_id)?;
        let end = self.corners.get(&wall.end_corner_id)?;
        Some((start, end))
    }

    pub fn wall_length_px(&self, wall_id: &str) -> Option<f32> {
        let wall = self.walls.get(wall_id)?;
        let (start, end) = self.wall_endpoints(wall)?;
        Some(start.position().distance(end.position()))
    }

    /// Wall length in the plan's unit.
    pub fn wall_length(&self, wall_id: &str) -> Option<f32> {
        self.wall_length_px(wall_id).map(|px| self.scale.to_units(px))
    }

    /// Label text for a length in surface pixels, e.g. `6.00 m`.
    pub fn format_length(&self, pixels: f32) -> String {
        format!("{:.2} {}", self.scale.to_units(pixels), self.scale.unit)
    }

    /// Rendered stroke width of a wall in surface pixels.
    pub fn wall_stroke_width(&self, wall: &Wall) -> f32 {
        ((wall.thickness / 100.0) * self.scale.pixels_per_meter()).max(2.0)
    }

    /// Where an opening sits along its wall, as a segment in surface pixels.
    ///
    /// The span starts `distance_from_start` pixels from the wall's start corner
    /// and is clipped to the wall. `None` if the wall or its corners are gone.
    pub fn opening_span(&self, opening: &Opening) -> Option<(Point, Point)> {
        let wall = self.walls.get(&opening.wall_id)?;
        let (start, end) = self.wall_endpoints(wall)?;
        let (a, b) = (start.position(), end.position());
        let length = a.distance(b);
        if length <= f32::EPSILON {
            return None;
        }

        let width_px = opening.width / 100.0 * self.scale.pixels_per_meter();
        let from = opening.distance_from_start.clamp(0.0, length);
        let to = (from + width_px).clamp(0.0, length);
        let along = |d: f32| Point::new(a.x + (b.x - a.x) * d / length, a.y + (b.y - a.y) * d / length);
        Some((along(from), along(to)))
    }

    pub fn touch(&mut self) {
        self.updated_at = time::timestamp_secs();
    }

    /// Checks the corner/wall back-reference invariants.
    pub fn is_consistent(&self) -> bool {
        let corners_ok = self.corners.values().all(|corner| {
            corner.wall_ids.iter().all(|wall_id| {
                self.walls
                    .get(wall_id)
                    .is_some_and(|wall| wall.touches(&corner.id))
            })
        });
        let walls_ok = self.walls.values().all(|wall| {
            wall.start_corner_id != wall.end_corner_id && self.wall_endpoints(wall).is_some()
        });
        corners_ok && walls_ok
    }
}

impl Default for FloorPlan {
    fn default() -> Self {
        Self::default_template()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_wall_length() {
        let plan = FloorPlan::default_template();
        let length = plan.wall_length("w1").unwrap();
        assert!((length - 6.0).abs() < 0.001);
        assert_eq!(plan.format_length(300.0), "6.00 m");
    }

    #[test]
    fn test_default_template_is_consistent() {
        let plan = FloorPlan::default_template();
        assert_eq!(plan.corners.len(), 4);
        assert_eq!(plan.walls.len(), 4);
        assert!(plan.is_consistent());
    }

    #[test]
    fn test_missing_endpoint_has_no_length() {
        let mut plan = FloorPlan::default_template();
        plan.corners.remove("c2");
        assert!(plan.wall_length_px("w1").is_none());
        assert!(!plan.is_consistent());
    }

    #[test]
    fn test_fallback_scale_per_unit() {
        assert_eq!(Scale::fallback(Unit::Meters).pixels_per_unit, 50.0);
        let feet = Scale::fallback(Unit::Feet);
        assert!((feet.pixels_per_unit - 15.24).abs() < 0.001);
        assert!((feet.pixels_per_meter() - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_wall_stroke_width_has_minimum() {
        let plan = FloorPlan::default_template();
        let wall = plan.wall("w1").unwrap().clone();
        assert!((plan.wall_stroke_width(&wall) - 5.0).abs() < 0.001);
        let thin = wall.with_dimensions(1.0, DEFAULT_WALL_HEIGHT);
        assert_eq!(plan.wall_stroke_width(&thin), 2.0);
    }

    #[test]
    fn test_opening_span_is_clipped_to_wall() {
        let mut plan = FloorPlan::default_template();
        let opening: Opening = serde_json::from_str(
            r#"{"id":"o1","wallId":"w1","type":"door","distanceFromStart":280,"width":90}"#,
        )
        .unwrap();
        plan.openings.insert("o1".into(), opening.clone());

        let (from, to) = plan.opening_span(&opening).unwrap();
        assert_eq!(from, Point::new(380.0, 100.0));
        assert_eq!(to, Point::new(400.0, 100.0));

        plan.walls.remove("w1");
        assert!(plan.opening_span(&opening).is_none());
    }

    #[test]
    fn test_reply_shape_deserializes_with_defaults() {
        let json = r#"{"id":"w9","startCornerId":"a","endCornerId":"b"}"#;
        let wall: Wall = serde_json::from_str(json).unwrap();
        assert_eq!(wall.thickness, DEFAULT_WALL_THICKNESS);
        assert_eq!(wall.height, DEFAULT_WALL_HEIGHT);
        assert_eq!(wall.wall_type, WallType::Interior);

        let json = r#"{"id":"o1","wallId":"w9","type":"door","distanceFromStart":12,"width":90,"height":210}"#;
        let opening: Opening = serde_json::from_str(json).unwrap();
        assert_eq!(opening.kind, OpeningKind::Door);
        assert!(opening.properties.is_empty());
    }
}
