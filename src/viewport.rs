use egui::{Pos2, Vec2};

use crate::config::EditorConfig;
use crate::plan::Point;

/// Pan and zoom of the drawing surface.
///
/// Screen positions are local to the canvas rect: `screen = plan * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset: Vec2,
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Viewport {
    pub fn screen_to_plan(&self, local: Pos2) -> Point {
        Point::new(
            (local.x - self.offset.x) / self.scale,
            (local.y - self.offset.y) / self.scale,
        )
    }

    pub fn plan_to_screen(&self, point: Point) -> Pos2 {
        egui::pos2(
            point.x * self.scale + self.offset.x,
            point.y * self.scale + self.offset.y,
        )
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Multiply the scale by `factor`, clamped to the configured range, keeping
    /// the plan point under `anchor` in place.
    pub fn zoom_around(&mut self, anchor: Pos2, factor: f32, config: &EditorConfig) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let pinned = self.screen_to_plan(anchor);
        self.scale = config.clamp_zoom(self.scale * factor);
        self.offset = Vec2::new(
            anchor.x - pinned.x * self.scale,
            anchor.y - pinned.y * self.scale,
        );
    }

    /// One wheel step. Scrolling down (negative egui delta) zooms out.
    pub fn wheel(&mut self, anchor: Pos2, scroll_y: f32, config: &EditorConfig) {
        if scroll_y == 0.0 {
            return;
        }
        let factor = if scroll_y < 0.0 {
            1.0 / config.wheel_zoom_step
        } else {
            config.wheel_zoom_step
        };
        self.zoom_around(anchor, factor, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_with_pan_and_zoom() {
        let viewport = Viewport { offset: Vec2::new(30.0, -10.0), scale: 2.0 };
        let plan = viewport.screen_to_plan(egui::pos2(130.0, 190.0));
        assert_eq!(plan, Point::new(50.0, 100.0));
        assert_eq!(viewport.plan_to_screen(plan), egui::pos2(130.0, 190.0));
    }

    #[test]
    fn test_wheel_keeps_point_under_cursor() {
        let config = EditorConfig::default();
        let mut viewport = Viewport::default();
        let anchor = egui::pos2(200.0, 150.0);
        let before = viewport.screen_to_plan(anchor);

        viewport.wheel(anchor, 1.0, &config);
        assert!((viewport.scale - 1.1).abs() < 0.001);
        let after = viewport.screen_to_plan(anchor);
        assert!((after.x - before.x).abs() < 0.001);
        assert!((after.y - before.y).abs() < 0.001);

        viewport.wheel(anchor, -1.0, &config);
        assert!((viewport.scale - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_zoom_is_bounded() {
        let config = EditorConfig::default();
        let mut viewport = Viewport::default();
        viewport.zoom_around(Pos2::ZERO, 100.0, &config);
        assert_eq!(viewport.scale, 5.0);
        viewport.zoom_around(Pos2::ZERO, 0.001, &config);
        assert_eq!(viewport.scale, 0.5);
    }
}
