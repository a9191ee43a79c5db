use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2};

use crate::geometry::hit_testing::{ACTIVE_CORNER_RADIUS, CORNER_RADIUS};
use crate::plan::{FloorPlan, OpeningKind, Point};
use crate::tools::{EditorMode, Tool, ToolType};
use crate::viewport::Viewport;

pub const BACKGROUND: Color32 = Color32::from_rgb(0x1a, 0x1a, 0x1a);
pub const WALL: Color32 = Color32::WHITE;
pub const DELETE_HIGHLIGHT: Color32 = Color32::from_rgb(0xff, 0x44, 0x44);
pub const LENGTH_LABEL: Color32 = Color32::from_rgb(0xaa, 0xaa, 0xaa);
pub const CORNER: Color32 = Color32::from_rgb(0x00, 0x7b, 0xff);
pub const ACTIVE: Color32 = Color32::from_rgb(0x00, 0xff, 0x00);
pub const DOOR: Color32 = Color32::from_rgb(0xc8, 0x8a, 0x3c);
pub const WINDOW: Color32 = Color32::from_rgb(0x5b, 0xc0, 0xeb);

/// Offset of a wall's length label from the wall midpoint, in surface pixels.
pub const LENGTH_LABEL_OFFSET: Vec2 = Vec2::new(-20.0, -10.0);

pub fn opening_color(kind: OpeningKind) -> Color32 {
    match kind {
        OpeningKind::Door => DOOR,
        OpeningKind::Window => WINDOW,
        OpeningKind::Opening => BACKGROUND,
    }
}

/// Draws a [`FloorPlan`] onto the canvas through egui's painter.
#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Paint one frame.
    ///
    /// Layers, bottom to top: walls with length labels, openings, room labels,
    /// the draw-mode preview line, corner handles, and the mode hint.
    pub fn render(
        &self,
        painter: &Painter,
        rect: Rect,
        plan: &FloorPlan,
        viewport: &Viewport,
        tool: &ToolType,
    ) {
        painter.rect_filled(rect, 0.0, BACKGROUND);

        let zoom = viewport.scale;
        let to_screen = |p: Point| -> Pos2 { rect.min + viewport.plan_to_screen(p).to_vec2() };
        let mode = tool.mode();
        let pending = tool.as_draw_wall_tool().and_then(|draw| draw.pending_start());

        let wall_color = if mode == EditorMode::Delete { DELETE_HIGHLIGHT } else { WALL };
        for wall in plan.walls.values() {
            let Some((start, end)) = plan.wall_endpoints(wall) else {
                continue;
            };
            let (a, b) = (to_screen(start.position()), to_screen(end.position()));
            let width = plan.wall_stroke_width(wall) * zoom;

            painter.line_segment([a, b], Stroke::new(width, wall_color));
            // Round caps and joins
            painter.circle_filled(a, width / 2.0, wall_color);
            painter.circle_filled(b, width / 2.0, wall_color);

            let length = start.position().distance(end.position());
            let mid = to_screen(start.position().midpoint(end.position()));
            painter.text(
                mid + LENGTH_LABEL_OFFSET * zoom,
                Align2::LEFT_TOP,
                plan.format_length(length),
                FontId::proportional(12.0 * zoom),
                LENGTH_LABEL,
            );
        }

        for opening in plan.openings.values() {
            let Some((from, to)) = plan.opening_span(opening) else {
                continue;
            };
            let width = plan
                .walls
                .get(&opening.wall_id)
                .map_or(2.0, |wall| plan.wall_stroke_width(wall))
                * zoom;
            painter.line_segment(
                [to_screen(from), to_screen(to)],
                Stroke::new(width, opening_color(opening.kind)),
            );
        }

        for room in plan.rooms.values() {
            painter.text(
                to_screen(room.label_position),
                Align2::CENTER_CENTER,
                &room.name,
                FontId::proportional(16.0 * zoom),
                Color32::WHITE,
            );
        }

        if let Some(draw) = tool.as_draw_wall_tool() {
            let start = draw.pending_start().and_then(|id| plan.corner(id));
            if let (Some(start), Some(preview)) = (start, draw.preview()) {
                painter.extend(Shape::dashed_line(
                    &[to_screen(start.position()), to_screen(preview)],
                    Stroke::new(2.0 * zoom, ACTIVE),
                    10.0 * zoom,
                    5.0 * zoom,
                ));
            }
        }

        for corner in plan.corners.values() {
            let is_pending = pending == Some(corner.id.as_str());
            let (radius, fill) = match mode {
                EditorMode::Delete => (CORNER_RADIUS, DELETE_HIGHLIGHT),
                EditorMode::Draw if is_pending => (ACTIVE_CORNER_RADIUS, ACTIVE),
                _ => (CORNER_RADIUS, CORNER),
            };
            painter.circle(
                to_screen(corner.position()),
                radius * zoom,
                fill,
                Stroke::new(2.0 * zoom, Color32::WHITE),
            );
        }

        if let Some(hint) = tool.instructions() {
            painter.text(
                rect.min + Vec2::new(30.0, 30.0),
                Align2::LEFT_TOP,
                hint,
                FontId::proportional(16.0),
                Color32::WHITE,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basics() {
        let ctx = egui::Context::default();
        let layer_id = egui::LayerId::background();
        let rect = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0));
        let plan = FloorPlan::default_template();
        let renderer = Renderer::new();

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = Painter::new(ctx.clone(), layer_id, rect);
            for mode in EditorMode::ALL {
                renderer.render(&painter, rect, &plan, &Viewport::default(), &mode.new_tool());
            }
        });
    }
}
