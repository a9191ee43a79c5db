use super::{Edit, Tool, ToolContext};
use crate::command::Command;
use crate::geometry::{HitTarget, find_snap_corner};
use crate::id_generator::generate_id;
use crate::plan::{Corner, Point, Wall};

/// Draws chains of walls: every click places or picks a corner and connects it
/// to the previous one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawWallTool {
    /// Corner the next wall starts from
    pending_start: Option<String>,
    /// Last hover position, for the rubber-band preview only
    preview: Option<Point>,
}

impl DrawWallTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_start(&self) -> Option<&str> {
        self.pending_start.as_deref()
    }

    pub fn preview(&self) -> Option<Point> {
        self.preview
    }

    /// Resolve the corner a click refers to, creating one if nothing is close.
    fn resolve_target(pos: Point, target: &HitTarget, ctx: &ToolContext<'_>) -> (String, Option<Corner>) {
        if let HitTarget::Corner(id) = target {
            return (id.clone(), None);
        }
        match find_snap_corner(ctx.plan, pos, ctx.snap_radius()) {
            Some(corner) => (corner.id.clone(), None),
            None => {
                let corner = Corner::new(generate_id(), pos);
                (corner.id.clone(), Some(corner))
            }
        }
    }
}

impl Tool for DrawWallTool {
    fn name(&self) -> &'static str {
        "Draw Wall"
    }

    fn activate(&mut self) {
        self.pending_start = None;
        self.preview = None;
    }

    fn deactivate(&mut self) {
        self.pending_start = None;
        self.preview = None;
    }

    fn on_click(&mut self, pos: Point, target: &HitTarget, ctx: &ToolContext<'_>) -> Option<Edit> {
        if let HitTarget::Wall(_) = target {
            return None;
        }

        let (target_id, new_corner) = Self::resolve_target(pos, target, ctx);

        // The chain may point at a corner that an undo or delete removed.
        let start = self
            .pending_start
            .take()
            .filter(|id| ctx.plan.corners.contains_key(id));

        match start {
            Some(start) if start == target_id => {
                self.pending_start = Some(start);
                None
            }
            Some(start) => {
                let wall = Wall::new(generate_id(), start, target_id.clone())
                    .with_dimensions(ctx.config.wall_thickness, ctx.config.wall_height);
                log::debug!("Adding wall {} ending at {}", wall.id, target_id);
                self.pending_start = Some(target_id);
                Some(Edit::new(Command::AddWall { wall, new_corner }))
            }
            None => {
                self.pending_start = Some(target_id);
                new_corner.map(|corner| Edit::new(Command::AddCorner(corner)))
            }
        }
    }

    fn on_hover(&mut self, pos: Point) {
        self.preview = Some(pos);
    }

    fn instructions(&self) -> Option<&'static str> {
        Some("Click to add corners. Press ESC to stop.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::plan::FloorPlan;

    fn click(tool: &mut DrawWallTool, plan: &FloorPlan, pos: Point) -> FloorPlan {
        let config = EditorConfig::default();
        let ctx = ToolContext { plan, config: &config, zoom: 1.0 };
        match tool.on_click(pos, &HitTarget::Empty, &ctx) {
            Some(edit) => edit.command.apply(plan),
            None => plan.clone(),
        }
    }

    #[test]
    fn test_first_click_only_places_corner() {
        let plan = FloorPlan::new("p", "empty", Default::default());
        let mut tool = DrawWallTool::new();
        let next = click(&mut tool, &plan, Point::new(10.0, 10.0));
        assert_eq!(next.corners.len(), 1);
        assert!(next.walls.is_empty());
        assert!(tool.pending_start().is_some());
    }

    #[test]
    fn test_clicking_pending_corner_again_adds_nothing() {
        let plan = FloorPlan::default_template();
        let mut tool = DrawWallTool::new();
        let plan = click(&mut tool, &plan, Point::new(100.0, 100.0));
        let next = click(&mut tool, &plan, Point::new(102.0, 101.0));
        assert_eq!(next.walls.len(), 4);
        assert_eq!(tool.pending_start(), Some("c1"));
    }

    #[test]
    fn test_snap_radius_scales_with_zoom() {
        let plan = FloorPlan::default_template();
        let config = EditorConfig::default();
        let ctx = ToolContext { plan: &plan, config: &config, zoom: 4.0 };
        assert!((ctx.snap_radius() - 5.0).abs() < 0.001);

        // 10px away is outside the zoomed snap radius, so a new corner appears.
        let mut tool = DrawWallTool::new();
        let edit = tool.on_click(Point::new(110.0, 100.0), &HitTarget::Empty, &ctx).unwrap();
        assert!(matches!(edit.command, Command::AddCorner(_)));
    }

    #[test]
    fn test_wall_click_is_ignored() {
        let plan = FloorPlan::default_template();
        let config = EditorConfig::default();
        let ctx = ToolContext { plan: &plan, config: &config, zoom: 1.0 };
        let mut tool = DrawWallTool::new();
        assert!(tool.on_click(Point::new(250.0, 100.0), &HitTarget::Wall("w1".into()), &ctx).is_none());
        assert!(tool.pending_start().is_none());
    }

    #[test]
    fn test_deactivate_clears_pending_state() {
        let plan = FloorPlan::default_template();
        let mut tool = DrawWallTool::new();
        click(&mut tool, &plan, Point::new(100.0, 100.0));
        tool.on_hover(Point::new(50.0, 50.0));
        tool.deactivate();
        assert!(tool.pending_start().is_none());
        assert!(tool.preview().is_none());
    }
}
