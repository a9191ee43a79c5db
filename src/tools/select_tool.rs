use super::{DragAction, Edit, Tool, ToolContext};
use crate::command::Command;
use crate::geometry::HitTarget;
use crate::plan::Point;

/// Drags corners around; dragging anywhere else pans the view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectTool {
    dragging: Option<String>,
    /// Whether the current drag already produced a history entry
    moved: bool,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragged_corner(&self) -> Option<&str> {
        self.dragging.as_deref()
    }
}

impl Tool for SelectTool {
    fn name(&self) -> &'static str {
        "Select"
    }

    fn deactivate(&mut self) {
        self.dragging = None;
        self.moved = false;
    }

    fn on_click(&mut self, _pos: Point, _target: &HitTarget, _ctx: &ToolContext<'_>) -> Option<Edit> {
        None
    }

    fn on_drag_start(&mut self, _pos: Point, target: &HitTarget, _ctx: &ToolContext<'_>) -> DragAction {
        self.moved = false;
        match target {
            HitTarget::Corner(id) => {
                self.dragging = Some(id.clone());
                DragAction::Edit
            }
            HitTarget::Wall(_) | HitTarget::Empty => {
                self.dragging = None;
                DragAction::Pan
            }
        }
    }

    fn on_drag(&mut self, pos: Point, ctx: &ToolContext<'_>) -> Option<Edit> {
        let corner_id = self.dragging.clone()?;
        if !ctx.plan.corners.contains_key(&corner_id) {
            self.dragging = None;
            return None;
        }

        let command = Command::MoveCorner { corner_id, to: pos };
        // One drag gesture is one undo step.
        let edit = if self.moved { Edit::amending(command) } else { Edit::new(command) };
        self.moved = true;
        Some(edit)
    }

    fn on_drag_end(&mut self) {
        if let Some(corner_id) = self.dragging.take() {
            log::debug!("Finished dragging corner {corner_id}");
        }
        self.moved = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::plan::FloorPlan;

    #[test]
    fn test_corner_drag_amends_after_first_frame() {
        let plan = FloorPlan::default_template();
        let config = EditorConfig::default();
        let ctx = ToolContext { plan: &plan, config: &config, zoom: 1.0 };
        let mut tool = SelectTool::new();

        let action = tool.on_drag_start(Point::new(100.0, 100.0), &HitTarget::Corner("c1".into()), &ctx);
        assert_eq!(action, DragAction::Edit);

        let first = tool.on_drag(Point::new(110.0, 100.0), &ctx).unwrap();
        let second = tool.on_drag(Point::new(120.0, 100.0), &ctx).unwrap();
        assert!(!first.amends_previous);
        assert!(second.amends_previous);

        tool.on_drag_end();
        assert!(tool.dragged_corner().is_none());
        assert!(tool.on_drag(Point::new(130.0, 100.0), &ctx).is_none());
    }

    #[test]
    fn test_drag_on_empty_space_pans() {
        let plan = FloorPlan::default_template();
        let config = EditorConfig::default();
        let ctx = ToolContext { plan: &plan, config: &config, zoom: 1.0 };
        let mut tool = SelectTool::new();
        assert_eq!(tool.on_drag_start(Point::new(250.0, 250.0), &HitTarget::Empty, &ctx), DragAction::Pan);
        assert!(tool.on_drag(Point::new(260.0, 250.0), &ctx).is_none());
    }
}
