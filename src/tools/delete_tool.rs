use super::{Edit, Tool, ToolContext};
use crate::command::Command;
use crate::geometry::HitTarget;
use crate::plan::Point;

/// Removes whatever corner or wall is clicked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteTool;

impl Tool for DeleteTool {
    fn name(&self) -> &'static str {
        "Delete"
    }

    fn deactivate(&mut self) {}

    fn on_click(&mut self, _pos: Point, target: &HitTarget, _ctx: &ToolContext<'_>) -> Option<Edit> {
        match target {
            HitTarget::Corner(id) => Some(Edit::new(Command::DeleteCorner { corner_id: id.clone() })),
            HitTarget::Wall(id) => Some(Edit::new(Command::DeleteWall { wall_id: id.clone() })),
            HitTarget::Empty => None,
        }
    }
}
