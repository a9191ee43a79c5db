use crate::command::Command;
use crate::config::EditorConfig;
use crate::geometry::HitTarget;
use crate::plan::{FloorPlan, Point};

/// Everything a tool may read while deciding on an edit.
pub struct ToolContext<'a> {
    pub plan: &'a FloorPlan,
    pub config: &'a EditorConfig,
    /// Current view scale; on-screen distances are divided by it
    pub zoom: f32,
}

impl ToolContext<'_> {
    /// Snap distance in surface units, constant on screen.
    pub fn snap_radius(&self) -> f32 {
        self.config.snap_radius / self.zoom
    }
}

/// An edit produced by a tool, ready to be applied and recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub command: Command,
    /// Fold into the current history entry instead of adding a new one
    pub amends_previous: bool,
}

impl Edit {
    pub fn new(command: Command) -> Self {
        Self { command, amends_previous: false }
    }

    pub fn amending(command: Command) -> Self {
        Self { command, amends_previous: true }
    }
}

/// How the canvas should treat a drag that just started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAction {
    /// The tool owns the drag and will emit edits for it
    Edit,
    /// Move the view instead
    Pan,
    Ignore,
}

/// Tool trait defines the interface for all editing modes
pub trait Tool {
    fn name(&self) -> &'static str;

    /// Called when the tool becomes active.
    fn activate(&mut self) {}

    /// Called when another tool takes over. Transient state must be dropped.
    fn deactivate(&mut self);

    /// A click or tap that did not turn into a drag.
    fn on_click(&mut self, pos: Point, target: &HitTarget, ctx: &ToolContext<'_>) -> Option<Edit>;

    fn on_drag_start(&mut self, _pos: Point, _target: &HitTarget, _ctx: &ToolContext<'_>) -> DragAction {
        DragAction::Ignore
    }

    /// Pointer moved while a drag owned by this tool is in progress.
    fn on_drag(&mut self, _pos: Point, _ctx: &ToolContext<'_>) -> Option<Edit> {
        None
    }

    fn on_drag_end(&mut self) {}

    /// Pointer moved without a button held.
    fn on_hover(&mut self, _pos: Point) {}

    /// Hint shown on the canvas while the tool is active.
    fn instructions(&self) -> Option<&'static str> {
        None
    }
}

mod delete_tool;
mod draw_wall_tool;
mod select_tool;

pub use delete_tool::DeleteTool;
pub use draw_wall_tool::DrawWallTool;
pub use select_tool::SelectTool;

/// The editing modes offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum EditorMode {
    #[default]
    Select,
    Draw,
    Delete,
}

impl EditorMode {
    pub const ALL: [EditorMode; 3] = [EditorMode::Select, EditorMode::Draw, EditorMode::Delete];

    pub fn label(self) -> &'static str {
        match self {
            EditorMode::Select => "Select",
            EditorMode::Draw => "Draw Wall",
            EditorMode::Delete => "Delete",
        }
    }

    pub fn new_tool(self) -> ToolType {
        match self {
            EditorMode::Select => ToolType::Select(SelectTool::new()),
            EditorMode::Draw => ToolType::DrawWall(DrawWallTool::new()),
            EditorMode::Delete => ToolType::Delete(DeleteTool),
        }
    }
}

/// The active tool together with whatever transient state only it carries.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolType {
    Select(SelectTool),
    DrawWall(DrawWallTool),
    Delete(DeleteTool),
}

impl Default for ToolType {
    fn default() -> Self {
        EditorMode::Select.new_tool()
    }
}

impl ToolType {
    pub fn mode(&self) -> EditorMode {
        match self {
            Self::Select(_) => EditorMode::Select,
            Self::DrawWall(_) => EditorMode::Draw,
            Self::Delete(_) => EditorMode::Delete,
        }
    }

    pub fn as_draw_wall_tool(&self) -> Option<&DrawWallTool> {
        match self {
            Self::DrawWall(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn as_select_tool(&self) -> Option<&SelectTool> {
        match self {
            Self::Select(tool) => Some(tool),
            _ => None,
        }
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        match self {
            Self::Select(tool) => tool.name(),
            Self::DrawWall(tool) => tool.name(),
            Self::Delete(tool) => tool.name(),
        }
    }

    fn activate(&mut self) {
        match self {
            Self::Select(tool) => tool.activate(),
            Self::DrawWall(tool) => tool.activate(),
            Self::Delete(tool) => tool.activate(),
        }
    }

    fn deactivate(&mut self) {
        match self {
            Self::Select(tool) => tool.deactivate(),
            Self::DrawWall(tool) => tool.deactivate(),
            Self::Delete(tool) => tool.deactivate(),
        }
    }

    fn on_click(&mut self, pos: Point, target: &HitTarget, ctx: &ToolContext<'_>) -> Option<Edit> {
        match self {
            Self::Select(tool) => tool.on_click(pos, target, ctx),
            Self::DrawWall(tool) => tool.on_click(pos, target, ctx),
            Self::Delete(tool) => tool.on_click(pos, target, ctx),
        }
    }

    fn on_drag_start(&mut self, pos: Point, target: &HitTarget, ctx: &ToolContext<'_>) -> DragAction {
        match self {
            Self::Select(tool) => tool.on_drag_start(pos, target, ctx),
            Self::DrawWall(tool) => tool.on_drag_start(pos, target, ctx),
            Self::Delete(tool) => tool.on_drag_start(pos, target, ctx),
        }
    }

    fn on_drag(&mut self, pos: Point, ctx: &ToolContext<'_>) -> Option<Edit> {
        match self {
            Self::Select(tool) => tool.on_drag(pos, ctx),
            Self::DrawWall(tool) => tool.on_drag(pos, ctx),
            Self::Delete(tool) => tool.on_drag(pos, ctx),
        }
    }

    fn on_drag_end(&mut self) {
        match self {
            Self::Select(tool) => tool.on_drag_end(),
            Self::DrawWall(tool) => tool.on_drag_end(),
            Self::Delete(tool) => tool.on_drag_end(),
        }
    }

    fn on_hover(&mut self, pos: Point) {
        match self {
            Self::Select(tool) => tool.on_hover(pos),
            Self::DrawWall(tool) => tool.on_hover(pos),
            Self::Delete(tool) => tool.on_hover(pos),
        }
    }

    fn instructions(&self) -> Option<&'static str> {
        match self {
            Self::Select(tool) => tool.instructions(),
            Self::DrawWall(tool) => tool.instructions(),
            Self::Delete(tool) => tool.instructions(),
        }
    }
}
