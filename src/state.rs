use crate::tools::{EditorMode, Tool, ToolType};

/// Which editing mode is active, plus that mode's transient state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    active_tool: ToolType,
}

impl EditorState {
    pub fn mode(&self) -> EditorMode {
        self.active_tool.mode()
    }

    /// Switch modes. Re-selecting the active mode keeps its state.
    pub fn set_mode(&mut self, mode: EditorMode) {
        if self.mode() == mode {
            return;
        }

        // First deactivate the current tool
        self.active_tool.deactivate();

        let mut new_tool = mode.new_tool();
        new_tool.activate();
        log::info!("Mode changed: {} -> {}", self.active_tool.name(), new_tool.name());
        self.active_tool = new_tool;
    }

    /// Escape always lands in select mode with no drawing in progress.
    pub fn escape(&mut self) {
        self.set_mode(EditorMode::Select);
        self.active_tool.deactivate();
    }

    pub fn active_tool(&self) -> &ToolType {
        &self.active_tool
    }

    pub fn active_tool_mut(&mut self) -> &mut ToolType {
        &mut self.active_tool
    }
}
