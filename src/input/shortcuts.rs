use egui::{Event, Key, Modifiers};

/// Keyboard commands understood by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
    /// Leave the current mode for select mode
    Escape,
}

/// Ctrl/Cmd+Z undoes; Ctrl/Cmd+Y and Ctrl/Cmd+Shift+Z redo.
pub fn shortcut_for(key: Key, modifiers: Modifiers) -> Option<Shortcut> {
    match key {
        Key::Escape => Some(Shortcut::Escape),
        Key::Z if modifiers.command && modifiers.shift => Some(Shortcut::Redo),
        Key::Z if modifiers.command => Some(Shortcut::Undo),
        Key::Y if modifiers.command => Some(Shortcut::Redo),
        _ => None,
    }
}

/// Shortcuts pressed this frame. Nothing is reported while a text field has focus.
pub fn collect_shortcuts(ctx: &egui::Context) -> Vec<Shortcut> {
    if ctx.wants_keyboard_input() {
        return Vec::new();
    }
    ctx.input(|input| {
        input
            .events
            .iter()
            .filter_map(|event| match event {
                Event::Key { key, pressed: true, modifiers, .. } => shortcut_for(*key, *modifiers),
                _ => None,
            })
            .collect()
    })
}
