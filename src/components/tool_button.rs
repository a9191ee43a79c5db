use crate::tools::EditorMode;

/// Square toolbar button for one editing mode.
pub struct ModeButton {
    pub mode: EditorMode,
    pub selected: bool,
}

impl ModeButton {
    pub fn new(mode: EditorMode, selected: bool) -> Self {
        Self { mode, selected }
    }

    pub fn icon(mode: EditorMode) -> &'static str {
        match mode {
            EditorMode::Select => "👆",
            EditorMode::Draw => "✏",
            EditorMode::Delete => "🗑",
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(32.0, 32.0);
        let (rect, response) = ui.allocate_exact_size(button_size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                egui::Color32::from_rgb(0x00, 0x7b, 0xff)
            } else if response.hovered() {
                egui::Color32::from_gray(60)
            } else {
                egui::Color32::from_gray(40)
            };
            ui.painter().rect_filled(rect, 4.0, bg_color);

            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                Self::icon(self.mode),
                egui::FontId::proportional(20.0),
                egui::Color32::WHITE,
            );
        }

        response.on_hover_text(self.mode.label())
    }
}
