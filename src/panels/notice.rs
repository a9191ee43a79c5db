use crate::FloorplanApp;

/// Result of the last export or share, until dismissed.
pub fn notice_modal(app: &mut FloorplanApp, ctx: &egui::Context) {
    let Some(message) = app.notice().map(str::to_owned) else {
        return;
    };

    egui::Window::new("Export")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(message);
            if ui.button("Close").clicked() {
                app.dismiss_notice();
            }
        });
}
