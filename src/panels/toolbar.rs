use crate::FloorplanApp;
use crate::components::ModeButton;
use crate::export::ExportFormat;
use crate::tools::EditorMode;

pub fn toolbar(app: &mut FloorplanApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("toolbar")
        .resizable(false)
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let active_mode = app.mode();
                for mode in EditorMode::ALL {
                    if ModeButton::new(mode, mode == active_mode).show(ui).clicked() {
                        log::info!("Mode selected from UI: {}", mode.label());
                        app.set_mode(mode);
                    }
                }
                ui.label(active_mode.label());

                ui.separator();

                let can_undo = app.history().can_undo();
                let can_redo = app.history().can_redo();
                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.redo();
                }

                ui.separator();

                if ui.button("Save Image").clicked() {
                    app.export(ExportFormat::Png);
                }
                if ui.button("Save PDF").clicked() {
                    app.export(ExportFormat::Pdf);
                }
                if ui.button("Share").clicked() {
                    app.share();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let plan = app.plan();
                    ui.label(format!(
                        "{} · {} corners · {} walls · {:.0}%",
                        plan.name,
                        plan.corners.len(),
                        plan.walls.len(),
                        app.viewport().scale * 100.0
                    ));
                });
            });
            ui.add_space(4.0);
        });
}
