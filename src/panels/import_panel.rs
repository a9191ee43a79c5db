use crate::FloorplanApp;
use crate::plan::Unit;

pub fn import_panel(app: &mut FloorplanApp, ctx: &egui::Context) {
    egui::Window::new("New Project")
        .default_pos(egui::pos2(20.0, 20.0))
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            let busy = app.is_importing() || app.file_handler_mut().is_picking();

            ui.label("API Key:");
            let key_changed = ui
                .add(
                    egui::TextEdit::singleline(&mut app.import_form_mut().api_key)
                        .password(true)
                        .hint_text("Enter Gemini API Key"),
                )
                .changed();
            if key_changed {
                app.clear_import_error();
            }

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Total Width:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.import_form_mut().width)
                            .hint_text("e.g. 10")
                            .desired_width(120.0),
                    );
                });
                ui.vertical(|ui| {
                    ui.label("Unit:");
                    let unit = &mut app.import_form_mut().unit;
                    egui::ComboBox::from_id_salt("import_unit")
                        .selected_text(unit.symbol())
                        .width(60.0)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(unit, Unit::Meters, Unit::Meters.symbol());
                            ui.selectable_value(unit, Unit::Feet, Unit::Feet.symbol());
                        });
                });
            });

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let label = if busy { "Processing..." } else { "Upload Photo" };
                let clicked = ui.add_enabled(!busy, egui::Button::new(label)).clicked();
                if busy {
                    ui.spinner();
                }

                if clicked {
                    app.file_handler_mut().request_image(ctx);
                }
            });
            ui.small("or drop a photo onto the window");

            if let Some(error) = app.import_error() {
                ui.colored_label(egui::Color32::RED, error);
            }
        });
}
