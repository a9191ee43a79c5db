use crate::FloorplanApp;
use crate::input::collect_canvas_events;

pub fn central_panel(app: &mut FloorplanApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let available_size = ui.available_size();
            let (response, painter) = ui.allocate_painter(available_size, egui::Sense::click_and_drag());
            let rect = response.rect;
            app.set_canvas_size(rect.size());

            for event in collect_canvas_events(&response) {
                app.handle_canvas_event(event);
            }

            app.render(&painter, rect);
        });
}
