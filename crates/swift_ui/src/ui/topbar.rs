use std::time::Instant;

use eframe::egui;

use swift_core::map_sync::MapViewState;

use crate::app::{Mode, SwiftRideApp};
use crate::ui::rendering::render_map_legend;

pub fn render_top_bar(ui: &mut egui::Ui, app: &mut SwiftRideApp, now: Instant) {
    ui.horizontal(|ui| {
        ui.heading("SwiftRide");
        ui.separator();
        let mut mode = app.mode;
        ui.selectable_value(&mut mode, Mode::Rider, "Book a ride");
        ui.selectable_value(&mut mode, Mode::Driver, "Drive");
        app.set_mode(mode);

        ui.separator();
        match app.map.view().state() {
            MapViewState::Ready => {
                ui.label("Map connected");
                if ui.button("Disconnect").clicked() {
                    app.disconnect_token(now);
                }
            }
            MapViewState::ConnectPrompt => {
                ui.label("Map not connected");
            }
        }
        if app.map.inflight() > 0 {
            ui.spinner();
        }
    });
    render_map_legend(ui);
}
