use eframe::egui::{self, RichText};

use crate::app::SwiftRideApp;
use crate::ui::utils::severity_color;

pub fn render_notices(ui: &mut egui::Ui, app: &SwiftRideApp) {
    for active in app.notices.iter().rev() {
        let color = severity_color(active.notice.severity);
        ui.horizontal(|ui| {
            ui.colored_label(color, RichText::new(active.notice.title.as_str()).strong());
            ui.label(active.notice.description.as_str());
        });
    }
}
