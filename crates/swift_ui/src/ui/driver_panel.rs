use std::time::Instant;

use eframe::egui::{self, RichText};

use swift_core::rides::format_fare;
use swift_core::simulation::TripPhase;

use crate::app::SwiftRideApp;
use crate::ui::utils::format_distance_km;

pub fn render_driver_panel(ui: &mut egui::Ui, app: &mut SwiftRideApp, now: Instant) {
    ui.heading("Driver Dashboard");
    ui.label("Manage your availability and track your earnings");
    ui.add_space(8.0);

    let online = app.dashboard.is_online();
    ui.horizontal(|ui| {
        ui.label(if online { "You're online" } else { "You're offline" });
        if ui
            .button(if online { "Go offline" } else { "Go online" })
            .clicked()
        {
            app.toggle_online(now);
        }
    });

    if let Some(offer) = app.dashboard.offer() {
        ui.separator();
        ui.label(RichText::new("New ride request").strong());
        let left = app.dashboard.offer_seconds_left(now).unwrap_or(0);
        let fraction = app.dashboard.offer_fraction_left(now).unwrap_or(0.0);
        ui.add(egui::ProgressBar::new(fraction).text(format!("{left}s")));
        ui.label(format!("Pickup: {}", offer.pickup));
        ui.label(format!("Drop-off: {}", offer.dropoff));
        ui.label(format!(
            "{}  ·  {}",
            format_distance_km(offer.distance_km),
            format_fare(offer.fare)
        ));
        ui.horizontal(|ui| {
            if ui.button("Decline").clicked() {
                app.decline_offer(now);
            }
            if ui.button("Accept Ride").clicked() {
                app.accept_offer(now);
            }
        });
    }

    if let Some(trip) = app.dashboard.active_trip() {
        ui.separator();
        ui.label(RichText::new("Active trip").strong());
        ui.label(format!("{} → {}", trip.pickup, trip.dropoff));
        ui.label(format!("Status: {}", app.simulator.phase().label()));
        let can_complete = app.simulator.phase() == TripPhase::Completed;
        if ui
            .add_enabled(can_complete, egui::Button::new("Complete Trip"))
            .clicked()
        {
            app.complete_trip(now);
        }
    }

    ui.separator();
    let earnings = app.dashboard.earnings();
    ui.label(RichText::new("Today's earnings").strong());
    ui.label(RichText::new(format_fare(earnings.today)).size(22.0));
    ui.horizontal(|ui| {
        ui.label(format!("{} rides", earnings.rides));
        ui.label(format!("{} online", earnings.online_label()));
    });
    ui.horizontal(|ui| {
        ui.label(format!("Rating {:.2}", earnings.rating));
        ui.label(format!("Acceptance {}%", earnings.acceptance_pct));
    });
}
