use std::time::Instant;

use eframe::egui::{self, RichText};

use swift_core::booking::{BookingStage, ESTIMATED_TRIP_LABEL};
use swift_core::lookup::AddressLookup;
use swift_core::rides::{format_fare, RIDE_TYPES};
use swift_core::simulation::TripPhase;

use crate::app::SwiftRideApp;
use crate::ui::utils::{format_eta, lookup_hint};

pub fn render_booking_panel(ui: &mut egui::Ui, app: &mut SwiftRideApp, now: Instant) {
    ui.heading("Book Your Ride");
    ui.label("Enter your locations and choose your ride type");
    ui.add_space(8.0);

    let editable = app.booking.can_confirm();

    ui.label("Pickup");
    ui.horizontal(|ui| {
        let response = ui.add_enabled(
            editable,
            egui::TextEdit::singleline(&mut app.pickup_input).hint_text("Enter pickup location"),
        );
        if response.changed() {
            app.edit_pickup(now);
        }
        if ui
            .add_enabled(editable, egui::Button::new("Use my location"))
            .clicked()
        {
            app.use_current_location();
        }
    });
    lookup_line(ui, &app.pickup_lookup);

    ui.label("Drop-off");
    let response = ui.add_enabled(
        editable,
        egui::TextEdit::singleline(&mut app.dropoff_input).hint_text("Enter drop-off location"),
    );
    if response.changed() {
        app.edit_dropoff(now);
    }
    lookup_line(ui, &app.dropoff_lookup);

    ui.separator();
    ui.label(RichText::new("Ride type").strong());
    let selected = app.booking.ride_type().id;
    let base_fare = app.booking.base_fare();
    ui.add_enabled_ui(editable, |ui| {
        for ride in &RIDE_TYPES {
            let text = format!(
                "{:<8} {:>8}  {}  ({})",
                ride.name,
                format_fare(ride.fare(base_fare)),
                ride.eta_label,
                ride.description
            );
            if ui
                .selectable_label(selected == ride.id, RichText::new(text).monospace())
                .clicked()
            {
                app.booking.select_ride_type(ride.id);
            }
        }
    });

    if app.booking.show_route() {
        ui.separator();
        ui.horizontal(|ui| {
            ui.label(format!("Trip time {ESTIMATED_TRIP_LABEL}"));
            ui.label(format!(
                "Route ETA {}",
                format_eta(app.map.view().sync().eta_minutes())
            ));
            ui.label(format!("Fare {}", format_fare(app.booking.fare())));
        });
    }

    ui.add_space(8.0);
    let label = match app.booking.stage() {
        BookingStage::Editing => "Confirm Booking",
        BookingStage::Searching { .. } => "Finding Driver...",
        BookingStage::DriverFound => "Driver On The Way!",
    };
    if ui
        .add_enabled(editable, egui::Button::new(label).min_size(egui::vec2(220.0, 32.0)))
        .clicked()
    {
        app.confirm_booking(now);
    }
    if app.booking.is_searching() {
        ui.spinner();
    }

    if app.booking.driver_found() {
        ui.label(format!("Driver status: {}", app.simulator.phase().label()));
        let finished = app.simulator.phase() == TripPhase::Completed;
        if ui
            .button(if finished { "Book another ride" } else { "Cancel ride" })
            .clicked()
        {
            app.booking.reset();
        }
    }

    ui.add_space(12.0);
    ui.small("Your safety is our priority. All drivers are verified and trips are monitored.");
}

fn lookup_line(ui: &mut egui::Ui, lookup: &AddressLookup) {
    if let Some((text, color)) = lookup_hint(lookup.status()) {
        ui.colored_label(color, text);
    }
}
