//! Map rendering: projection, grid, route polyline and markers.

use std::time::Instant;

use eframe::egui::{self, Align2, Color32, FontId, Stroke, Vec2};

use swift_core::geo::{Coordinate, GeoBounds};
use swift_core::map_sync::{Marker, MarkerRole, MarkerStyle, MapViewState};
use swift_core::simulation::TripPhase;

use crate::app::SwiftRideApp;
use crate::ui::utils::{format_eta, marker_color, route_color};

/// Project a coordinate into `rect`. Points outside the bounds land outside
/// the rect; the painter clips them.
pub fn project(point: Coordinate, bounds: &GeoBounds, rect: egui::Rect) -> Option<egui::Pos2> {
    if bounds.lat_max <= bounds.lat_min || bounds.lng_max <= bounds.lng_min {
        return None;
    }
    let x = (point.lng - bounds.lng_min) / (bounds.lng_max - bounds.lng_min);
    let y = (bounds.lat_max - point.lat) / (bounds.lat_max - bounds.lat_min);
    let px = rect.left() + rect.width() * x as f32;
    let py = rect.top() + rect.height() * y as f32;
    Some(egui::pos2(px, py))
}

/// Draw a grid every `spacing_km` kilometers.
pub fn draw_grid(painter: &egui::Painter, bounds: &GeoBounds, rect: egui::Rect, spacing_km: f64) {
    if spacing_km <= 0.0 || bounds.lat_span() <= 0.0 || bounds.lng_span() <= 0.0 {
        return;
    }

    let lat_mid = bounds.center().lat;
    let meters_per_deg_lat = 111_320.0;
    let meters_per_deg_lng = 111_320.0 * lat_mid.to_radians().cos().max(0.1);
    let spacing_m = spacing_km * 1000.0;
    let lat_step = spacing_m / meters_per_deg_lat;
    let lng_step = spacing_m / meters_per_deg_lng;

    let stroke = Stroke::new(1.0, Color32::from_gray(40));

    let mut lat = (bounds.lat_min / lat_step).ceil() * lat_step;
    while lat <= bounds.lat_max {
        let y = (bounds.lat_max - lat) / bounds.lat_span();
        let py = rect.top() + rect.height() * y as f32;
        painter.line_segment(
            [egui::pos2(rect.left(), py), egui::pos2(rect.right(), py)],
            stroke,
        );
        lat += lat_step;
    }

    let mut lng = (bounds.lng_min / lng_step).ceil() * lng_step;
    while lng <= bounds.lng_max {
        let x = (lng - bounds.lng_min) / bounds.lng_span();
        let px = rect.left() + rect.width() * x as f32;
        painter.line_segment(
            [egui::pos2(px, rect.top()), egui::pos2(px, rect.bottom())],
            stroke,
        );
        lng += lng_step;
    }
}

pub fn draw_route(painter: &egui::Painter, route: &[Coordinate], bounds: &GeoBounds, rect: egui::Rect) {
    let points: Vec<egui::Pos2> = route
        .iter()
        .filter_map(|point| project(*point, bounds, rect))
        .collect();
    let stroke = Stroke::new(4.0, route_color());
    for pair in points.windows(2) {
        painter.line_segment([pair[0], pair[1]], stroke);
    }
}

/// Draw one marker. `heading` points the driver arrow, in screen space.
pub fn draw_marker(painter: &egui::Painter, marker: &Marker, pos: egui::Pos2, heading: Option<Vec2>) {
    let color = marker_color(marker.role);
    let outline = Stroke::new(1.5, Color32::WHITE);
    match marker.style {
        MarkerStyle::PickupDot => {
            painter.circle_filled(pos, 7.0, color);
            painter.circle_stroke(pos, 7.0, outline);
        }
        MarkerStyle::DropoffPin => {
            let head = pos - Vec2::new(0.0, 16.0);
            painter.line_segment([pos, head], Stroke::new(2.0, color));
            painter.circle_filled(head, 7.0, color);
            painter.circle_stroke(head, 7.0, outline);
        }
        MarkerStyle::DriverArrow => {
            let dir = heading
                .filter(|v| v.length_sq() > f32::EPSILON)
                .map(|v| v.normalized())
                .unwrap_or(Vec2::new(0.0, -1.0));
            let side = Vec2::new(-dir.y, dir.x);
            let tip = pos + dir * 11.0;
            let left = pos - dir * 7.0 + side * 7.0;
            let right = pos - dir * 7.0 - side * 7.0;
            painter.add(egui::Shape::convex_polygon(
                vec![tip, left, right],
                color,
                outline,
            ));
        }
    }
    painter.text(
        pos + Vec2::new(10.0, 4.0),
        Align2::LEFT_TOP,
        marker.role.label(),
        FontId::proportional(11.0),
        Color32::from_gray(220),
    );
}

/// Render the map area, or the connect prompt when no token is configured.
pub fn render_map(ui: &mut egui::Ui, app: &mut SwiftRideApp, now: Instant) {
    if app.map.view().state() == MapViewState::ConnectPrompt {
        render_connect_prompt(ui, app, now);
        return;
    }

    let available = ui.available_size();
    let (rect, _) = ui.allocate_exact_size(available, egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, Color32::from_gray(18));

    let bounds = app.camera.padded_bounds(now, rect.width(), rect.height());
    draw_grid(&painter, &bounds, rect, 1.0);

    let sync = app.map.view().sync();
    draw_route(&painter, sync.route(), &bounds, rect);

    let heading = driver_heading(app, &bounds, rect);
    for marker in sync.markers().iter() {
        if let Some(pos) = project(marker.coordinate, &bounds, rect) {
            let heading = (marker.role == MarkerRole::Driver).then_some(heading).flatten();
            draw_marker(&painter, marker, pos, heading);
        }
    }

    painter.rect_stroke(
        rect,
        0.0,
        Stroke::new(1.0, Color32::from_gray(60)),
        egui::StrokeKind::Middle,
    );
    render_trip_overlay(&painter, app, rect);
}

fn driver_heading(app: &SwiftRideApp, bounds: &GeoBounds, rect: egui::Rect) -> Option<Vec2> {
    let driver = app.simulator.driver()?;
    let target = match app.simulator.phase() {
        TripPhase::ToPickup => app.map.view().sync().markers().get(MarkerRole::Pickup)?,
        TripPhase::ToDropoff => app.map.view().sync().markers().get(MarkerRole::Dropoff)?,
        TripPhase::Idle | TripPhase::Completed => return None,
    };
    let from = project(driver, bounds, rect)?;
    let to = project(target.coordinate, bounds, rect)?;
    Some(to - from)
}

fn render_trip_overlay(painter: &egui::Painter, app: &SwiftRideApp, rect: egui::Rect) {
    let sync = app.map.view().sync();
    let mut lines = vec![format!("ETA {}", format_eta(sync.eta_minutes()))];
    if app.simulator.phase() != TripPhase::Idle {
        lines.push(format!(
            "{} ({:.0}%)",
            app.simulator.phase().label(),
            app.simulator.progress() * 100.0
        ));
    }
    painter.text(
        rect.left_top() + Vec2::new(12.0, 12.0),
        Align2::LEFT_TOP,
        lines.join("\n"),
        FontId::monospace(12.0),
        Color32::from_gray(230),
    );
}

fn render_connect_prompt(ui: &mut egui::Ui, app: &mut SwiftRideApp, now: Instant) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.heading("Connect the map");
        ui.label("Paste a Mapbox public access token to show routes and search addresses.");
        ui.add_space(8.0);
        let response = ui.add(
            egui::TextEdit::singleline(&mut app.token_input)
                .hint_text("pk.eyJ...")
                .password(true)
                .desired_width(360.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Connect").clicked() || submitted {
            app.connect_token(now);
        }
    });
}

/// Render a legend item (color swatch + label).
fn legend_item(ui: &mut egui::Ui, color: Color32, label: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::new(14.0, 14.0), egui::Sense::hover());
        ui.painter().rect_filled(rect, 2.0, color);
        ui.label(label);
    });
}

pub fn render_map_legend(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        for role in MarkerRole::ALL {
            legend_item(ui, marker_color(role), role.label());
        }
        legend_item(ui, route_color(), "Route");
    });
}
