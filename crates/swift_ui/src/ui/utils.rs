//! Utility functions for the UI: formatting and colors.

use eframe::egui::Color32;

use swift_core::lookup::LookupStatus;
use swift_core::map_sync::MarkerRole;
use swift_core::notice::Severity;

pub fn format_distance_km(distance_km: f64) -> String {
    format!("{distance_km:.1} km")
}

pub fn format_eta(eta_minutes: Option<u32>) -> String {
    match eta_minutes {
        Some(minutes) => format!("{minutes} min"),
        None => "--".to_string(),
    }
}

/// Short hint shown under an address field.
pub fn lookup_hint(status: &LookupStatus) -> Option<(String, Color32)> {
    let hint = match status {
        LookupStatus::Idle => return None,
        LookupStatus::Waiting | LookupStatus::Searching => {
            ("Searching...".to_string(), Color32::GRAY)
        }
        LookupStatus::Found(place) => (place.place_name.clone(), color_ok()),
        LookupStatus::NotFound => ("No matching place".to_string(), color_warn()),
        LookupStatus::InvalidInput(_) => ("Type at least 3 characters".to_string(), Color32::GRAY),
        LookupStatus::Unavailable => ("Connect the map to search".to_string(), color_warn()),
        LookupStatus::Failed(message) => (format!("Lookup failed: {message}"), color_error()),
        LookupStatus::Rejected => ("Map token rejected".to_string(), color_error()),
    };
    Some(hint)
}

pub fn severity_color(severity: Severity) -> Color32 {
    match severity {
        Severity::Info => Color32::from_rgb(90, 160, 255),
        Severity::Success => color_ok(),
        Severity::Error => color_error(),
    }
}

pub fn marker_color(role: MarkerRole) -> Color32 {
    match role {
        MarkerRole::Driver => Color32::from_rgb(255, 200, 0),
        MarkerRole::Pickup => Color32::from_rgb(0, 200, 120),
        MarkerRole::Dropoff => Color32::from_rgb(230, 60, 60),
    }
}

pub fn route_color() -> Color32 {
    Color32::from_rgb(80, 140, 255)
}

fn color_ok() -> Color32 {
    Color32::from_rgb(0, 200, 120)
}

fn color_warn() -> Color32 {
    Color32::from_rgb(255, 170, 0)
}

fn color_error() -> Color32 {
    Color32::from_rgb(230, 60, 60)
}
