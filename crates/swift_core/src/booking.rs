//! Rider booking flow: addresses, ride type, simulated driver search.

use std::time::{Duration, Instant};

use tracing::info;

use crate::notice::Notice;
use crate::rides::{RideType, RideTypeId, BASE_FARE};

pub const DRIVER_SEARCH_DURATION: Duration = Duration::from_secs(3);
pub const ASSIGNED_DRIVER: &str = "Alex K.";
pub const DRIVER_ARRIVAL_MINUTES: u32 = 3;
/// Trip length shown once both addresses are entered.
pub const ESTIMATED_TRIP_LABEL: &str = "~15 min";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStage {
    Editing,
    Searching { since: Instant },
    DriverFound,
}

#[derive(Debug, Clone)]
pub struct BookingFlow {
    pickup_text: String,
    dropoff_text: String,
    ride_type: RideTypeId,
    base_fare: f64,
    stage: BookingStage,
}

impl Default for BookingFlow {
    fn default() -> Self {
        Self {
            pickup_text: String::new(),
            dropoff_text: String::new(),
            ride_type: RideTypeId::default(),
            base_fare: BASE_FARE,
            stage: BookingStage::Editing,
        }
    }
}

impl BookingFlow {
    pub fn with_base_fare(mut self, base_fare: f64) -> Self {
        self.base_fare = base_fare;
        self
    }

    pub fn set_pickup_text(&mut self, text: &str) {
        self.pickup_text = text.to_string();
    }

    pub fn set_dropoff_text(&mut self, text: &str) {
        self.dropoff_text = text.to_string();
    }

    pub fn pickup_text(&self) -> &str {
        &self.pickup_text
    }

    pub fn dropoff_text(&self) -> &str {
        &self.dropoff_text
    }

    pub fn select_ride_type(&mut self, ride_type: RideTypeId) {
        self.ride_type = ride_type;
    }

    pub fn ride_type(&self) -> &'static RideType {
        self.ride_type.ride_type()
    }

    pub fn fare(&self) -> f64 {
        self.ride_type().fare(self.base_fare)
    }

    pub fn base_fare(&self) -> f64 {
        self.base_fare
    }

    /// The route is shown as soon as both fields hold text.
    pub fn show_route(&self) -> bool {
        !self.pickup_text.is_empty() && !self.dropoff_text.is_empty()
    }

    pub fn stage(&self) -> BookingStage {
        self.stage
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.stage, BookingStage::Searching { .. })
    }

    pub fn driver_found(&self) -> bool {
        self.stage == BookingStage::DriverFound
    }

    /// Confirm is only offered while editing.
    pub fn can_confirm(&self) -> bool {
        self.stage == BookingStage::Editing
    }

    /// Start the driver search. Returns a notice when the booking cannot
    /// proceed.
    pub fn confirm(&mut self, now: Instant) -> Option<Notice> {
        if !self.can_confirm() {
            return None;
        }
        if self.pickup_text.is_empty() || self.dropoff_text.is_empty() {
            return Some(Notice::error(
                "Missing Information",
                "Please enter both pickup and drop-off locations.",
            ));
        }
        info!(ride_type = self.ride_type().name, "searching for a driver");
        self.stage = BookingStage::Searching { since: now };
        None
    }

    /// Finish the driver search once it has run its course.
    pub fn poll(&mut self, now: Instant) -> Option<Notice> {
        let BookingStage::Searching { since } = self.stage else {
            return None;
        };
        if now.saturating_duration_since(since) < DRIVER_SEARCH_DURATION {
            return None;
        }
        self.stage = BookingStage::DriverFound;
        info!(driver = ASSIGNED_DRIVER, "driver assigned");
        Some(Notice::success(
            "Driver Found!",
            &format!(
                "{ASSIGNED_DRIVER} is on the way. ETA: {DRIVER_ARRIVAL_MINUTES} minutes."
            ),
        ))
    }

    /// Back to editing with the entered addresses kept.
    pub fn reset(&mut self) {
        self.stage = BookingStage::Editing;
    }
}
