//! Driver dashboard: availability, simulated ride offers and trip completion.
//!
//! Timers are expressed as deadlines checked by [`DriverDashboard::poll`], so
//! the whole flow is driven by the caller's clock.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::notice::Notice;
use crate::rides::format_fare;

/// Delay between going online and the first offer.
pub const FIRST_OFFER_DELAY: Duration = Duration::from_secs(5);
/// Delay between a decline and the next offer.
pub const NEXT_OFFER_DELAY: Duration = Duration::from_secs(8);
/// An offer left unanswered this long is declined.
pub const OFFER_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq)]
pub struct RideOffer {
    pub pickup: &'static str,
    pub dropoff: &'static str,
    pub distance_km: f64,
    pub fare: f64,
}

pub const DEMO_OFFER: RideOffer = RideOffer {
    pickup: "123 Main Street, Downtown",
    dropoff: "456 Oak Avenue, Uptown",
    distance_km: 4.2,
    fare: 18.50,
};

#[derive(Debug, Clone, PartialEq)]
pub struct EarningsSummary {
    pub today: f64,
    pub rides: u32,
    pub online_minutes: u32,
    pub rating: f64,
    pub acceptance_pct: u32,
}

impl Default for EarningsSummary {
    fn default() -> Self {
        Self {
            today: 127.50,
            rides: 8,
            online_minutes: 5 * 60 + 32,
            rating: 4.92,
            acceptance_pct: 94,
        }
    }
}

impl EarningsSummary {
    /// `5h 32m` style label.
    pub fn online_label(&self) -> String {
        format!("{}h {}m", self.online_minutes / 60, self.online_minutes % 60)
    }
}

#[derive(Debug, Clone)]
pub struct DriverDashboard {
    online: bool,
    next_offer_at: Option<Instant>,
    offered_at: Option<Instant>,
    active_trip: Option<RideOffer>,
    earnings: EarningsSummary,
}

impl Default for DriverDashboard {
    fn default() -> Self {
        Self::new(EarningsSummary::default())
    }
}

impl DriverDashboard {
    pub fn new(earnings: EarningsSummary) -> Self {
        Self {
            online: false,
            next_offer_at: None,
            offered_at: None,
            active_trip: None,
            earnings,
        }
    }

    pub fn toggle_online(&mut self, now: Instant) -> Notice {
        if self.online {
            self.go_offline()
        } else {
            self.go_online(now)
        }
    }

    pub fn go_online(&mut self, now: Instant) -> Notice {
        self.online = true;
        self.next_offer_at = Some(now + FIRST_OFFER_DELAY);
        info!("driver online");
        Notice::info(
            "You're now online",
            "You'll receive ride requests from nearby riders.",
        )
    }

    pub fn go_offline(&mut self) -> Notice {
        self.online = false;
        self.next_offer_at = None;
        self.offered_at = None;
        info!("driver offline");
        Notice::info("You're now offline", "You won't receive any ride requests.")
    }

    /// Fire due timers: deliver a scheduled offer, or expire an unanswered one.
    pub fn poll(&mut self, now: Instant) -> Option<Notice> {
        if let Some(offered_at) = self.offered_at {
            if now.saturating_duration_since(offered_at) >= OFFER_TIMEOUT {
                debug!("ride offer expired");
                return self.decline(now);
            }
            return None;
        }

        let due = self.next_offer_at.is_some_and(|at| now >= at);
        if due {
            self.next_offer_at = None;
            // The timer may outlive the state it was scheduled for.
            if self.online && self.active_trip.is_none() {
                debug!("ride offer delivered");
                self.offered_at = Some(now);
            }
        }
        None
    }

    pub fn accept(&mut self) -> Option<Notice> {
        self.offered_at.take()?;
        self.next_offer_at = None;
        self.active_trip = Some(DEMO_OFFER);
        info!(fare = DEMO_OFFER.fare, "ride accepted");
        Some(Notice::success(
            "Ride Accepted!",
            "Navigate to the pickup point to meet your rider.",
        ))
    }

    pub fn decline(&mut self, now: Instant) -> Option<Notice> {
        self.offered_at.take()?;
        self.next_offer_at = Some(now + NEXT_OFFER_DELAY);
        info!("ride declined");
        Some(Notice::info(
            "Ride Declined",
            "You'll receive another request soon.",
        ))
    }

    /// Finish the active trip and credit its fare.
    pub fn complete_trip(&mut self) -> Option<Notice> {
        let trip = self.active_trip.take()?;
        self.earnings.today += trip.fare;
        self.earnings.rides += 1;
        info!(fare = trip.fare, "trip completed");
        Some(Notice::success(
            "Trip Completed",
            &format!("You earned {} from this trip!", format_fare(trip.fare)),
        ))
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn offer(&self) -> Option<&'static RideOffer> {
        self.offered_at.map(|_| &DEMO_OFFER)
    }

    /// Whole seconds left on the current offer, rounded up.
    pub fn offer_seconds_left(&self, now: Instant) -> Option<u64> {
        let offered_at = self.offered_at?;
        let left = OFFER_TIMEOUT.saturating_sub(now.saturating_duration_since(offered_at));
        Some(left.as_millis().div_ceil(1000) as u64)
    }

    /// Share of the offer window still remaining, in `[0, 1]`.
    pub fn offer_fraction_left(&self, now: Instant) -> Option<f32> {
        let offered_at = self.offered_at?;
        let left = OFFER_TIMEOUT.saturating_sub(now.saturating_duration_since(offered_at));
        Some(left.as_secs_f32() / OFFER_TIMEOUT.as_secs_f32())
    }

    pub fn active_trip(&self) -> Option<&RideOffer> {
        self.active_trip.as_ref()
    }

    pub fn earnings(&self) -> &EarningsSummary {
        &self.earnings
    }
}
