use std::time::{Duration, Instant};

use swift_core::booking::{BookingFlow, BookingStage, DRIVER_SEARCH_DURATION};
use swift_core::dashboard::{
    DriverDashboard, DEMO_OFFER, FIRST_OFFER_DELAY, NEXT_OFFER_DELAY, OFFER_TIMEOUT,
};
use swift_core::notice::Severity;

fn secs(t0: Instant, s: u64) -> Instant {
    t0 + Duration::from_secs(s)
}

#[test]
fn booking_without_addresses_warns() {
    let mut flow = BookingFlow::default();
    flow.set_pickup_text("MG Road");

    let notice = flow.confirm(Instant::now()).expect("missing info notice");
    assert_eq!(notice.title, "Missing Information");
    assert_eq!(notice.severity, Severity::Error);
    assert_eq!(flow.stage(), BookingStage::Editing);
}

#[test]
fn booking_finds_driver_after_search() {
    let t0 = Instant::now();
    let mut flow = BookingFlow::default();
    flow.set_pickup_text("MG Road");
    flow.set_dropoff_text("Koramangala");

    assert_eq!(flow.confirm(t0), None);
    assert!(flow.is_searching());
    assert_eq!(flow.poll(t0 + Duration::from_millis(2_999)), None);

    let notice = flow.poll(t0 + DRIVER_SEARCH_DURATION).expect("driver found");
    assert_eq!(notice.title, "Driver Found!");
    assert_eq!(notice.description, "Alex K. is on the way. ETA: 3 minutes.");
    assert!(flow.driver_found());
    assert!(!flow.can_confirm());

    flow.reset();
    assert!(flow.can_confirm());
    assert_eq!(flow.pickup_text(), "MG Road");
}

#[test]
fn going_online_delivers_an_offer_after_five_seconds() {
    let t0 = Instant::now();
    let mut dashboard = DriverDashboard::default();

    let notice = dashboard.toggle_online(t0);
    assert_eq!(notice.title, "You're now online");
    assert_eq!(dashboard.poll(secs(t0, 4)), None);
    assert!(dashboard.offer().is_none());

    dashboard.poll(t0 + FIRST_OFFER_DELAY);
    assert_eq!(dashboard.offer(), Some(&DEMO_OFFER));
}

#[test]
fn going_offline_cancels_pending_offer() {
    let t0 = Instant::now();
    let mut dashboard = DriverDashboard::default();
    dashboard.go_online(t0);

    let notice = dashboard.toggle_online(secs(t0, 2));
    assert_eq!(notice.title, "You're now offline");
    dashboard.poll(secs(t0, 10));
    assert!(dashboard.offer().is_none());
}

#[test]
fn unanswered_offer_is_declined_and_offered_again() {
    let t0 = Instant::now();
    let mut dashboard = DriverDashboard::default();
    dashboard.go_online(t0);
    let offered = t0 + FIRST_OFFER_DELAY;
    dashboard.poll(offered);

    assert_eq!(dashboard.poll(offered + Duration::from_secs(14)), None);
    let expired = offered + OFFER_TIMEOUT;
    let notice = dashboard.poll(expired).expect("auto decline");
    assert_eq!(notice.title, "Ride Declined");
    assert!(dashboard.offer().is_none());

    dashboard.poll(expired + NEXT_OFFER_DELAY - Duration::from_millis(1));
    assert!(dashboard.offer().is_none());
    dashboard.poll(expired + NEXT_OFFER_DELAY);
    assert!(dashboard.offer().is_some());
}

#[test]
fn accepted_trip_blocks_offers_until_completed() {
    let t0 = Instant::now();
    let mut dashboard = DriverDashboard::default();
    dashboard.go_online(t0);
    dashboard.poll(t0 + FIRST_OFFER_DELAY);

    let accepted = dashboard.accept().expect("accept notice");
    assert_eq!(accepted.title, "Ride Accepted!");
    assert_eq!(dashboard.active_trip(), Some(&DEMO_OFFER));
    dashboard.poll(secs(t0, 60));
    assert!(dashboard.offer().is_none());

    let rides_before = dashboard.earnings().rides;
    let completed = dashboard.complete_trip().expect("complete notice");
    assert_eq!(completed.title, "Trip Completed");
    assert_eq!(completed.description, "You earned $18.50 from this trip!");
    assert_eq!(dashboard.earnings().rides, rides_before + 1);
    assert!((dashboard.earnings().today - 146.0).abs() < 1e-9);
    assert!(dashboard.complete_trip().is_none());
}

#[test]
fn declining_while_offline_never_reoffers() {
    let t0 = Instant::now();
    let mut dashboard = DriverDashboard::default();
    dashboard.go_online(t0);
    dashboard.poll(t0 + FIRST_OFFER_DELAY);
    dashboard.decline(secs(t0, 6));
    dashboard.go_offline();

    dashboard.poll(secs(t0, 30));
    assert!(dashboard.offer().is_none());
}
