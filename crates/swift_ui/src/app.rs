//! Application state for the SwiftRide demo.

mod camera;
mod services;

use std::time::{Duration, Instant};

use tracing::{info, warn};

use swift_core::booking::BookingFlow;
use swift_core::credentials::{Credential, FileCredentialStore, SETTINGS_FILE_NAME};
use swift_core::dashboard::DriverDashboard;
use swift_core::geo::Coordinate;
use swift_core::lookup::{AddressLookup, LookupStatus};
use swift_core::map_sync::{MapCommand, MapSession, MapSyncConfig, MapView, MapViewState, SyncInputs};
use swift_core::notice::Notice;
use swift_core::simulation::{PositionSimulator, SimulatorConfig, TripInputs};

use crate::ui::constants::{
    DEFAULT_CENTER, DEMO_RIDE_DROPOFF, DEMO_RIDE_PICKUP, NOTICE_TTL_SECS, TOKEN_ENV_VAR,
};

pub use camera::Camera;

fn env_credential() -> Option<Credential> {
    std::env::var(TOKEN_ENV_VAR)
        .ok()
        .and_then(|raw| Credential::new(&raw))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Rider,
    Driver,
}

pub struct ActiveNotice {
    pub notice: Notice,
    pub shown_at: Instant,
}

pub struct SwiftRideApp {
    pub mode: Mode,
    pub map: MapSession<FileCredentialStore>,
    pub camera: Camera,
    pub simulator: PositionSimulator,
    pub booking: BookingFlow,
    pub dashboard: DriverDashboard,
    pub pickup_lookup: AddressLookup,
    pub dropoff_lookup: AddressLookup,
    pub pickup_input: String,
    pub dropoff_input: String,
    pub token_input: String,
    pub notices: Vec<ActiveNotice>,
    started_at: Instant,
}

impl SwiftRideApp {
    pub fn new() -> Self {
        let store = FileCredentialStore::in_working_dir().unwrap_or_else(|error| {
            warn!(%error, "falling back to a relative settings path");
            FileCredentialStore::new(SETTINGS_FILE_NAME)
        });
        let mut view = MapView::new(store, MapSyncConfig::default());
        if let Some(credential) = env_credential() {
            info!(var = TOKEN_ENV_VAR, "using map token from the environment");
            view = view.with_credential(credential);
        }
        info!(
            settings = %view.store().path().display(),
            connected = view.state() == MapViewState::Ready,
            "map view ready"
        );

        let services = services::build_map_services();
        Self {
            mode: Mode::Rider,
            map: MapSession::new(view, services.directions),
            camera: Camera::default(),
            simulator: PositionSimulator::new(SimulatorConfig::default()),
            booking: BookingFlow::default(),
            dashboard: DriverDashboard::default(),
            pickup_lookup: AddressLookup::new(services.geocoder.clone()),
            dropoff_lookup: AddressLookup::new(services.geocoder),
            pickup_input: String::new(),
            dropoff_input: String::new(),
            token_input: String::new(),
            notices: Vec::new(),
            started_at: Instant::now(),
        }
    }

    /// Advance every timer and remote result by one UI frame.
    pub fn frame(&mut self, now: Instant) {
        let connected_before = self.map.view().state() == MapViewState::Ready;
        let credential = self.map.view().credential().cloned();

        let mut rejected = false;
        for lookup in [&mut self.pickup_lookup, &mut self.dropoff_lookup] {
            if lookup.poll(now, credential.as_ref()) == Some(LookupStatus::Rejected) {
                rejected = true;
            }
        }
        if rejected {
            self.map.view_mut().handle_rejection();
        }

        if let Some(notice) = self.booking.poll(now) {
            self.push_notice(notice, now);
        }
        if let Some(notice) = self.dashboard.poll(now) {
            self.push_notice(notice, now);
        }

        let frame = self.simulator.frame_token();
        self.simulator.sync(self.trip_inputs());
        if let Some(token) = frame {
            self.simulator.tick(token, self.elapsed_ms(now));
        }

        let inputs = self.sync_inputs();
        let mut commands = self.map.update(&inputs);
        commands.extend(self.map.poll());
        for command in commands {
            if let MapCommand::FitViewport(target) = command {
                self.camera.fit(target, now);
            }
        }

        if connected_before && self.map.view().state() == MapViewState::ConnectPrompt {
            self.push_notice(
                Notice::error(
                    "Map token rejected",
                    "The map service refused the saved token. Please enter a new one.",
                ),
                now,
            );
        }

        let ttl = Duration::from_secs(NOTICE_TTL_SECS);
        self.notices
            .retain(|active| now.saturating_duration_since(active.shown_at) < ttl);
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.simulator.stop();
        self.map.view_mut().close();
    }

    pub fn push_notice(&mut self, notice: Notice, now: Instant) {
        self.notices.push(ActiveNotice {
            notice,
            shown_at: now,
        });
    }

    pub fn connect_token(&mut self, now: Instant) {
        let notice = match self.map.view_mut().connect(&self.token_input) {
            Ok(true) => Notice::success("Map connected", "Your token has been saved."),
            Ok(false) => Notice::error("Token required", "Paste a Mapbox public token first."),
            Err(error) => {
                warn!(%error, "failed to persist map token");
                Notice::error(
                    "Token not saved",
                    "The map works for this session, but the token could not be saved.",
                )
            }
        };
        self.token_input.clear();
        self.push_notice(notice, now);
    }

    pub fn disconnect_token(&mut self, now: Instant) {
        if let Err(error) = self.map.view_mut().disconnect() {
            warn!(%error, "failed to remove saved map token");
            self.push_notice(
                Notice::error("Token not removed", "The saved token could not be deleted."),
                now,
            );
        }
    }

    pub fn edit_pickup(&mut self, now: Instant) {
        self.booking.set_pickup_text(&self.pickup_input);
        self.pickup_lookup.set_text(&self.pickup_input, now);
    }

    pub fn edit_dropoff(&mut self, now: Instant) {
        self.booking.set_dropoff_text(&self.dropoff_input);
        self.dropoff_lookup.set_text(&self.dropoff_input, now);
    }

    /// Fill the pickup field with the map's default location.
    pub fn use_current_location(&mut self) {
        let credential = self.map.view().credential().cloned();
        self.pickup_lookup.locate(DEFAULT_CENTER, credential.as_ref());
        self.pickup_input = self.pickup_lookup.text().to_string();
        self.booking.set_pickup_text(&self.pickup_input);
    }

    pub fn confirm_booking(&mut self, now: Instant) {
        if let Some(notice) = self.booking.confirm(now) {
            self.push_notice(notice, now);
        }
    }

    pub fn toggle_online(&mut self, now: Instant) {
        let notice = self.dashboard.toggle_online(now);
        self.push_notice(notice, now);
    }

    pub fn accept_offer(&mut self, now: Instant) {
        if let Some(notice) = self.dashboard.accept() {
            self.push_notice(notice, now);
        }
    }

    pub fn decline_offer(&mut self, now: Instant) {
        if let Some(notice) = self.dashboard.decline(now) {
            self.push_notice(notice, now);
        }
    }

    pub fn complete_trip(&mut self, now: Instant) {
        if let Some(notice) = self.dashboard.complete_trip() {
            self.push_notice(notice, now);
        }
    }

    fn elapsed_ms(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.started_at).as_secs_f64() * 1000.0
    }

    fn lookup_coordinate(lookup: &AddressLookup) -> Option<Coordinate> {
        lookup.place().map(|place| place.coordinate)
    }

    fn trip_inputs(&self) -> TripInputs {
        match self.mode {
            Mode::Rider => TripInputs {
                pickup: Self::lookup_coordinate(&self.pickup_lookup),
                dropoff: Self::lookup_coordinate(&self.dropoff_lookup),
                active: self.booking.driver_found(),
            },
            Mode::Driver => TripInputs {
                pickup: Some(DEMO_RIDE_PICKUP),
                dropoff: Some(DEMO_RIDE_DROPOFF),
                active: self.dashboard.active_trip().is_some(),
            },
        }
    }

    fn sync_inputs(&self) -> SyncInputs {
        match self.mode {
            Mode::Rider => SyncInputs {
                pickup: Self::lookup_coordinate(&self.pickup_lookup),
                dropoff: Self::lookup_coordinate(&self.dropoff_lookup),
                driver: self.simulator.driver(),
                show_route: self.booking.show_route(),
            },
            Mode::Driver => {
                let on_trip = self.dashboard.active_trip().is_some();
                SyncInputs {
                    pickup: on_trip.then_some(DEMO_RIDE_PICKUP),
                    dropoff: on_trip.then_some(DEMO_RIDE_DROPOFF),
                    driver: self
                        .simulator
                        .driver()
                        .or_else(|| self.dashboard.is_online().then_some(DEFAULT_CENTER)),
                    show_route: on_trip,
                }
            }
        }
    }
}
