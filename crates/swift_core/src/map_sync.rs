//! Map synchronization: markers, route overlay, ETA and viewport.
//!
//! [`MapSync::reconcile`] consumes a snapshot of the latest inputs and returns
//! the [`MapCommand`]s a renderer must apply; route responses come back through
//! [`MapSync::apply_route_response`]. Keeping every transition in these two
//! functions means marker, route and viewport updates cannot race each other.
//!
//! Route requests follow `NoRoute -> Fetching -> RouteReady`. Only the most
//! recently issued request may apply its response; invalidating the inputs
//! drops the outstanding request, so a late answer cannot resurrect a route
//! that was already cleared.
//!
//! While the driver moves, a start that drifts past
//! [`MapSyncConfig::route_refresh_deg`] issues a new request and supersedes the
//! outstanding one. At the default threshold a driver on the dropoff leg
//! crosses it every few hundred milliseconds, so when the service answers
//! slower than that every response arrives stale and the route and ETA shown
//! are the last ones applied before the driver started moving. Raising the
//! threshold trades route freshness for answered requests.

mod markers;
mod session;
mod view;
mod viewport;

pub use markers::{Marker, MarkerChange, MarkerId, MarkerRole, MarkerSet, MarkerStyle};
pub use session::MapSession;
pub use view::{MapView, MapViewState};
pub use viewport::{FitSource, ViewportTarget, FIT_DURATION_MS, FIT_PADDING_PX};

use tracing::{debug, info, warn};

use crate::geo::Coordinate;
use crate::route_fetch::{RouteRequest, RouteRequestId, RouteResponse};

/// How far the effective start may drift before the route is requested again.
pub const ROUTE_REFRESH_DEG: f64 = 0.0005;

#[derive(Debug, Clone, PartialEq)]
pub struct MapSyncConfig {
    pub padding_px: f32,
    pub fit_duration_ms: u64,
    pub route_refresh_deg: f64,
}

impl Default for MapSyncConfig {
    fn default() -> Self {
        Self {
            padding_px: FIT_PADDING_PX,
            fit_duration_ms: FIT_DURATION_MS,
            route_refresh_deg: ROUTE_REFRESH_DEG,
        }
    }
}

impl MapSyncConfig {
    pub fn with_route_refresh(mut self, degrees: f64) -> Self {
        self.route_refresh_deg = degrees.max(0.0);
        self
    }

    pub fn with_fit(mut self, padding_px: f32, duration_ms: u64) -> Self {
        self.padding_px = padding_px.max(0.0);
        self.fit_duration_ms = duration_ms;
        self
    }
}

/// Everything the map layer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SyncInputs {
    pub pickup: Option<Coordinate>,
    pub dropoff: Option<Coordinate>,
    pub driver: Option<Coordinate>,
    pub show_route: bool,
}

impl SyncInputs {
    /// Effective route start (driver, else pickup) and the dropoff.
    pub fn route_endpoints(&self) -> Option<(Coordinate, Coordinate)> {
        Some((self.driver.or(self.pickup)?, self.dropoff?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutePhase {
    #[default]
    NoRoute,
    Fetching,
    RouteReady,
}

/// Instruction for whatever renders the map.
#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    Marker(MarkerChange),
    FetchRoute(RouteRequest),
    ShowRoute(Vec<Coordinate>),
    ClearRoute,
    SetEta(Option<u32>),
    FitViewport(ViewportTarget),
}

/// Output state after the latest transition.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSnapshot {
    pub markers: Vec<Marker>,
    pub route: Vec<Coordinate>,
    pub eta_minutes: Option<u32>,
    pub viewport: Option<ViewportTarget>,
    pub phase: RoutePhase,
}

#[derive(Debug, Default)]
pub struct MapSync {
    config: MapSyncConfig,
    markers: MarkerSet,
    route: Vec<Coordinate>,
    eta_minutes: Option<u32>,
    phase: RoutePhase,
    viewport: Option<ViewportTarget>,
    pending: Option<RouteRequest>,
    last_issued: Option<RouteRequest>,
    next_request_id: u64,
}

impl MapSync {
    pub fn new(config: MapSyncConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn reconcile(&mut self, inputs: &SyncInputs) -> Vec<MapCommand> {
        let mut commands = Vec::new();

        for (role, coordinate) in [
            (MarkerRole::Driver, inputs.driver),
            (MarkerRole::Pickup, inputs.pickup),
            (MarkerRole::Dropoff, inputs.dropoff),
        ] {
            if let Some(change) = self.markers.reconcile(role, coordinate) {
                commands.push(MapCommand::Marker(change));
            }
        }

        if inputs.show_route {
            match inputs.route_endpoints() {
                Some((from, to)) => {
                    if self.needs_request(from, to) {
                        let request = self.issue_request(from, to);
                        commands.push(MapCommand::FetchRoute(request));
                    }
                }
                None => self.invalidate_route(&mut commands),
            }
        } else {
            self.invalidate_route(&mut commands);
            if inputs.pickup.is_some() || inputs.dropoff.is_some() {
                let points = [inputs.pickup, inputs.dropoff, inputs.driver]
                    .into_iter()
                    .flatten();
                let target =
                    viewport::fit_markers(points, self.config.padding_px, self.config.fit_duration_ms);
                self.set_viewport(target, &mut commands);
            }
        }

        commands
    }

    /// Apply a directions response. Anything but the latest outstanding
    /// request is ignored.
    pub fn apply_route_response(&mut self, response: RouteResponse) -> Vec<MapCommand> {
        let mut commands = Vec::new();
        let id = response.request.id;
        if !self.is_pending(id) {
            debug!(id = id.0, "dropping stale route response");
            return commands;
        }
        self.pending = None;

        match response.result {
            Ok(fetch) if !fetch.geometry.is_empty() => {
                let eta = fetch.eta_minutes();
                info!(id = id.0, eta_minutes = eta, points = fetch.geometry.len(), "route ready");
                self.route = fetch.geometry;
                self.eta_minutes = Some(eta);
                self.phase = RoutePhase::RouteReady;
                commands.push(MapCommand::ShowRoute(self.route.clone()));
                commands.push(MapCommand::SetEta(Some(eta)));
                let target = viewport::fit_route(
                    &self.route,
                    self.config.padding_px,
                    self.config.fit_duration_ms,
                );
                self.set_viewport(target, &mut commands);
            }
            Ok(_) => {
                warn!(id = id.0, "route response had no geometry");
                self.phase = RoutePhase::NoRoute;
            }
            Err(error) => {
                warn!(id = id.0, %error, "route fetch failed");
                self.phase = RoutePhase::NoRoute;
            }
        }

        commands
    }

    /// Drop all markers and route state, as when the map view goes away.
    pub fn close(&mut self) -> Vec<MapCommand> {
        let mut commands: Vec<MapCommand> = self
            .markers
            .clear()
            .into_iter()
            .map(MapCommand::Marker)
            .collect();
        self.invalidate_route(&mut commands);
        self.viewport = None;
        commands
    }

    pub fn is_pending(&self, id: RouteRequestId) -> bool {
        self.pending.map(|pending| pending.id) == Some(id)
    }

    pub fn pending(&self) -> Option<&RouteRequest> {
        self.pending.as_ref()
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn route(&self) -> &[Coordinate] {
        &self.route
    }

    pub fn eta_minutes(&self) -> Option<u32> {
        self.eta_minutes
    }

    pub fn phase(&self) -> RoutePhase {
        self.phase
    }

    pub fn viewport(&self) -> Option<&ViewportTarget> {
        self.viewport.as_ref()
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            markers: self.markers.iter().copied().collect(),
            route: self.route.clone(),
            eta_minutes: self.eta_minutes,
            viewport: self.viewport,
            phase: self.phase,
        }
    }

    fn needs_request(&self, from: Coordinate, to: Coordinate) -> bool {
        match self.last_issued {
            None => true,
            Some(last) => {
                last.to != to || last.from.max_axis_delta(from) > self.config.route_refresh_deg
            }
        }
    }

    fn issue_request(&mut self, from: Coordinate, to: Coordinate) -> RouteRequest {
        self.next_request_id += 1;
        let request = RouteRequest {
            id: RouteRequestId(self.next_request_id),
            from,
            to,
        };
        if let Some(previous) = self.pending.replace(request) {
            debug!(id = previous.id.0, "route request superseded");
        }
        self.last_issued = Some(request);
        self.phase = RoutePhase::Fetching;
        request
    }

    fn invalidate_route(&mut self, commands: &mut Vec<MapCommand>) {
        if let Some(pending) = self.pending.take() {
            debug!(id = pending.id.0, "route inputs invalidated while fetching");
        }
        self.last_issued = None;
        self.phase = RoutePhase::NoRoute;
        if !self.route.is_empty() {
            self.route.clear();
            commands.push(MapCommand::ClearRoute);
        }
        if self.eta_minutes.take().is_some() {
            commands.push(MapCommand::SetEta(None));
        }
    }

    fn set_viewport(&mut self, target: Option<ViewportTarget>, commands: &mut Vec<MapCommand>) {
        let Some(target) = target else {
            return;
        };
        if self.viewport == Some(target) {
            return;
        }
        self.viewport = Some(target);
        commands.push(MapCommand::FitViewport(target));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MapServiceError, RouteFetch};

    fn pickup() -> Coordinate {
        Coordinate::new(12.9716, 77.5946)
    }

    fn dropoff() -> Coordinate {
        Coordinate::new(12.9352, 77.6245)
    }

    fn fetch_request(commands: &[MapCommand]) -> RouteRequest {
        commands
            .iter()
            .find_map(|command| match command {
                MapCommand::FetchRoute(request) => Some(*request),
                _ => None,
            })
            .expect("route request issued")
    }

    fn ok_response(request: RouteRequest, duration_secs: f64) -> RouteResponse {
        RouteResponse {
            request,
            result: Ok(RouteFetch {
                geometry: vec![request.from, request.to],
                duration_secs,
            }),
        }
    }

    #[test]
    fn route_request_uses_driver_when_present() {
        let mut sync = MapSync::default();
        let driver = Coordinate::new(12.98, 77.60);
        let commands = sync.reconcile(&SyncInputs {
            pickup: Some(pickup()),
            dropoff: Some(dropoff()),
            driver: Some(driver),
            show_route: true,
        });
        let request = fetch_request(&commands);
        assert_eq!(request.from, driver);
        assert_eq!(request.to, dropoff());
        assert_eq!(sync.phase(), RoutePhase::Fetching);
    }

    #[test]
    fn unchanged_inputs_do_not_refetch() {
        let mut sync = MapSync::default();
        let inputs = SyncInputs {
            pickup: Some(pickup()),
            dropoff: Some(dropoff()),
            driver: None,
            show_route: true,
        };
        sync.reconcile(&inputs);
        assert!(sync.reconcile(&inputs).is_empty());
    }

    #[test]
    fn small_driver_moves_stay_under_refresh_threshold() {
        let mut sync = MapSync::new(MapSyncConfig::default().with_route_refresh(0.001));
        let mut inputs = SyncInputs {
            pickup: Some(pickup()),
            dropoff: Some(dropoff()),
            driver: Some(pickup()),
            show_route: true,
        };
        sync.reconcile(&inputs);

        inputs.driver = Some(pickup().offset(0.0005, 0.0));
        let commands = sync.reconcile(&inputs);
        assert!(!commands
            .iter()
            .any(|c| matches!(c, MapCommand::FetchRoute(_))));

        inputs.driver = Some(pickup().offset(0.002, 0.0));
        let commands = sync.reconcile(&inputs);
        assert_eq!(fetch_request(&commands).id, RouteRequestId(2));
    }

    #[test]
    fn refresh_faster_than_responses_keeps_last_applied_route() {
        let mut sync = MapSync::default();
        let mut inputs = SyncInputs {
            pickup: Some(pickup()),
            dropoff: Some(dropoff()),
            driver: Some(pickup()),
            show_route: true,
        };
        let first = fetch_request(&sync.reconcile(&inputs));
        sync.apply_route_response(ok_response(first, 900.0));
        assert_eq!(sync.eta_minutes(), Some(15));

        let mut outstanding = None;
        for step in 1..=10 {
            inputs.driver = Some(pickup().offset(-0.001 * f64::from(step), 0.0));
            let request = fetch_request(&sync.reconcile(&inputs));
            if let Some(late) = outstanding.replace(request) {
                assert!(sync.apply_route_response(ok_response(late, 60.0)).is_empty());
            }
            assert_eq!(sync.eta_minutes(), Some(15));
            assert_eq!(sync.route(), &[pickup(), dropoff()]);
            assert_eq!(sync.phase(), RoutePhase::Fetching);
        }

        let last = outstanding.expect("request outstanding");
        assert!(!sync.apply_route_response(ok_response(last, 60.0)).is_empty());
        assert_eq!(sync.eta_minutes(), Some(1));
        assert_eq!(sync.phase(), RoutePhase::RouteReady);
    }

    #[test]
    fn failed_fetch_keeps_previous_route() {
        let mut sync = MapSync::new(MapSyncConfig::default().with_route_refresh(0.0));
        let mut inputs = SyncInputs {
            pickup: Some(pickup()),
            dropoff: Some(dropoff()),
            driver: None,
            show_route: true,
        };
        let first = fetch_request(&sync.reconcile(&inputs));
        sync.apply_route_response(ok_response(first, 600.0));
        assert_eq!(sync.eta_minutes(), Some(10));

        inputs.driver = Some(pickup().offset(0.01, 0.01));
        let second = fetch_request(&sync.reconcile(&inputs));
        let commands = sync.apply_route_response(RouteResponse {
            request: second,
            result: Err(MapServiceError::Transport("timeout".to_string())),
        });
        assert!(commands.is_empty());
        assert_eq!(sync.eta_minutes(), Some(10));
        assert_eq!(sync.route(), &[pickup(), dropoff()]);
        assert_eq!(sync.phase(), RoutePhase::NoRoute);
    }

    #[test]
    fn markers_fit_viewport_when_route_hidden() {
        let mut sync = MapSync::default();
        let commands = sync.reconcile(&SyncInputs {
            pickup: Some(pickup()),
            dropoff: Some(dropoff()),
            driver: None,
            show_route: false,
        });
        let target = sync.viewport().expect("viewport fitted");
        assert_eq!(target.source, FitSource::Markers);
        assert!(target.bounds.contains(pickup()));
        assert!(target.bounds.contains(dropoff()));
        assert!(commands
            .iter()
            .any(|c| matches!(c, MapCommand::FitViewport(_))));
        assert!(!commands
            .iter()
            .any(|c| matches!(c, MapCommand::FetchRoute(_))));
    }

    #[test]
    fn route_fit_follows_route_bounds() {
        let mut sync = MapSync::default();
        let request = fetch_request(&sync.reconcile(&SyncInputs {
            pickup: Some(pickup()),
            dropoff: Some(dropoff()),
            driver: None,
            show_route: true,
        }));
        let detour = Coordinate::new(13.1, 77.7);
        sync.apply_route_response(RouteResponse {
            request,
            result: Ok(RouteFetch {
                geometry: vec![pickup(), detour, dropoff()],
                duration_secs: 1_200.0,
            }),
        });
        let target = sync.viewport().expect("viewport");
        assert_eq!(target.source, FitSource::Route);
        assert_eq!(target.padding_px, FIT_PADDING_PX);
        assert_eq!(target.duration_ms, FIT_DURATION_MS);
        assert!(target.bounds.contains(detour));
    }

    #[test]
    fn close_releases_everything() {
        let mut sync = MapSync::default();
        let request = fetch_request(&sync.reconcile(&SyncInputs {
            pickup: Some(pickup()),
            dropoff: Some(dropoff()),
            driver: Some(pickup()),
            show_route: true,
        }));
        sync.apply_route_response(ok_response(request, 900.0));

        let commands = sync.close();
        let removed = commands
            .iter()
            .filter(|c| matches!(c, MapCommand::Marker(MarkerChange::Removed { .. })))
            .count();
        assert_eq!(removed, 3);
        assert!(commands.contains(&MapCommand::ClearRoute));
        assert_eq!(sync.markers().iter().count(), 0);
        assert!(sync.route().is_empty());
        assert!(sync.eta_minutes().is_none());
    }
}
