//! Driver position simulation.
//!
//! Animates one driver coordinate toward the pickup point and then toward the
//! dropoff point over fixed wall-clock durations. There is no road network or
//! traffic here: each leg is a straight line walked with linear interpolation.
//!
//! Phases only move forward (`Idle -> ToPickup -> ToDropoff -> Completed`);
//! the only way back to `Idle` is [`PositionSimulator::stop`], which clears the
//! phase, the coordinate and the pending frame together.

mod frame;

pub use frame::{FrameLoop, FrameToken};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::geo::Coordinate;

pub const TO_PICKUP_DURATION_MS: f64 = 10_000.0;
pub const TO_DROPOFF_DURATION_MS: f64 = 15_000.0;
/// Per-axis half width of the box the driver spawns in around the pickup.
pub const START_OFFSET_DEG: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TripPhase {
    #[default]
    Idle,
    ToPickup,
    ToDropoff,
    Completed,
}

impl TripPhase {
    pub fn is_moving(self) -> bool {
        matches!(self, TripPhase::ToPickup | TripPhase::ToDropoff)
    }

    pub fn label(self) -> &'static str {
        match self {
            TripPhase::Idle => "idle",
            TripPhase::ToPickup => "to-pickup",
            TripPhase::ToDropoff => "to-dropoff",
            TripPhase::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    pub to_pickup_ms: f64,
    pub to_dropoff_ms: f64,
    pub start_offset_deg: f64,
    /// Fixed seed for the spawn offset; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            to_pickup_ms: TO_PICKUP_DURATION_MS,
            to_dropoff_ms: TO_DROPOFF_DURATION_MS,
            start_offset_deg: START_OFFSET_DEG,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_durations(mut self, to_pickup_ms: f64, to_dropoff_ms: f64) -> Self {
        self.to_pickup_ms = to_pickup_ms.max(1.0);
        self.to_dropoff_ms = to_dropoff_ms.max(1.0);
        self
    }

    pub fn with_start_offset(mut self, offset_deg: f64) -> Self {
        self.start_offset_deg = offset_deg.abs();
        self
    }
}

/// Inputs the host feeds the simulator every time they may have changed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TripInputs {
    pub pickup: Option<Coordinate>,
    pub dropoff: Option<Coordinate>,
    pub active: bool,
}

/// Read-only view of the simulation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSnapshot {
    pub driver: Option<Coordinate>,
    pub phase: TripPhase,
    pub progress: f64,
}

pub struct PositionSimulator {
    config: SimulatorConfig,
    rng: StdRng,
    phase: TripPhase,
    driver: Option<Coordinate>,
    progress: f64,
    leg_elapsed_ms: f64,
    leg_start: Option<Coordinate>,
    pickup: Option<Coordinate>,
    dropoff: Option<Coordinate>,
    frames: FrameLoop,
}

impl Default for PositionSimulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

impl PositionSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            phase: TripPhase::Idle,
            driver: None,
            progress: 0.0,
            leg_elapsed_ms: 0.0,
            leg_start: None,
            pickup: None,
            dropoff: None,
            frames: FrameLoop::default(),
        }
    }

    /// Apply the latest inputs: stop when inactive, start when active with a
    /// known pickup while idle. Endpoints are always refreshed.
    pub fn sync(&mut self, inputs: TripInputs) {
        self.pickup = inputs.pickup;
        self.dropoff = inputs.dropoff;

        if !inputs.active {
            self.stop();
            return;
        }

        if self.phase == TripPhase::Idle && inputs.pickup.is_some() {
            self.start(inputs.pickup);
        }
    }

    /// Spawn the driver near `pickup` and begin the first leg. No-op without
    /// a pickup.
    pub fn start(&mut self, pickup: Option<Coordinate>) {
        let Some(pickup) = pickup else {
            return;
        };
        let offset = spawn_half_width(self.config.start_offset_deg);
        let origin = pickup.offset(
            self.rng.gen_range(-offset..=offset),
            self.rng.gen_range(-offset..=offset),
        );

        self.pickup = Some(pickup);
        self.driver = Some(origin);
        self.leg_start = Some(origin);
        self.phase = TripPhase::ToPickup;
        self.progress = 0.0;
        self.leg_elapsed_ms = 0.0;
        self.frames.schedule();
        info!(
            lat = origin.lat,
            lng = origin.lng,
            "driver simulation started"
        );
    }

    /// Reset to idle and cancel the pending frame. Safe to call repeatedly.
    pub fn stop(&mut self) {
        let was_running = self.phase != TripPhase::Idle || self.frames.is_scheduled();
        self.frames.cancel();
        self.phase = TripPhase::Idle;
        self.driver = None;
        self.leg_start = None;
        self.progress = 0.0;
        self.leg_elapsed_ms = 0.0;
        if was_running {
            debug!("driver simulation stopped");
        }
    }

    /// Token the host must pass to the next [`tick`](Self::tick), or `None`
    /// when no frame is wanted.
    pub fn frame_token(&self) -> Option<FrameToken> {
        self.frames.current()
    }

    /// Frame callback: converts the host timestamp into a delta and advances.
    /// A revoked `token` is ignored. Returns the token for the next frame.
    pub fn tick(&mut self, token: FrameToken, now_ms: f64) -> Option<FrameToken> {
        if let Some(delta_ms) = self.frames.delta(token, now_ms) {
            self.advance(delta_ms);
        }
        self.frames.current()
    }

    /// Advance the current leg by `delta_ms` of wall-clock time.
    ///
    /// Does nothing once the frame loop is cancelled or the phase is not a
    /// moving one. A leg whose endpoint is unknown holds position.
    fn advance(&mut self, delta_ms: f64) {
        if !self.frames.is_scheduled() {
            return;
        }
        let (end, duration_ms) = match self.phase {
            TripPhase::ToPickup => (self.pickup, self.config.to_pickup_ms),
            TripPhase::ToDropoff => (self.dropoff, self.config.to_dropoff_ms),
            TripPhase::Idle | TripPhase::Completed => return,
        };
        let (Some(start), Some(end)) = (self.leg_start, end) else {
            return;
        };

        // Derived from summed elapsed time; whole-millisecond frames sum exactly.
        self.leg_elapsed_ms += delta_ms.max(0.0);
        self.progress = self.leg_elapsed_ms / duration_ms;

        if self.progress < 1.0 {
            self.driver = Some(start.lerp(end, self.progress));
            return;
        }

        self.driver = Some(end);
        self.progress = 0.0;
        self.leg_elapsed_ms = 0.0;
        match self.phase {
            TripPhase::ToPickup => {
                self.leg_start = Some(end);
                self.phase = TripPhase::ToDropoff;
                info!("driver reached pickup");
            }
            _ => {
                self.phase = TripPhase::Completed;
                self.frames.cancel();
                info!("driver reached dropoff");
            }
        }
    }

    pub fn phase(&self) -> TripPhase {
        self.phase
    }

    pub fn driver(&self) -> Option<Coordinate> {
        self.driver
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn leg_start(&self) -> Option<Coordinate> {
        self.leg_start
    }

    pub fn is_moving(&self) -> bool {
        self.phase.is_moving()
    }

    pub fn is_scheduled(&self) -> bool {
        self.frames.is_scheduled()
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            driver: self.driver,
            phase: self.phase,
            progress: self.progress,
        }
    }
}

/// Usable spawn box half width; anything not finite collapses to the pickup.
fn spawn_half_width(offset_deg: f64) -> f64 {
    if offset_deg.is_finite() {
        offset_deg.abs()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pickup() -> Coordinate {
        Coordinate::new(12.9716, 77.5946)
    }

    fn dropoff() -> Coordinate {
        Coordinate::new(12.9352, 77.6245)
    }

    fn seeded() -> PositionSimulator {
        PositionSimulator::new(SimulatorConfig::default().with_seed(7))
    }

    #[test]
    fn start_without_pickup_is_a_no_op() {
        let mut sim = seeded();
        sim.start(None);
        assert_eq!(sim.phase(), TripPhase::Idle);
        assert!(sim.driver().is_none());
        assert!(!sim.is_scheduled());
    }

    #[test]
    fn start_spawns_within_offset_of_pickup() {
        let mut sim = seeded();
        sim.start(Some(pickup()));
        let driver = sim.driver().expect("driver spawned");
        assert!(driver.max_axis_delta(pickup()) <= START_OFFSET_DEG + 1e-12);
        assert_eq!(sim.phase(), TripPhase::ToPickup);
        assert_eq!(sim.progress(), 0.0);
        assert!(sim.is_moving());
    }

    #[test]
    fn interpolates_from_leg_start() {
        let mut sim = seeded();
        sim.sync(TripInputs {
            pickup: Some(pickup()),
            dropoff: Some(dropoff()),
            active: true,
        });
        let origin = sim.leg_start().expect("leg start");
        sim.advance(2_500.0);
        let expected = origin.lerp(pickup(), 0.25);
        assert_eq!(sim.driver(), Some(expected));
    }

    #[test]
    fn leg_without_dropoff_holds_position() {
        let mut sim = seeded();
        sim.sync(TripInputs {
            pickup: Some(pickup()),
            dropoff: None,
            active: true,
        });
        sim.advance(TO_PICKUP_DURATION_MS);
        assert_eq!(sim.phase(), TripPhase::ToDropoff);
        sim.advance(20_000.0);
        assert_eq!(sim.phase(), TripPhase::ToDropoff);
        assert_eq!(sim.driver(), Some(pickup()));
        assert_eq!(sim.progress(), 0.0);
    }

    #[test]
    fn completed_run_does_not_restart_while_active() {
        let mut sim = seeded();
        let inputs = TripInputs {
            pickup: Some(pickup()),
            dropoff: Some(dropoff()),
            active: true,
        };
        sim.sync(inputs);
        sim.advance(TO_PICKUP_DURATION_MS);
        sim.advance(TO_DROPOFF_DURATION_MS);
        sim.sync(inputs);
        assert_eq!(sim.phase(), TripPhase::Completed);
        assert_eq!(sim.driver(), Some(dropoff()));
        assert!(!sim.is_scheduled());
    }

    #[test]
    fn deactivation_stops_from_any_phase() {
        let mut sim = seeded();
        sim.sync(TripInputs {
            pickup: Some(pickup()),
            dropoff: Some(dropoff()),
            active: true,
        });
        sim.advance(TO_PICKUP_DURATION_MS + 1.0);
        sim.sync(TripInputs {
            pickup: Some(pickup()),
            dropoff: Some(dropoff()),
            active: false,
        });
        assert_eq!(sim.phase(), TripPhase::Idle);
        assert!(sim.driver().is_none());
        assert_eq!(sim.progress(), 0.0);
    }

    #[test]
    fn unsanitised_offset_still_spawns_near_pickup() {
        for offset in [-0.01, f64::NAN, f64::INFINITY] {
            let mut sim = PositionSimulator::new(SimulatorConfig {
                start_offset_deg: offset,
                ..SimulatorConfig::default().with_seed(5)
            });
            sim.start(Some(pickup()));
            let driver = sim.driver().expect("driver spawned");
            assert!(driver.max_axis_delta(pickup()) <= START_OFFSET_DEG + 1e-12);
            assert_eq!(sim.phase(), TripPhase::ToPickup);
        }
    }

    #[test]
    fn tick_with_revoked_token_is_ignored() {
        let mut sim = seeded();
        sim.start(Some(pickup()));
        let stale = sim.frame_token().expect("scheduled");
        sim.tick(stale, 0.0);

        sim.stop();
        sim.start(Some(pickup()));
        let origin = sim.driver();
        assert_eq!(sim.tick(stale, 5_000.0), sim.frame_token());
        assert_eq!(sim.driver(), origin);
        assert_eq!(sim.progress(), 0.0);

        let live = sim.frame_token().expect("rescheduled");
        sim.tick(live, 5_000.0);
        sim.tick(live, 7_500.0);
        assert_eq!(sim.progress(), 0.25);
    }

    #[test]
    fn same_seed_spawns_same_origin() {
        let mut a = seeded();
        let mut b = seeded();
        a.start(Some(pickup()));
        b.start(Some(pickup()));
        assert_eq!(a.driver(), b.driver());
    }
}
