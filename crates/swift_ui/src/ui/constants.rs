//! Constants used throughout the UI.

use swift_core::geo::Coordinate;

/// Map center before anything has been located (Bangalore).
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(12.9716, 77.5946);

/// Visible span around [`DEFAULT_CENTER`], in degrees.
pub const DEFAULT_SPAN_DEG: f64 = 0.08;

/// Smallest span the camera will zoom to.
pub const MIN_SPAN_DEG: f64 = 0.01;

/// Stand-in coordinates for the driver dashboard's demo ride.
pub const DEMO_RIDE_PICKUP: Coordinate = Coordinate::new(12.9784, 77.6408);
pub const DEMO_RIDE_DROPOFF: Coordinate = Coordinate::new(12.9352, 77.6245);

/// Environment token that overrides the settings file for one run.
pub const TOKEN_ENV_VAR: &str = "SWIFTRIDE_MAPBOX_TOKEN";

/// How long a notice stays on screen.
pub const NOTICE_TTL_SECS: u64 = 5;

pub const FRAME_INTERVAL_MS: u64 = 16;
