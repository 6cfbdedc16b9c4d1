pub mod booking;
pub mod credentials;
pub mod dashboard;
pub mod geo;
pub mod lookup;
pub mod map_sync;
#[cfg(feature = "mapbox")]
pub mod mapbox;
pub mod notice;
pub mod rides;
pub mod route_fetch;
pub mod services;
pub mod simulation;
