//! Mapbox directions and geocoding over blocking HTTP.
//!
//! This module wraps a blocking HTTP client and turns Mapbox JSON payloads
//! into [`RouteFetch`](crate::services::RouteFetch) and
//! [`Place`](crate::services::Place) values without leaking response details.
//! Calls block, so run them off the UI thread (see
//! [`RouteFetcher`](crate::route_fetch::RouteFetcher) and
//! [`AddressLookup`](crate::lookup::AddressLookup)).

mod client;
mod parser;
mod response;


pub use client::{MapboxClient, MapboxConfig, DEFAULT_BASE_URL};
