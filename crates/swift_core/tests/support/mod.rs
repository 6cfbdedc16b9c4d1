#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use swift_core::credentials::Credential;
use swift_core::geo::Coordinate;
use swift_core::services::{DirectionsService, Geocoder, MapServiceError, Place, RouteFetch};

pub fn bangalore_pickup() -> Coordinate {
    Coordinate::new(12.9716, 77.5946)
}

pub fn bangalore_dropoff() -> Coordinate {
    Coordinate::new(12.9352, 77.6245)
}

pub fn token() -> Credential {
    Credential::new("pk.test-token").expect("non-empty token")
}

/// Directions service that answers from memory and counts calls.
pub struct FakeDirections {
    duration_secs: f64,
    failure: Option<MapServiceError>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(Coordinate, Coordinate)>>,
}

impl FakeDirections {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            failure: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: MapServiceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new(0.0)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(Coordinate, Coordinate)> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl DirectionsService for FakeDirections {
    fn route(
        &self,
        _credential: &Credential,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<RouteFetch, MapServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((from, to));
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(RouteFetch {
            geometry: vec![from, from.lerp(to, 0.5), to],
            duration_secs: self.duration_secs,
        })
    }
}

/// Geocoder over a fixed address table.
#[derive(Default)]
pub struct FakeGeocoder {
    places: HashMap<String, Coordinate>,
    forward_calls: AtomicUsize,
    reverse_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn with_place(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.places.insert(address.to_lowercase(), coordinate);
        self
    }

    pub fn forward_calls(&self) -> usize {
        self.forward_calls.load(Ordering::SeqCst)
    }

    pub fn reverse_calls(&self) -> usize {
        self.reverse_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

impl Geocoder for FakeGeocoder {
    fn forward(&self, _credential: &Credential, address: &str) -> Result<Place, MapServiceError> {
        self.forward_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(address.to_string());
        }
        self.places
            .get(&address.to_lowercase())
            .map(|coordinate| Place {
                coordinate: *coordinate,
                place_name: address.to_string(),
            })
            .ok_or(MapServiceError::NotFound)
    }

    fn reverse(&self, _credential: &Credential, at: Coordinate) -> Result<String, MapServiceError> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        self.places
            .iter()
            .find(|(_, coordinate)| coordinate.max_axis_delta(at) < 1e-6)
            .map(|(address, _)| address.clone())
            .ok_or(MapServiceError::NotFound)
    }
}
