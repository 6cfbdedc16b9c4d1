//! Remote map service abstraction: directions and geocoding.
//!
//! Two implementations exist:
//!
//! - **`MapboxClient`** (feature `mapbox`): blocking HTTP client for the Mapbox
//!   directions and geocoding endpoints.
//! - **`CachedGeocoder`**: LRU-cached wrapper around any [`Geocoder`].
//!
//! Every call takes the access credential explicitly; implementations never
//! read it from ambient storage.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use thiserror::Error;

use crate::credentials::Credential;
use crate::geo::Coordinate;

/// Addresses shorter than this after trimming are rejected without a lookup.
pub const MIN_ADDRESS_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapServiceError {
    /// No credential is configured.
    #[error("map service unavailable: no access token configured")]
    Unavailable,
    /// The service answered but had no usable result.
    #[error("no result found")]
    NotFound,
    /// Network failure or unreadable response.
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The service refused the credential.
    #[error("access token rejected by the map service")]
    Rejected,
}

/// Result of a directions query.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteFetch {
    pub geometry: Vec<Coordinate>,
    pub duration_secs: f64,
}

impl RouteFetch {
    pub fn eta_minutes(&self) -> u32 {
        eta_minutes(self.duration_secs)
    }
}

/// Whole minutes for a route duration, rounded to nearest.
pub fn eta_minutes(duration_secs: f64) -> u32 {
    (duration_secs.max(0.0) / 60.0).round() as u32
}

/// Best match for a free-text address.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub coordinate: Coordinate,
    pub place_name: String,
}

pub trait DirectionsService: Send + Sync {
    /// Driving route between two points.
    fn route(
        &self,
        credential: &Credential,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<RouteFetch, MapServiceError>;
}

pub trait Geocoder: Send + Sync {
    /// Best single match for `address`.
    fn forward(&self, credential: &Credential, address: &str) -> Result<Place, MapServiceError>;

    /// Canonical place name at `at`.
    fn reverse(&self, credential: &Credential, at: Coordinate) -> Result<String, MapServiceError>;
}

/// Trim and length-check a free-text address.
pub fn validate_address(address: &str) -> Result<&str, MapServiceError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(MapServiceError::InvalidInput("address is empty".to_string()));
    }
    if trimmed.chars().count() < MIN_ADDRESS_LEN {
        return Err(MapServiceError::InvalidInput(format!(
            "address must have at least {MIN_ADDRESS_LEN} characters"
        )));
    }
    Ok(trimmed)
}

/// Default forward-lookup cache capacity.
pub const DEFAULT_GEOCODE_CACHE_CAPACITY: usize = 256;

/// LRU-cached wrapper around any [`Geocoder`].
///
/// Cache key is the trimmed, lowercased address. Only successful forward
/// lookups are cached; reverse lookups always go to the inner geocoder.
pub struct CachedGeocoder {
    inner: Box<dyn Geocoder>,
    cache: Mutex<LruCache<String, Place>>,
}

impl CachedGeocoder {
    pub fn new(inner: Box<dyn Geocoder>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl Geocoder for CachedGeocoder {
    fn forward(&self, credential: &Credential, address: &str) -> Result<Place, MapServiceError> {
        let key = address.trim().to_lowercase();

        if let Ok(mut cache) = self.cache.lock() {
            if let Some(place) = cache.get(&key) {
                return Ok(place.clone());
            }
        }

        let place = self.inner.forward(credential, address)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, place.clone());
        }
        Ok(place)
    }

    fn reverse(&self, credential: &Credential, at: Coordinate) -> Result<String, MapServiceError> {
        self.inner.reverse(credential, at)
    }
}
