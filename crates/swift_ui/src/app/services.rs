use std::sync::Arc;

use swift_core::credentials::Credential;
use swift_core::geo::Coordinate;
use swift_core::services::{DirectionsService, Geocoder, MapServiceError, Place, RouteFetch};

pub struct MapServices {
    pub directions: Arc<dyn DirectionsService>,
    pub geocoder: Arc<dyn Geocoder>,
}

/// Stand-in used when the HTTP client is compiled out or cannot be built.
struct OfflineMaps;

impl DirectionsService for OfflineMaps {
    fn route(
        &self,
        _: &Credential,
        _: Coordinate,
        _: Coordinate,
    ) -> Result<RouteFetch, MapServiceError> {
        Err(MapServiceError::Unavailable)
    }
}

impl Geocoder for OfflineMaps {
    fn forward(&self, _: &Credential, _: &str) -> Result<Place, MapServiceError> {
        Err(MapServiceError::Unavailable)
    }

    fn reverse(&self, _: &Credential, _: Coordinate) -> Result<String, MapServiceError> {
        Err(MapServiceError::Unavailable)
    }
}

fn offline() -> MapServices {
    MapServices {
        directions: Arc::new(OfflineMaps),
        geocoder: Arc::new(OfflineMaps),
    }
}

#[cfg(feature = "mapbox")]
pub fn build_map_services() -> MapServices {
    use swift_core::mapbox::{MapboxClient, MapboxConfig};
    use swift_core::services::{CachedGeocoder, DEFAULT_GEOCODE_CACHE_CAPACITY};

    match MapboxClient::new(MapboxConfig::default()) {
        Ok(client) => MapServices {
            directions: Arc::new(client.clone()),
            geocoder: Arc::new(CachedGeocoder::new(
                Box::new(client),
                DEFAULT_GEOCODE_CACHE_CAPACITY,
            )),
        },
        Err(error) => {
            tracing::error!(%error, "map client unavailable; running offline");
            offline()
        }
    }
}

#[cfg(not(feature = "mapbox"))]
pub fn build_map_services() -> MapServices {
    tracing::warn!("built without the mapbox feature; running offline");
    offline()
}
