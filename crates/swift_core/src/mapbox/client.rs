use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::credentials::Credential;
use crate::geo::Coordinate;
use crate::services::{DirectionsService, Geocoder, MapServiceError, Place, RouteFetch};

use super::parser::{parse_directions_response, parse_forward_response, parse_reverse_response};
use super::response::{DirectionsResponse, GeocodingResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub struct MapboxConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for MapboxConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl MapboxConfig {
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Thin HTTP client for the Mapbox directions and geocoding APIs.
#[derive(Debug, Clone)]
pub struct MapboxClient {
    client: Client,
    base_url: String,
}

impl MapboxClient {
    pub fn new(config: MapboxConfig) -> Result<Self, MapServiceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| {
                MapServiceError::Transport(format!("failed to build HTTP client: {err}"))
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(super) fn directions_url(
        &self,
        credential: &Credential,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Url, MapServiceError> {
        let base = format!(
            "{}/directions/v5/mapbox/driving/{},{};{},{}",
            self.base_url, from.lng, from.lat, to.lng, to.lat
        );
        let mut url = Url::parse(&base).map_err(|err| {
            MapServiceError::Transport(format!("failed to build directions URL: {err}"))
        })?;
        url.query_pairs_mut()
            .append_pair("geometries", "geojson")
            .append_pair("overview", "full")
            .append_pair("access_token", credential.as_str());
        Ok(url)
    }

    /// `query` is a free-text address or a `lng,lat` pair.
    pub(super) fn geocoding_url(
        &self,
        credential: &Credential,
        query: &str,
    ) -> Result<Url, MapServiceError> {
        let mut url = Url::parse(&self.base_url).map_err(|err| {
            MapServiceError::Transport(format!("failed to build geocoding URL: {err}"))
        })?;
        url.path_segments_mut()
            .map_err(|()| MapServiceError::Transport("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["geocoding", "v5", "mapbox.places", &format!("{query}.json")]);
        url.query_pairs_mut()
            .append_pair("access_token", credential.as_str())
            .append_pair("limit", "1");
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, MapServiceError> {
        debug!(path = url.path(), "map service request");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| MapServiceError::Transport(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(MapServiceError::Rejected);
        }
        // Directions reports NoRoute/InvalidInput with a JSON body on 4xx.
        if status.is_server_error() {
            return Err(MapServiceError::Transport(format!("status {status}")));
        }

        response
            .json::<T>()
            .map_err(|err| MapServiceError::Transport(format!("malformed response: {err}")))
    }
}

impl DirectionsService for MapboxClient {
    fn route(
        &self,
        credential: &Credential,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<RouteFetch, MapServiceError> {
        let url = self.directions_url(credential, from, to)?;
        let parsed: DirectionsResponse = self.get_json(url)?;
        parse_directions_response(parsed)
    }
}

impl Geocoder for MapboxClient {
    fn forward(&self, credential: &Credential, address: &str) -> Result<Place, MapServiceError> {
        let address = crate::services::validate_address(address)?;
        let url = self.geocoding_url(credential, address)?;
        let parsed: GeocodingResponse = self.get_json(url)?;
        parse_forward_response(parsed)
    }

    fn reverse(&self, credential: &Credential, at: Coordinate) -> Result<String, MapServiceError> {
        let url = self.geocoding_url(credential, &format!("{},{}", at.lng, at.lat))?;
        let parsed: GeocodingResponse = self.get_json(url)?;
        parse_reverse_response(parsed)
    }
}
