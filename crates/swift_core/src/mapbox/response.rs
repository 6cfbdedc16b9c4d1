#[derive(serde::Deserialize)]
pub(super) struct DirectionsResponse {
    #[serde(default)]
    pub(super) code: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) routes: Vec<DirectionsRoute>,
}

#[derive(serde::Deserialize)]
pub(super) struct DirectionsRoute {
    pub(super) duration: Option<f64>,
    pub(super) geometry: Option<RouteGeometry>,
}

#[derive(serde::Deserialize)]
pub(super) struct RouteGeometry {
    /// `[lng, lat]`, optionally followed by elevation.
    #[serde(default)]
    pub(super) coordinates: Vec<Vec<f64>>,
}

#[derive(serde::Deserialize)]
pub(super) struct GeocodingResponse {
    #[serde(default)]
    pub(super) features: Vec<GeocodingFeature>,
}

#[derive(serde::Deserialize)]
pub(super) struct GeocodingFeature {
    pub(super) center: Option<[f64; 2]>,
    pub(super) place_name: Option<String>,
}
