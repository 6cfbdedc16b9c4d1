use crate::geo::Coordinate;
use crate::services::{MapServiceError, Place, RouteFetch};

use super::response::{DirectionsResponse, GeocodingFeature, GeocodingResponse};

pub(super) fn parse_directions_response(
    resp: DirectionsResponse,
) -> Result<RouteFetch, MapServiceError> {
    match resp.code.as_deref() {
        None | Some("Ok") => {}
        Some("NoRoute") | Some("NoSegment") => return Err(MapServiceError::NotFound),
        Some("InvalidInput") => {
            return Err(MapServiceError::InvalidInput(
                resp.message.unwrap_or_else(|| "invalid directions input".to_string()),
            ))
        }
        Some(other) => {
            return Err(MapServiceError::Transport(format!(
                "directions service returned '{other}'"
            )))
        }
    }

    let route = resp.routes.into_iter().next().ok_or(MapServiceError::NotFound)?;

    let geometry: Vec<Coordinate> = route
        .geometry
        .map(|geometry| geometry.coordinates)
        .unwrap_or_default()
        .into_iter()
        .filter(|pair| pair.len() >= 2)
        .map(|pair| Coordinate::from_lng_lat([pair[0], pair[1]]))
        .collect();
    if geometry.is_empty() {
        return Err(MapServiceError::NotFound);
    }

    let duration_secs = route
        .duration
        .filter(|duration| duration.is_finite() && *duration >= 0.0)
        .ok_or_else(|| MapServiceError::Transport("route is missing a duration".to_string()))?;

    Ok(RouteFetch {
        geometry,
        duration_secs,
    })
}

pub(super) fn parse_forward_response(resp: GeocodingResponse) -> Result<Place, MapServiceError> {
    let feature = resp.features.into_iter().next().ok_or(MapServiceError::NotFound)?;
    let center = feature.center.ok_or(MapServiceError::NotFound)?;
    let coordinate = Coordinate::from_lng_lat(center);

    let place_name = feature_name(&feature)
        .unwrap_or_else(|| format!("{:.5}, {:.5}", coordinate.lat, coordinate.lng));

    Ok(Place {
        coordinate,
        place_name,
    })
}

pub(super) fn parse_reverse_response(resp: GeocodingResponse) -> Result<String, MapServiceError> {
    resp.features
        .first()
        .and_then(feature_name)
        .ok_or(MapServiceError::NotFound)
}

fn feature_name(feature: &GeocodingFeature) -> Option<String> {
    feature
        .place_name
        .clone()
        .filter(|name| !name.trim().is_empty())
}
