//! Coordinate primitives shared by the simulator and the map layer.
//!
//! Coordinates are plain `(lat, lng)` degrees with no range validation. All
//! math here is flat-earth: fine at city scale, not geodesically correct.

use serde::{Deserialize, Serialize};

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build from a `[lng, lat]` pair as returned by GeoJSON payloads.
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[1],
            lng: pair[0],
        }
    }

    /// Componentwise linear interpolation: `self + (end - self) * t`.
    pub fn lerp(self, end: Coordinate, t: f64) -> Coordinate {
        Coordinate {
            lat: self.lat + (end.lat - self.lat) * t,
            lng: self.lng + (end.lng - self.lng) * t,
        }
    }

    pub fn offset(self, d_lat: f64, d_lng: f64) -> Coordinate {
        Coordinate {
            lat: self.lat + d_lat,
            lng: self.lng + d_lng,
        }
    }

    /// Largest per-axis difference in degrees.
    pub fn max_axis_delta(self, other: Coordinate) -> f64 {
        (self.lat - other.lat)
            .abs()
            .max((self.lng - other.lng).abs())
    }
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl GeoBounds {
    pub fn from_point(point: Coordinate) -> Self {
        Self {
            lat_min: point.lat,
            lat_max: point.lat,
            lng_min: point.lng,
            lng_max: point.lng,
        }
    }

    pub fn extend(&mut self, point: Coordinate) {
        self.lat_min = self.lat_min.min(point.lat);
        self.lat_max = self.lat_max.max(point.lat);
        self.lng_min = self.lng_min.min(point.lng);
        self.lng_max = self.lng_max.max(point.lng);
    }

    /// Bounds of all points, or `None` when the iterator is empty.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(iter.next()?);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.lat_min + self.lat_max) * 0.5,
            (self.lng_min + self.lng_max) * 0.5,
        )
    }

    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    pub fn lng_span(&self) -> f64 {
        self.lng_max - self.lng_min
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        (self.lat_min..=self.lat_max).contains(&point.lat)
            && (self.lng_min..=self.lng_max).contains(&point.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_is_componentwise() {
        let start = Coordinate::new(10.0, 20.0);
        let end = Coordinate::new(12.0, 16.0);
        let mid = start.lerp(end, 0.25);
        assert_eq!(mid, Coordinate::new(10.5, 19.0));
    }

    #[test]
    fn from_lng_lat_swaps_order() {
        let point = Coordinate::from_lng_lat([77.5946, 12.9716]);
        assert_eq!(point.lat, 12.9716);
        assert_eq!(point.lng, 77.5946);
    }

    #[test]
    fn enclosing_bounds_cover_every_point() {
        let points = [
            Coordinate::new(12.9716, 77.5946),
            Coordinate::new(12.9352, 77.6245),
            Coordinate::new(12.95, 77.60),
        ];
        let bounds = GeoBounds::enclosing(points).expect("non-empty");
        assert_eq!(bounds.lat_min, 12.9352);
        assert_eq!(bounds.lat_max, 12.9716);
        assert_eq!(bounds.lng_min, 77.5946);
        assert_eq!(bounds.lng_max, 77.6245);
        assert!(points.iter().all(|p| bounds.contains(*p)));
        assert!(GeoBounds::enclosing(std::iter::empty()).is_none());
    }
}
