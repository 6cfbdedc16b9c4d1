use crate::geo::{Coordinate, GeoBounds};

/// Screen margin kept around fitted geometry.
pub const FIT_PADDING_PX: f32 = 80.0;
/// Length of the fit animation.
pub const FIT_DURATION_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitSource {
    Route,
    Markers,
}

/// Where the viewport should settle and how to get there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTarget {
    pub bounds: GeoBounds,
    pub padding_px: f32,
    pub duration_ms: u64,
    pub source: FitSource,
}

/// Fit every point of a route, or `None` for an empty one.
pub(super) fn fit_route(
    route: &[Coordinate],
    padding_px: f32,
    duration_ms: u64,
) -> Option<ViewportTarget> {
    GeoBounds::enclosing(route.iter().copied()).map(|bounds| ViewportTarget {
        bounds,
        padding_px,
        duration_ms,
        source: FitSource::Route,
    })
}

/// Fit whichever markers are defined.
pub(super) fn fit_markers<I>(points: I, padding_px: f32, duration_ms: u64) -> Option<ViewportTarget>
where
    I: IntoIterator<Item = Coordinate>,
{
    GeoBounds::enclosing(points).map(|bounds| ViewportTarget {
        bounds,
        padding_px,
        duration_ms,
        source: FitSource::Markers,
    })
}
