//! Animated map camera: eases the visible bounds toward the latest fit target.

use std::time::{Duration, Instant};

use swift_core::geo::{Coordinate, GeoBounds};
use swift_core::map_sync::ViewportTarget;

use crate::ui::constants::{DEFAULT_CENTER, DEFAULT_SPAN_DEG, MIN_SPAN_DEG};

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: GeoBounds,
    to: GeoBounds,
    started: Instant,
    duration: Duration,
}

#[derive(Debug, Clone)]
pub struct Camera {
    bounds: GeoBounds,
    padding_px: f32,
    transition: Option<Transition>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            bounds: square_around(DEFAULT_CENTER, DEFAULT_SPAN_DEG),
            padding_px: 0.0,
            transition: None,
        }
    }
}

impl Camera {
    /// Start easing toward `target`, beginning from wherever the camera is now.
    pub fn fit(&mut self, target: ViewportTarget, now: Instant) {
        let from = self.bounds_at(now);
        self.bounds = from;
        self.padding_px = target.padding_px;
        self.transition = Some(Transition {
            from,
            to: with_min_span(target.bounds),
            started: now,
            duration: Duration::from_millis(target.duration_ms),
        });
    }

    /// Bounds to draw at `now`, before padding.
    pub fn bounds_at(&self, now: Instant) -> GeoBounds {
        let Some(transition) = self.transition else {
            return self.bounds;
        };
        if transition.duration.is_zero() {
            return transition.to;
        }
        let t = now.saturating_duration_since(transition.started).as_secs_f64()
            / transition.duration.as_secs_f64();
        if t >= 1.0 {
            return transition.to;
        }
        let eased = ease_in_out(t);
        GeoBounds {
            lat_min: lerp(transition.from.lat_min, transition.to.lat_min, eased),
            lat_max: lerp(transition.from.lat_max, transition.to.lat_max, eased),
            lng_min: lerp(transition.from.lng_min, transition.to.lng_min, eased),
            lng_max: lerp(transition.from.lng_max, transition.to.lng_max, eased),
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.transition
            .is_some_and(|t| now.saturating_duration_since(t.started) < t.duration)
    }

    /// Bounds to project with, grown so the fitted area keeps `padding_px`
    /// clear on every side of a `width` x `height` viewport.
    pub fn padded_bounds(&self, now: Instant, width: f32, height: f32) -> GeoBounds {
        let bounds = self.bounds_at(now);
        let pad = self.padding_px as f64;
        let inner_w = (width as f64 - 2.0 * pad).max(1.0);
        let inner_h = (height as f64 - 2.0 * pad).max(1.0);
        let lng_pad = bounds.lng_span() * pad / inner_w;
        let lat_pad = bounds.lat_span() * pad / inner_h;
        GeoBounds {
            lat_min: bounds.lat_min - lat_pad,
            lat_max: bounds.lat_max + lat_pad,
            lng_min: bounds.lng_min - lng_pad,
            lng_max: bounds.lng_max + lng_pad,
        }
    }
}

fn square_around(center: Coordinate, span_deg: f64) -> GeoBounds {
    let half = span_deg / 2.0;
    GeoBounds {
        lat_min: center.lat - half,
        lat_max: center.lat + half,
        lng_min: center.lng - half,
        lng_max: center.lng + half,
    }
}

/// A single point or a straight north-south line still needs an area.
fn with_min_span(bounds: GeoBounds) -> GeoBounds {
    let mut out = bounds;
    let center = bounds.center();
    if bounds.lat_span() < MIN_SPAN_DEG {
        out.lat_min = center.lat - MIN_SPAN_DEG / 2.0;
        out.lat_max = center.lat + MIN_SPAN_DEG / 2.0;
    }
    if bounds.lng_span() < MIN_SPAN_DEG {
        out.lng_min = center.lng - MIN_SPAN_DEG / 2.0;
        out.lng_max = center.lng + MIN_SPAN_DEG / 2.0;
    }
    out
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn ease_in_out(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use swift_core::map_sync::FitSource;

    fn target(bounds: GeoBounds) -> ViewportTarget {
        ViewportTarget {
            bounds,
            padding_px: 80.0,
            duration_ms: 1_000,
            source: FitSource::Route,
        }
    }

    #[test]
    fn fit_reaches_target_after_duration() {
        let now = Instant::now();
        let mut camera = Camera::default();
        let bounds = GeoBounds {
            lat_min: 12.93,
            lat_max: 12.98,
            lng_min: 77.59,
            lng_max: 77.63,
        };
        camera.fit(target(bounds), now);
        assert!(camera.is_animating(now + Duration::from_millis(500)));
        assert_eq!(camera.bounds_at(now + Duration::from_secs(1)), bounds);
        assert!(!camera.is_animating(now + Duration::from_secs(1)));
    }

    #[test]
    fn single_point_gets_minimum_span() {
        let now = Instant::now();
        let mut camera = Camera::default();
        let point = Coordinate::new(12.9716, 77.5946);
        camera.fit(target(GeoBounds::from_point(point)), now);
        let bounds = camera.bounds_at(now + Duration::from_secs(2));
        assert!((bounds.lat_span() - MIN_SPAN_DEG).abs() < 1e-9);
        assert!(bounds.contains(point));
    }

    #[test]
    fn padding_grows_bounds_proportionally() {
        let now = Instant::now();
        let mut camera = Camera::default();
        let bounds = GeoBounds {
            lat_min: 0.0,
            lat_max: 1.0,
            lng_min: 0.0,
            lng_max: 1.0,
        };
        camera.fit(target(bounds), now);
        let later = now + Duration::from_secs(1);
        let padded = camera.padded_bounds(later, 360.0, 360.0);
        // 80 px of padding around a 200 px inner square.
        assert!((padded.lat_min + 0.4).abs() < 1e-9);
        assert!((padded.lng_max - 1.4).abs() < 1e-9);
    }
}
