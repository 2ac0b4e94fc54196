//! Distance annotation and uniform resampling of raw route points.

use crate::config::PaceNoteConfig;
use crate::models::{RawPoint, RoutePoint};
use crate::spatial::haversine_distance;

/// Annotate raw points with cumulative great-circle distance.
///
/// Missing elevation is treated as 0.
pub fn annotate_distances(points: &[RawPoint]) -> Vec<RoutePoint> {
    let mut annotated = Vec::with_capacity(points.len());
    let mut distance_m = 0.0;

    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            let prev = &points[i - 1];
            distance_m += haversine_distance(prev.lat, prev.lon, point.lat, point.lon);
        }
        annotated.push(RoutePoint {
            lat: point.lat,
            lon: point.lon,
            elevation_m: point.elevation_m.unwrap_or(0.0),
            distance_m,
        });
    }

    annotated
}

/// Resample an annotated route to points every `resample_step_m`.
///
/// Latitude, longitude and elevation are blended linearly within each original
/// segment. Returns an empty vector when the route has fewer than two points,
/// resamples to fewer than `min_resampled_points`, or the step (or route
/// length) is not a usable positive number.
pub fn resample(points: &[RoutePoint], config: &PaceNoteConfig) -> Vec<RoutePoint> {
    if points.len() < 2 {
        return Vec::new();
    }
    let step = config.resample_step_m;
    let total_m = points.last().map(|p| p.distance_m).unwrap_or(0.0);
    if !(step > 0.0 && step.is_finite() && total_m.is_finite()) {
        return Vec::new();
    }
    let count = (total_m / step).floor() as usize + 1;
    if count < config.min_resampled_points {
        return Vec::new();
    }

    let mut resampled = Vec::with_capacity(count);
    let mut segment = 0usize;

    for k in 0..count {
        let target = k as f64 * step;
        while segment + 2 < points.len() && points[segment + 1].distance_m < target {
            segment += 1;
        }
        let start = &points[segment];
        let end = &points[segment + 1];
        let span = end.distance_m - start.distance_m;
        let ratio = if span <= f64::EPSILON {
            0.0
        } else {
            ((target - start.distance_m) / span).clamp(0.0, 1.0)
        };

        resampled.push(RoutePoint {
            lat: start.lat + (end.lat - start.lat) * ratio,
            lon: start.lon + (end.lon - start.lon) * ratio,
            elevation_m: start.elevation_m + (end.elevation_m - start.elevation_m) * ratio,
            distance_m: target,
        });
    }

    resampled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::offset_by_bearing;

    fn line(length_m: f64, segments: usize) -> Vec<RawPoint> {
        (0..=segments)
            .map(|i| {
                let d = length_m * i as f64 / segments as f64;
                let (lat, lon) = offset_by_bearing(45.0, 6.0, d, 90.0);
                RawPoint::new(lat, lon).with_elevation(d / 10.0)
            })
            .collect()
    }

    #[test]
    fn distances_accumulate() {
        let annotated = annotate_distances(&line(300.0, 3));
        assert_eq!(annotated.len(), 4);
        assert_eq!(annotated[0].distance_m, 0.0);
        assert!((annotated[3].distance_m - 300.0).abs() < 0.01);
        assert!((annotated[2].elevation_m - 20.0).abs() < 1e-9);
    }

    #[test]
    fn missing_elevation_defaults_to_zero() {
        let annotated = annotate_distances(&[RawPoint::new(45.0, 6.0)]);
        assert_eq!(annotated[0].elevation_m, 0.0);
    }

    #[test]
    fn resampled_points_are_evenly_spaced() {
        let config = PaceNoteConfig::default();
        let resampled = resample(&annotate_distances(&line(100.0, 2)), &config);
        assert_eq!(resampled.len(), 34);

        for pair in resampled.windows(2) {
            let measured = haversine_distance(pair[0].lat, pair[0].lon, pair[1].lat, pair[1].lon);
            assert!((measured - 3.0).abs() < 0.01, "spacing {measured}");
            assert!(pair[1].distance_m > pair[0].distance_m);
        }
        // Elevation is blended with position: 1m per 10m.
        assert!((resampled[10].elevation_m - 3.0).abs() < 0.01);
    }

    #[test]
    fn short_or_degenerate_routes_resample_to_nothing() {
        let config = PaceNoteConfig::default();
        assert!(resample(&annotate_distances(&line(100.0, 1))[..1], &config).is_empty());
        assert!(resample(&annotate_distances(&line(20.0, 1)), &config).is_empty());
    }

    #[test]
    fn unusable_step_resamples_to_nothing() {
        let route = annotate_distances(&line(100.0, 2));
        for step in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let config = PaceNoteConfig {
                resample_step_m: step,
                ..PaceNoteConfig::default()
            };
            assert!(resample(&route, &config).is_empty(), "step {step}");
        }
    }
}
