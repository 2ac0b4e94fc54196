//! Spatial math for route geometry: great-circle distance, bearings and
//! local circle fitting.

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two points in meters using Haversine formula.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Initial bearing from point 1 to point 2 in degrees, normalized to (-180, 180].
/// 0 = north, 90 = east.
pub fn bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_angle_deg(x.atan2(y).to_degrees())
}

/// Wrap an angle in degrees into (-180, 180].
///
/// Applied to a bearing difference this yields the signed turn between two
/// headings: positive is clockwise (a right-hand turn).
pub fn normalize_angle_deg(angle: f64) -> f64 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Signed heading change from `from` to `to`, both in degrees.
pub fn heading_change_deg(from: f64, to: f64) -> f64 {
    normalize_angle_deg(to - from)
}

/// Offset a position by distance and bearing.
///
/// # Arguments
/// * `lat`, `lon` - Starting position in degrees
/// * `distance_m` - Distance in meters
/// * `bearing_deg` - Bearing in degrees (0 = north, 90 = east)
///
/// # Returns
/// (new_lat, new_lon) in degrees
pub fn offset_by_bearing(lat: f64, lon: f64, distance_m: f64, bearing_deg: f64) -> (f64, f64) {
    if distance_m.abs() <= f64::EPSILON {
        return (lat, lon);
    }

    let bearing_rad = bearing_deg.to_radians();
    let lat1 = lat.to_radians();
    let lon1 = lon.to_radians();
    let angular_distance = distance_m / EARTH_RADIUS_M;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing_rad.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * sin_lat2;
    let mut lon2 = lon1 + y.atan2(x);
    lon2 =
        (lon2 + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI) - std::f64::consts::PI;

    (lat2.to_degrees(), lon2.to_degrees())
}

/// Radius of the circle through three positions, in meters.
///
/// Side lengths are great-circle distances and the area comes from Heron's
/// formula, so `R = a·b·c / (4·area)`. Returns `None` when the triangle is
/// degenerate (area at or below `min_area_m2`), i.e. the points are
/// effectively collinear.
pub fn circumradius(
    p1: (f64, f64),
    p2: (f64, f64),
    p3: (f64, f64),
    min_area_m2: f64,
) -> Option<f64> {
    let a = haversine_distance(p1.0, p1.1, p2.0, p2.1);
    let b = haversine_distance(p2.0, p2.1, p3.0, p3.1);
    let c = haversine_distance(p1.0, p1.1, p3.0, p3.1);
    circumradius_from_sides(a, b, c, min_area_m2)
}

/// Circumradius from the three side lengths of a triangle.
pub fn circumradius_from_sides(a: f64, b: f64, c: f64, min_area_m2: f64) -> Option<f64> {
    if a <= f64::EPSILON || b <= f64::EPSILON || c <= f64::EPSILON {
        return None;
    }
    let s = (a + b + c) / 2.0;
    // Rounding can push the product slightly negative for collinear points.
    let area_sq = s * (s - a) * (s - b) * (s - c);
    if area_sq <= 0.0 {
        return None;
    }
    let area = area_sq.sqrt();
    if area <= min_area_m2 {
        return None;
    }
    Some(a * b * c / (4.0 * area))
}
