//! Route documents accepted on the command line.
//!
//! Three shapes are understood:
//! - the native `{ "points": [{lat, lon, elevation_m?}], "total_distance_m"? }`
//! - a GeoJSON `LineString` geometry
//! - a bare coordinate array `[[lon, lat, ele?], ...]` as returned by most
//!   routing providers

use anyhow::{bail, Context, Result};
use pacenote_core::{RawPoint, RouteInput};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RouteDocument {
    Native(RouteInput),
    LineString(LineString),
    Coordinates(Vec<Vec<f64>>),
}

#[derive(Debug, Deserialize)]
struct LineString {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<Vec<f64>>,
}

/// Parse a route document into pipeline input.
pub fn parse_route(json: &str) -> Result<RouteInput> {
    let document: RouteDocument =
        serde_json::from_str(json).context("route document is not a recognised format")?;

    let route = match document {
        RouteDocument::Native(route) => route,
        RouteDocument::LineString(line) => {
            if line.kind != "LineString" {
                bail!("expected a LineString geometry, got {}", line.kind);
            }
            RouteInput::new(from_coordinates(&line.coordinates)?)
        }
        RouteDocument::Coordinates(coordinates) => RouteInput::new(from_coordinates(&coordinates)?),
    };

    if let Some(bad) = route
        .points
        .iter()
        .position(|p| !(-90.0..=90.0).contains(&p.lat) || !(-180.0..=180.0).contains(&p.lon))
    {
        bail!("point {bad} is outside valid latitude/longitude range");
    }
    Ok(route)
}

/// GeoJSON order: longitude first.
fn from_coordinates(coordinates: &[Vec<f64>]) -> Result<Vec<RawPoint>> {
    coordinates
        .iter()
        .enumerate()
        .map(|(i, coordinate)| match coordinate.as_slice() {
            [lon, lat] => Ok(RawPoint::new(*lat, *lon)),
            [lon, lat, elevation] => Ok(RawPoint::new(*lat, *lon).with_elevation(*elevation)),
            other => bail!("coordinate {i} has {} values, expected 2 or 3", other.len()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_document() {
        let route = parse_route(
            r#"{"points": [{"lat": 45.0, "lon": 6.0, "elevation_m": 1200.0},
                           {"lat": 45.001, "lon": 6.0}],
                "total_distance_m": 111.0}"#,
        )
        .unwrap();
        assert_eq!(route.points.len(), 2);
        assert_eq!(route.points[0].elevation_m, Some(1200.0));
        assert_eq!(route.points[1].elevation_m, None);
        assert_eq!(route.total_distance_m, Some(111.0));
    }

    #[test]
    fn coordinate_array_is_lon_lat() {
        let route = parse_route("[[6.0, 45.0], [6.001, 45.0, 850.5]]").unwrap();
        assert_eq!(route.points[0].lat, 45.0);
        assert_eq!(route.points[0].lon, 6.0);
        assert_eq!(route.points[1].elevation_m, Some(850.5));
        assert_eq!(route.total_distance_m, None);
    }

    #[test]
    fn line_string_geometry() {
        let route = parse_route(
            r#"{"type": "LineString", "coordinates": [[6.0, 45.0, 10.0], [6.0, 45.002, 12.0]]}"#,
        )
        .unwrap();
        assert_eq!(route.points.len(), 2);
        assert!(parse_route(r#"{"type": "Point", "coordinates": [[6.0, 45.0]]}"#).is_err());
    }

    #[test]
    fn rejects_malformed_coordinates() {
        assert!(parse_route("[[6.0]]").is_err());
        assert!(parse_route("[[6.0, 95.0]]").is_err());
        assert!(parse_route("{\"nope\": true}").is_err());
    }
}
