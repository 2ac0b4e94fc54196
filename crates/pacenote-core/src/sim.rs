//! Synthetic course builder.
//!
//! Chains straights and constant-radius arcs into a dense list of raw points,
//! the way a routing provider would deliver a finished route.

use crate::models::{Direction, RawPoint, RouteInput};
use crate::spatial::{normalize_angle_deg, offset_by_bearing};

/// Default origin (a mountain pass road in the Alps).
const ORIGIN_LAT: f64 = 45.0;
const ORIGIN_LON: f64 = 6.0;
const DEFAULT_SPACING_M: f64 = 2.0;

#[derive(Debug, Clone, Copy)]
enum Shape {
    Straight {
        length_m: f64,
    },
    Arc {
        direction: Direction,
        radius_m: f64,
        angle_deg: f64,
    },
}

impl Shape {
    fn length_m(&self) -> f64 {
        match *self {
            Shape::Straight { length_m } => length_m,
            Shape::Arc {
                radius_m,
                angle_deg,
                ..
            } => radius_m * angle_deg.to_radians(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    shape: Shape,
    rise_m: f64,
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    lat: f64,
    lon: f64,
    heading_deg: f64,
    elevation_m: f64,
}

#[derive(Debug, Clone)]
pub struct CourseBuilder {
    start: Cursor,
    spacing_m: f64,
    segments: Vec<Segment>,
    pending_rise_m: f64,
}

impl Default for CourseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseBuilder {
    /// Course starting at the default origin, heading north, at 0m elevation.
    pub fn new() -> Self {
        Self {
            start: Cursor {
                lat: ORIGIN_LAT,
                lon: ORIGIN_LON,
                heading_deg: 0.0,
                elevation_m: 0.0,
            },
            spacing_m: DEFAULT_SPACING_M,
            segments: Vec::new(),
            pending_rise_m: 0.0,
        }
    }

    pub fn starting_at(mut self, lat: f64, lon: f64, heading_deg: f64) -> Self {
        self.start.lat = lat;
        self.start.lon = lon;
        self.start.heading_deg = heading_deg;
        self
    }

    pub fn start_elevation(mut self, elevation_m: f64) -> Self {
        self.start.elevation_m = elevation_m;
        self
    }

    /// Distance between generated raw points.
    pub fn point_spacing(mut self, spacing_m: f64) -> Self {
        self.spacing_m = spacing_m.max(0.1);
        self
    }

    /// Ramp elevation by `rise_m` (negative to descend) over the next segment.
    pub fn climb(mut self, rise_m: f64) -> Self {
        self.pending_rise_m = rise_m;
        self
    }

    pub fn straight(self, length_m: f64) -> Self {
        self.push(Shape::Straight {
            length_m: length_m.max(0.0),
        })
    }

    /// Constant-radius arc turning `angle_deg` in `direction`.
    pub fn turn(self, direction: Direction, radius_m: f64, angle_deg: f64) -> Self {
        self.push(Shape::Arc {
            direction,
            radius_m: radius_m.max(0.1),
            angle_deg: angle_deg.abs(),
        })
    }

    fn push(mut self, shape: Shape) -> Self {
        self.segments.push(Segment {
            shape,
            rise_m: self.pending_rise_m,
        });
        self.pending_rise_m = 0.0;
        self
    }

    /// Total course length in meters.
    pub fn length_m(&self) -> f64 {
        self.segments.iter().map(|s| s.shape.length_m()).sum()
    }

    pub fn build(&self) -> Vec<RawPoint> {
        let mut cursor = self.start;
        let mut points =
            vec![RawPoint::new(cursor.lat, cursor.lon).with_elevation(cursor.elevation_m)];

        for segment in &self.segments {
            let length = segment.shape.length_m();
            if length <= f64::EPSILON {
                continue;
            }
            let steps = (length / self.spacing_m).ceil().max(1.0) as usize;
            let origin = cursor;

            for k in 1..=steps {
                let fraction = k as f64 / steps as f64;
                let (lat, lon, heading_deg) = match segment.shape {
                    Shape::Straight { .. } => {
                        let (lat, lon) = offset_by_bearing(
                            origin.lat,
                            origin.lon,
                            length * fraction,
                            origin.heading_deg,
                        );
                        (lat, lon, origin.heading_deg)
                    }
                    Shape::Arc {
                        direction,
                        radius_m,
                        angle_deg,
                    } => {
                        let sign = direction.sign();
                        let (center_lat, center_lon) = offset_by_bearing(
                            origin.lat,
                            origin.lon,
                            radius_m,
                            origin.heading_deg + 90.0 * sign,
                        );
                        let swept = angle_deg * fraction;
                        let from_center = origin.heading_deg - 90.0 * sign + swept * sign;
                        let (lat, lon) =
                            offset_by_bearing(center_lat, center_lon, radius_m, from_center);
                        (lat, lon, origin.heading_deg + swept * sign)
                    }
                };
                cursor = Cursor {
                    lat,
                    lon,
                    heading_deg: normalize_angle_deg(heading_deg),
                    elevation_m: origin.elevation_m + segment.rise_m * fraction,
                };
                points.push(RawPoint::new(lat, lon).with_elevation(cursor.elevation_m));
            }
        }

        points
    }

    pub fn build_route(&self) -> RouteInput {
        RouteInput::new(self.build())
    }
}
