//! Multi-window curvature profile of a resampled route.
//!
//! Small windows resolve sharp apexes, large windows ride over GPS noise on
//! gentle bends. The tightest valid estimate wins.

use crate::config::PaceNoteConfig;
use crate::models::RoutePoint;
use crate::spatial::{bearing_deg, circumradius, heading_change_deg};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvatureSample {
    pub index: usize,
    /// Estimated turning radius; `straight_radius_m` when nothing fit.
    pub radius_m: f64,
    /// Travel bearing toward the next point, in (-180, 180].
    pub bearing_deg: f64,
}

/// Curvature samples for every resampled point.
#[derive(Debug, Clone, Default)]
pub struct CurvatureProfile {
    pub samples: Vec<CurvatureSample>,
    /// Running sum of signed heading change, `cumulative_turn[i]` covers `0..=i`.
    cumulative_turn: Vec<f64>,
}

impl CurvatureProfile {
    pub fn build(points: &[RoutePoint], config: &PaceNoteConfig) -> Self {
        let mut windows: Vec<usize> = config
            .curvature_windows_m
            .iter()
            .map(|window| config.samples_for(*window))
            .collect();
        windows.sort_unstable();
        windows.dedup();

        let n = points.len();
        let mut samples = Vec::with_capacity(n);
        let mut last_bearing = 0.0;

        for i in 0..n {
            let bearing = if i + 1 < n {
                let (a, b) = (&points[i], &points[i + 1]);
                bearing_deg(a.lat, a.lon, b.lat, b.lon)
            } else {
                last_bearing
            };
            last_bearing = bearing;

            let radius_m = windows
                .iter()
                .filter(|w| i >= **w && i + **w < n)
                .filter_map(|w| {
                    circumradius(
                        points[i - w].position(),
                        points[i].position(),
                        points[i + w].position(),
                        config.collinear_area_m2,
                    )
                })
                .fold(config.straight_radius_m, f64::min);

            samples.push(CurvatureSample {
                index: i,
                radius_m,
                bearing_deg: bearing,
            });
        }

        let mut cumulative_turn = Vec::with_capacity(n);
        let mut total = 0.0;
        for i in 0..n {
            if i > 0 {
                total += heading_change_deg(samples[i - 1].bearing_deg, samples[i].bearing_deg);
            }
            cumulative_turn.push(total);
        }

        Self {
            samples,
            cumulative_turn,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn radius(&self, index: usize) -> f64 {
        self.samples[index].radius_m
    }

    /// Accumulated signed heading change over `start..=end`.
    pub fn rotation(&self, start: usize, end: usize) -> f64 {
        if end < start || end >= self.cumulative_turn.len() {
            return 0.0;
        }
        let before = if start == 0 {
            0.0
        } else {
            self.cumulative_turn[start - 1]
        };
        self.cumulative_turn[end] - before
    }

    pub fn min_radius(&self, start: usize, end: usize) -> f64 {
        self.samples[start..=end]
            .iter()
            .map(|s| s.radius_m)
            .fold(f64::INFINITY, f64::min)
    }

    /// Mean radius of the corner core: samples within `core_radius_factor`
    /// of the minimum. Lead-in samples on the straight would otherwise drag
    /// the average far above what the driver experiences.
    pub fn core_radius(&self, start: usize, end: usize, core_factor: f64) -> f64 {
        let min = self.min_radius(start, end);
        let limit = min * core_factor.max(1.0);
        let (sum, count) = self.samples[start..=end]
            .iter()
            .filter(|s| s.radius_m <= limit)
            .fold((0.0, 0usize), |(sum, count), s| (sum + s.radius_m, count + 1));
        if count == 0 {
            min
        } else {
            sum / count as f64
        }
    }
}
