//! Tuning values for the pace note pipeline.
//!
//! Every threshold is empirical; keep them here rather than in the stages so
//! alternate tunings can be injected without recompiling.

use crate::error::ConfigError;
use crate::models::Grade;
use serde::{Deserialize, Serialize};

/// Long/Short cutoffs on total turn angle for one band of grades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthCutoffs {
    /// Turns above this angle are called "Long"
    pub long_deg: f64,
    /// Turns below this angle are called "Short"
    pub short_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaceNoteConfig {
    // Resampling
    /// Spacing of the uniformly resampled route in meters
    pub resample_step_m: f64,
    /// Routes resampling to fewer points are too short to analyze
    pub min_resampled_points: usize,

    // Curvature
    /// Half-widths of the circle-fit windows in meters
    pub curvature_windows_m: Vec<f64>,
    /// Radius reported for effectively straight samples
    pub straight_radius_m: f64,
    /// Triangles with less area than this are treated as collinear
    pub collinear_area_m2: f64,

    // Segmentation
    /// Samples tighter than this radius are "curved" (grade 6 boundary)
    pub curved_radius_m: f64,
    /// Upper radius bound for grades 1 through 6
    pub severity_bounds_m: [f64; 6],
    /// Rotation needed to establish a corner's direction, and the pull-back
    /// from its peak that counts as a reversal
    pub direction_noise_deg: f64,
    /// Straight run that ends a grade 1-2 corner
    pub apex_straight_tight_m: f64,
    /// Straight run that ends a grade 3-4 corner
    pub apex_straight_medium_m: f64,
    /// Straight run that ends a grade 5-6 corner
    pub apex_straight_gentle_m: f64,
    /// Angle range that looks like half of a right-angle turn
    pub half_turn_min_deg: f64,
    pub half_turn_max_deg: f64,
    /// How far past an apex gap to look for the rest of a corner
    pub half_turn_lookahead_m: f64,
    /// Minimum heading change for a corner to be registered
    pub min_corner_angle_deg: f64,
    /// Minimum heading change for corners at grade 1-2 radius
    pub min_tight_corner_angle_deg: f64,
    /// Slack on the closed angle ranges of Hairpin and Square; summed
    /// heading changes land a hair past 180 on a clean U-turn
    pub shape_angle_tolerance_deg: f64,

    // Instant turns
    /// Samples looked back and ahead when measuring an abrupt heading change
    pub instant_turn_lookaround: usize,
    pub instant_turn_angle_deg: f64,
    pub instant_turn_radius_m: f64,
    /// Same-direction candidates closer than this are one corner
    pub dedup_window_m: f64,

    // Corner analysis
    /// Relative radius change between first and last third for tightens/widens
    pub radius_change_ratio: f64,
    /// Radius-change analysis needs at least this many turning samples
    pub radius_change_min_points: usize,
    /// Tight corners turn in where radius is within this ratio of the minimum
    pub turn_in_tight_ratio: f64,
    /// Medium corners turn in where radius is within this ratio of the average
    pub turn_in_medium_ratio: f64,
    /// Samples up to this multiple of the minimum radius form the corner core
    pub core_radius_factor: f64,
    /// Length cutoffs for grades 1-2
    pub length_tight: LengthCutoffs,
    /// Length cutoffs for grades 3-4
    pub length_medium: LengthCutoffs,
    /// Length cutoffs for grades 5-6
    pub length_gentle: LengthCutoffs,

    // Elevation
    /// Elevation range that makes a short stretch a jump
    pub jump_range_m: f64,
    /// Jumps must happen within this distance
    pub jump_span_m: f64,
    /// Net slope (per 100m) that counts as crest (up) or dip (down)
    pub slope_per_100m: f64,
    /// Minimum rise and fall around an interior peak (or valley)
    pub peak_rise_m: f64,
    /// Window slid along corners and straights when looking for elevation hazards
    pub hazard_window_m: f64,

    // Assembly
    /// A first corner closer than this to the start replaces the Start note
    pub start_snap_m: f64,
    /// Positions and distances are rounded to this step
    pub rounding_step_m: f64,
    /// Maximum spacing of two notes merged into a chicane
    pub chicane_distance_m: f64,
    /// Maximum grade difference within a chicane
    pub chicane_max_grade_gap: u8,
}

impl Default for PaceNoteConfig {
    fn default() -> Self {
        Self {
            resample_step_m: 3.0,
            min_resampled_points: 10,
            curvature_windows_m: vec![5.0, 10.0, 15.0, 20.0],
            straight_radius_m: 10_000.0,
            collinear_area_m2: 0.01,
            curved_radius_m: 500.0,
            severity_bounds_m: [25.0, 50.0, 80.0, 130.0, 250.0, 500.0],
            direction_noise_deg: 10.0,
            apex_straight_tight_m: 18.0,
            apex_straight_medium_m: 12.0,
            apex_straight_gentle_m: 6.0,
            half_turn_min_deg: 35.0,
            half_turn_max_deg: 55.0,
            half_turn_lookahead_m: 30.0,
            min_corner_angle_deg: 15.0,
            min_tight_corner_angle_deg: 8.0,
            shape_angle_tolerance_deg: 2.0,
            instant_turn_lookaround: 3,
            instant_turn_angle_deg: 60.0,
            instant_turn_radius_m: 100.0,
            dedup_window_m: 20.0,
            radius_change_ratio: 0.2,
            radius_change_min_points: 9,
            turn_in_tight_ratio: 0.3,
            turn_in_medium_ratio: 0.2,
            core_radius_factor: 2.0,
            length_tight: LengthCutoffs {
                long_deg: 110.0,
                short_deg: 35.0,
            },
            length_medium: LengthCutoffs {
                long_deg: 75.0,
                short_deg: 20.0,
            },
            length_gentle: LengthCutoffs {
                long_deg: 45.0,
                short_deg: 15.0,
            },
            jump_range_m: 10.0,
            jump_span_m: 50.0,
            slope_per_100m: 5.0,
            peak_rise_m: 2.0,
            hazard_window_m: 45.0,
            start_snap_m: 50.0,
            rounding_step_m: 10.0,
            chicane_distance_m: 40.0,
            chicane_max_grade_gap: 3,
        }
    }
}

impl PaceNoteConfig {
    /// Parse a (possibly partial) JSON tuning document over the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.resample_step_m > 0.0) {
            return Err(ConfigError::NonPositiveStep(self.resample_step_m));
        }
        if self.curvature_windows_m.is_empty() {
            return Err(ConfigError::NoCurvatureWindows);
        }
        if let Some(&window) = self.curvature_windows_m.iter().find(|w| !(**w > 0.0)) {
            return Err(ConfigError::NonPositiveWindow(window));
        }
        let bounds = self.severity_bounds_m;
        if !(bounds[0] > 0.0) || bounds.windows(2).any(|pair| !(pair[0] < pair[1])) {
            return Err(ConfigError::UnorderedSeverityBounds(bounds));
        }
        if self.curved_radius_m > self.straight_radius_m {
            return Err(ConfigError::CurvedAboveSentinel {
                curved: self.curved_radius_m,
                straight: self.straight_radius_m,
            });
        }
        for (name, value) in [
            ("radius_change_ratio", self.radius_change_ratio),
            ("turn_in_tight_ratio", self.turn_in_tight_ratio),
            ("turn_in_medium_ratio", self.turn_in_medium_ratio),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::RatioOutOfRange { name, value });
            }
        }
        for (name, value) in [
            ("dedup_window_m", self.dedup_window_m),
            ("start_snap_m", self.start_snap_m),
            ("chicane_distance_m", self.chicane_distance_m),
            ("half_turn_lookahead_m", self.half_turn_lookahead_m),
            ("apex_straight_gentle_m", self.apex_straight_gentle_m),
            ("jump_span_m", self.jump_span_m),
            ("hazard_window_m", self.hazard_window_m),
            ("shape_angle_tolerance_deg", self.shape_angle_tolerance_deg),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeDistance { name, value });
            }
        }
        if self.half_turn_min_deg > self.half_turn_max_deg {
            return Err(ConfigError::InvertedRange {
                min: self.half_turn_min_deg,
                max: self.half_turn_max_deg,
            });
        }
        Ok(())
    }

    /// McRae grade for a turning radius. Anything at or beyond the grade 6
    /// bound is still reported as a 6.
    pub fn grade_for_radius(&self, radius_m: f64) -> Grade {
        let index = self
            .severity_bounds_m
            .iter()
            .position(|bound| radius_m < *bound)
            .unwrap_or(5);
        Grade::new(index as u8 + 1).unwrap_or(Grade::FLATTEST)
    }

    /// Whether a radius falls in grade 1 or 2.
    pub fn is_tight_radius(&self, radius_m: f64) -> bool {
        radius_m < self.severity_bounds_m[1]
    }

    /// Number of resampled steps covering `distance_m`, at least one.
    pub fn samples_for(&self, distance_m: f64) -> usize {
        ((distance_m / self.resample_step_m).round() as usize).max(1)
    }

    pub fn length_cutoffs(&self, grade: Grade) -> LengthCutoffs {
        match grade.value() {
            1 | 2 => self.length_tight,
            3 | 4 => self.length_medium,
            _ => self.length_gentle,
        }
    }

    /// Round a distance to the callout step.
    pub fn round_distance(&self, distance_m: f64) -> f64 {
        if self.rounding_step_m <= 0.0 {
            return distance_m;
        }
        (distance_m / self.rounding_step_m).round() * self.rounding_step_m
    }
}
