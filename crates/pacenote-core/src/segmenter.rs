//! Corner segmentation over a curvature profile.
//!
//! Two detectors feed the candidate list:
//! - a sustained-corner state machine that follows runs of curved samples
//!   (`Scanning` -> `InCorner` -> `PendingApexCheck`), splitting on rotation
//!   reversals and bridging spurious straight blips at the apex;
//! - an instant-turn detector for abrupt turns (unrounded junctions) that are
//!   too short for the sustained detector.
//!
//! Overlapping same-direction detections are deduplicated afterwards.

use crate::config::PaceNoteConfig;
use crate::curvature::CurvatureProfile;
use crate::models::{Direction, RoutePoint};
use crate::spatial::{bearing_deg, heading_change_deg};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionSource {
    Sustained,
    Instant,
}

/// A detected corner, before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornerCandidate {
    /// First resampled index of the corner.
    pub start: usize,
    /// Last resampled index of the corner.
    pub end: usize,
    /// Distance of the turn-in point.
    pub position_m: f64,
    /// Unsigned total heading change.
    pub angle_deg: f64,
    pub direction: Direction,
    /// Mean radius of the corner core.
    pub radius_m: f64,
    pub min_radius_m: f64,
    pub source: DetectionSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CornerRun {
    start: usize,
    /// Last curved sample.
    end: usize,
    /// Rotation sign once the run has turned past the noise floor, else 0.
    sign: i8,
    /// Sample where the rotation in `sign`'s direction peaked so far.
    peak: usize,
}

impl CornerRun {
    fn new(start: usize) -> Self {
        Self {
            start,
            end: start,
            sign: 0,
            peak: start,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmenterState {
    Scanning,
    InCorner(CornerRun),
    /// Curvature dropped out; waiting to see whether it is a real exit or an apex gap.
    PendingApexCheck { run: CornerRun, straight_from: usize },
}

/// Sustained-corner state machine.
pub struct CornerSegmenter<'a> {
    points: &'a [RoutePoint],
    profile: &'a CurvatureProfile,
    config: &'a PaceNoteConfig,
    candidates: Vec<CornerCandidate>,
}

impl<'a> CornerSegmenter<'a> {
    pub fn new(
        points: &'a [RoutePoint],
        profile: &'a CurvatureProfile,
        config: &'a PaceNoteConfig,
    ) -> Self {
        Self {
            points,
            profile,
            config,
            candidates: Vec::new(),
        }
    }

    pub fn run(mut self) -> Vec<CornerCandidate> {
        let n = self.points.len().min(self.profile.len());
        let mut state = SegmenterState::Scanning;
        for i in 1..n {
            let next = self.step(state, i);
            if next != state {
                tracing::trace!(index = i, from = ?state, to = ?next, "segmenter transition");
            }
            state = next;
        }

        // Flush a corner still open at the end of the route.
        match state {
            SegmenterState::InCorner(run) | SegmenterState::PendingApexCheck { run, .. } => {
                self.register(run.start, run.end);
            }
            SegmenterState::Scanning => {}
        }
        self.candidates
    }

    fn step(&mut self, state: SegmenterState, i: usize) -> SegmenterState {
        let curved = self.is_curved(i);
        match state {
            SegmenterState::Scanning => {
                if curved {
                    SegmenterState::InCorner(self.open_run(i, i))
                } else {
                    SegmenterState::Scanning
                }
            }
            SegmenterState::InCorner(run) => {
                if !curved {
                    return SegmenterState::PendingApexCheck {
                        run,
                        straight_from: i,
                    };
                }
                let run = self.extend(run, i);
                match self.rotation_reversal(run) {
                    Some(split) => {
                        self.register(run.start, split);
                        SegmenterState::InCorner(self.open_run((split + 1).min(i), i))
                    }
                    None => SegmenterState::InCorner(run),
                }
            }
            SegmenterState::PendingApexCheck { run, straight_from } => {
                if curved {
                    // Curvature resumed inside the apex gap.
                    let resumed = self.extend(run, i);
                    return match self.rotation_reversal(resumed) {
                        Some(split) => {
                            self.register(run.start, split.min(run.end));
                            SegmenterState::InCorner(self.open_run((split + 1).min(i), i))
                        }
                        None => SegmenterState::InCorner(resumed),
                    };
                }
                let straight_len = i + 1 - straight_from;
                if straight_len < self.required_straight(run) {
                    return state;
                }
                if self.looks_like_half_turn(run)
                    && self.resumes_same_direction(run, straight_from)
                {
                    return state;
                }
                self.register(run.start, run.end);
                SegmenterState::Scanning
            }
        }
    }

    fn is_curved(&self, i: usize) -> bool {
        self.profile.radius(i) < self.config.curved_radius_m
    }

    /// Straight samples needed to end a corner: tighter corners need longer
    /// runs because a brief straight blip often shows up right at the apex.
    fn required_straight(&self, run: CornerRun) -> usize {
        let grade = self
            .config
            .grade_for_radius(self.profile.min_radius(run.start, run.end))
            .value();
        let distance = match grade {
            1 | 2 => self.config.apex_straight_tight_m,
            3 | 4 => self.config.apex_straight_medium_m,
            _ => self.config.apex_straight_gentle_m,
        };
        self.config.samples_for(distance)
    }

    /// Run over `start..=end`, tracked sample by sample.
    fn open_run(&self, start: usize, end: usize) -> CornerRun {
        (start..=end).fold(CornerRun::new(start), |run, k| self.track(run, k))
    }

    /// Extend `run` through `to`, including any apex gap since its last sample.
    fn extend(&self, run: CornerRun, to: usize) -> CornerRun {
        (run.end + 1..=to).fold(run, |run, k| self.track(run, k))
    }

    /// Advance the run to sample `k`. The direction is set the first time the
    /// accumulated rotation clears the noise floor; after that the peak in
    /// that direction is kept up to date.
    fn track(&self, mut run: CornerRun, k: usize) -> CornerRun {
        run.end = k;
        let accumulated = self.profile.rotation(run.start, k);
        if run.sign == 0 {
            if accumulated.abs() >= self.config.direction_noise_deg {
                run.sign = if accumulated > 0.0 { 1 } else { -1 };
                run.peak = k;
            }
        } else {
            let sign = f64::from(run.sign);
            if sign * accumulated > sign * self.profile.rotation(run.start, run.peak) {
                run.peak = k;
            }
        }
        run
    }

    /// Detect a rotation reversal (e.g. an S-bend) inside the run.
    ///
    /// Once the rotation so far has fallen back from its peak by the noise
    /// floor, the route has turned the other way. Returns the last sample
    /// consistent with the original direction, i.e. where the rotation peaked.
    fn rotation_reversal(&self, run: CornerRun) -> Option<usize> {
        if run.sign == 0 {
            return None;
        }
        let sign = f64::from(run.sign);
        let best = sign * self.profile.rotation(run.start, run.peak);
        let so_far = sign * self.profile.rotation(run.start, run.end);
        (best - so_far >= self.config.direction_noise_deg).then_some(run.peak)
    }

    /// Roughly half of a right angle at a tight radius.
    fn looks_like_half_turn(&self, run: CornerRun) -> bool {
        let angle = self.profile.rotation(run.start, run.end).abs();
        let min_radius = self.profile.min_radius(run.start, run.end);
        angle >= self.config.half_turn_min_deg
            && angle <= self.config.half_turn_max_deg
            && self.config.grade_for_radius(min_radius).value() <= 3
    }

    /// Whether curvature turning the same way as the run resumes within the
    /// lookahead distance of the gap start.
    fn resumes_same_direction(&self, run: CornerRun, gap_start: usize) -> bool {
        let n = self.profile.len();
        let lookahead = self.config.samples_for(self.config.half_turn_lookahead_m);
        let sign = self.profile.rotation(run.start, run.end).signum();

        let horizon = (gap_start + lookahead).min(n);
        let Some(resume) = (gap_start..horizon).find(|j| self.is_curved(*j)) else {
            return false;
        };
        let ahead = self.profile.rotation(resume, (resume + lookahead).min(n - 1));
        ahead.signum() == sign && ahead.abs() >= self.config.direction_noise_deg
    }

    fn register(&mut self, start: usize, end: usize) {
        if end < start {
            return;
        }
        if let Some(candidate) = build_candidate(
            self.points,
            self.profile,
            self.config,
            start,
            end,
            DetectionSource::Sustained,
        ) {
            tracing::trace!(
                start,
                end,
                angle = candidate.angle_deg,
                radius = candidate.radius_m,
                "sustained corner"
            );
            self.candidates.push(candidate);
        }
    }
}

/// Build a candidate for `start..=end` if it turns enough to matter.
fn build_candidate(
    points: &[RoutePoint],
    profile: &CurvatureProfile,
    config: &PaceNoteConfig,
    start: usize,
    end: usize,
    source: DetectionSource,
) -> Option<CornerCandidate> {
    let rotation = profile.rotation(start, end);
    let min_radius = profile.min_radius(start, end);
    let min_angle = if config.is_tight_radius(min_radius) {
        config.min_tight_corner_angle_deg
    } else {
        config.min_corner_angle_deg
    };
    if rotation.abs() < min_angle {
        return None;
    }
    let direction = Direction::from_turn(rotation)?;
    let radius_m = profile.core_radius(start, end, config.core_radius_factor);
    let turn_in = turn_in_index(profile, config, start, end, radius_m, min_radius);

    Some(CornerCandidate {
        start,
        end,
        position_m: points[turn_in].distance_m,
        angle_deg: rotation.abs(),
        direction,
        radius_m,
        min_radius_m: min_radius,
        source,
    })
}

/// Where the driver should begin reacting to the corner.
///
/// Tight corners (grade 1-2) turn in where the radius first comes within
/// `turn_in_tight_ratio` of the minimum, medium corners (3-4) where it comes
/// within `turn_in_medium_ratio` of the average. Gentle corners use the
/// detection start.
pub fn turn_in_index(
    profile: &CurvatureProfile,
    config: &PaceNoteConfig,
    start: usize,
    end: usize,
    radius_m: f64,
    min_radius_m: f64,
) -> usize {
    let limit = match config.grade_for_radius(radius_m).value() {
        1 | 2 => min_radius_m * (1.0 + config.turn_in_tight_ratio),
        3 | 4 => radius_m * (1.0 + config.turn_in_medium_ratio),
        _ => return start,
    };
    (start..=end)
        .find(|i| profile.radius(*i) <= limit)
        .unwrap_or(start)
}

/// Abrupt turns: a large heading change between short chords either side of
/// a point with a tight local radius.
pub fn detect_instant_turns(
    points: &[RoutePoint],
    profile: &CurvatureProfile,
    config: &PaceNoteConfig,
) -> Vec<CornerCandidate> {
    let reach = config.instant_turn_lookaround.max(1);
    let n = points.len().min(profile.len());
    let mut candidates = Vec::new();
    if n <= 2 * reach {
        return candidates;
    }

    // Best (index, turn) within the current cluster of triggering samples.
    let mut cluster: Option<(usize, f64)> = None;
    for i in reach..n - reach {
        let before = bearing_deg(
            points[i - reach].lat,
            points[i - reach].lon,
            points[i].lat,
            points[i].lon,
        );
        let after = bearing_deg(
            points[i].lat,
            points[i].lon,
            points[i + reach].lat,
            points[i + reach].lon,
        );
        let turn = heading_change_deg(before, after);
        let triggers = turn.abs() > config.instant_turn_angle_deg
            && profile.radius(i) < config.instant_turn_radius_m;

        if triggers {
            cluster = match cluster {
                Some((_, best)) if best.abs() >= turn.abs() => cluster,
                _ => Some((i, turn)),
            };
            continue;
        }
        if let Some((apex, turn)) = cluster.take() {
            candidates.extend(instant_candidate(points, profile, reach, apex, turn));
        }
    }
    if let Some((apex, turn)) = cluster {
        candidates.extend(instant_candidate(points, profile, reach, apex, turn));
    }
    candidates
}

fn instant_candidate(
    points: &[RoutePoint],
    profile: &CurvatureProfile,
    reach: usize,
    apex: usize,
    turn: f64,
) -> Option<CornerCandidate> {
    let direction = Direction::from_turn(turn)?;
    let start = apex - reach;
    let radius_m = profile.radius(apex);
    tracing::trace!(apex, turn, radius = radius_m, "instant turn");
    Some(CornerCandidate {
        start,
        end: apex + reach,
        position_m: points[start].distance_m,
        angle_deg: turn.abs(),
        direction,
        radius_m,
        min_radius_m: radius_m,
        source: DetectionSource::Instant,
    })
}

/// Pool detections, sort by position and collapse same-direction candidates
/// within `dedup_window_m`, keeping the more informative reading: the larger
/// angle, or the tighter radius when the angles tie.
pub fn deduplicate(
    mut candidates: Vec<CornerCandidate>,
    config: &PaceNoteConfig,
) -> Vec<CornerCandidate> {
    candidates.sort_by(|a, b| {
        a.position_m
            .total_cmp(&b.position_m)
            .then_with(|| a.start.cmp(&b.start))
    });

    let mut kept: Vec<CornerCandidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if let Some(last) = kept.last_mut() {
            let close = (candidate.position_m - last.position_m).abs() <= config.dedup_window_m;
            if close && candidate.direction == last.direction {
                if more_informative(&candidate, last) {
                    *last = candidate;
                }
                continue;
            }
        }
        kept.push(candidate);
    }
    kept
}

fn more_informative(candidate: &CornerCandidate, current: &CornerCandidate) -> bool {
    match candidate.angle_deg.total_cmp(&current.angle_deg) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => candidate.radius_m < current.radius_m,
    }
}

/// Run both detectors and deduplicate.
pub fn detect_corners(
    points: &[RoutePoint],
    profile: &CurvatureProfile,
    config: &PaceNoteConfig,
) -> Vec<CornerCandidate> {
    let sustained = CornerSegmenter::new(points, profile, config).run();
    let instant = detect_instant_turns(points, profile, config);
    tracing::debug!(
        sustained = sustained.len(),
        instant = instant.len(),
        "corner candidates"
    );

    let mut pooled = sustained;
    pooled.extend(instant);
    deduplicate(pooled, config)
}
