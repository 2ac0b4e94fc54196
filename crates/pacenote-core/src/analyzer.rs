//! Corner classification: severity, shape, modifiers, elevation hazards and
//! advisories for each corner candidate, plus hazard scanning on straights.

use crate::config::PaceNoteConfig;
use crate::curvature::CurvatureProfile;
use crate::models::{
    Advisory, Callout, Grade, Hazard, Modifier, PaceNote, RoutePoint, Severity, TurnCall,
    TurnShape,
};
use crate::segmenter::CornerCandidate;
use crate::spatial::{bearing_deg, heading_change_deg};

/// Outcome of the mid-corner radius comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusChange {
    pub modifier: Modifier,
    /// Mean radius over the first third of the corner's rotation.
    pub entry_radius_m: f64,
    pub exit_radius_m: f64,
}

/// Turn a corner candidate into a pace note.
pub fn analyze_corner(
    candidate: &CornerCandidate,
    points: &[RoutePoint],
    profile: &CurvatureProfile,
    config: &PaceNoteConfig,
) -> PaceNote {
    let end = candidate.end.min(points.len().saturating_sub(1));
    let start = candidate.start.min(end);

    let change = radius_change(start, end, points, profile, config);
    // Entry radius is what the driver reacts to when the corner changes.
    let radius_m = change
        .map(|c| c.entry_radius_m)
        .unwrap_or(candidate.radius_m);
    let grade = config.grade_for_radius(radius_m);
    let angle_deg = candidate.angle_deg;

    let severity = classify_shape(angle_deg, grade, config)
        .and_then(|shape| Severity::shaped(grade, shape))
        .unwrap_or_else(|| Severity::numeric(grade));

    let mut modifiers = Vec::new();
    if severity.shape().is_none() {
        modifiers.extend(length_modifier(angle_deg, grade, config));
    }
    modifiers.extend(change.map(|c| c.modifier));

    let mut note = PaceNote::new(
        candidate.position_m,
        Callout::Turn(TurnCall {
            direction: candidate.direction,
            severity,
            modifiers,
            angle_deg,
            radius_m,
            chicane: None,
        }),
    );

    let hazard = scan_elevation(&points[start..=end], config);
    if let Some(hazard) = hazard {
        note.add_hazard(hazard);
    }
    for advisory in advisories(severity, hazard) {
        note.add_advisory(advisory);
    }

    tracing::trace!(
        position = note.position_m,
        %severity,
        angle = angle_deg,
        radius = radius_m,
        "corner classified"
    );
    note
}

/// Named shape for a turn angle, only when the grade is tight enough to earn it.
pub fn classify_shape(angle_deg: f64, grade: Grade, config: &PaceNoteConfig) -> Option<TurnShape> {
    let g = grade.value();
    let slack = config.shape_angle_tolerance_deg;
    if (150.0 - slack..=180.0 + slack).contains(&angle_deg) && g <= 2 {
        Some(TurnShape::Hairpin)
    } else if (75.0 - slack..=105.0 + slack).contains(&angle_deg) && g <= 3 {
        Some(TurnShape::Square)
    } else if angle_deg > 25.0 && angle_deg < 60.0 && g <= 3 {
        Some(TurnShape::Acute)
    } else {
        None
    }
}

/// Long/Short from the total angle, with cutoffs scaled to the grade.
pub fn length_modifier(angle_deg: f64, grade: Grade, config: &PaceNoteConfig) -> Option<Modifier> {
    let cutoffs = config.length_cutoffs(grade);
    if angle_deg > cutoffs.long_deg {
        Some(Modifier::Long)
    } else if angle_deg < cutoffs.short_deg {
        Some(Modifier::Short)
    } else {
        None
    }
}

/// Compare the radius over the first and last thirds of the corner's rotation.
///
/// Each sample's radius is weighted by how much the route turns there, so
/// straight lead-ins and apex gaps carry no weight and a gentler section of
/// the corner counts in full. A change is only reported when it is at least
/// `radius_change_ratio` and moves the corner into another grade. Returns
/// `None` when the corner turns over too few samples or not consistently one
/// way.
pub fn radius_change(
    start: usize,
    end: usize,
    points: &[RoutePoint],
    profile: &CurvatureProfile,
    config: &PaceNoteConfig,
) -> Option<RadiusChange> {
    if end <= start || end >= points.len() || end >= profile.len() {
        return None;
    }
    if !turns_consistently(&points[start..=end]) {
        tracing::trace!(start, end, "radius change skipped: inconsistent direction");
        return None;
    }

    let total = profile.rotation(start, end);
    let sign = total.signum();
    let total = total.abs();
    // Heading change in the corner's direction at each sample.
    let turning: Vec<(usize, f64)> = (start..=end)
        .map(|k| (k, sign * profile.rotation(k, k)))
        .collect();
    let turning_samples = turning.iter().filter(|(_, delta)| *delta > 0.0).count();
    if total <= 0.0 || turning_samples < config.radius_change_min_points.max(3) {
        return None;
    }

    let third = total / 3.0;
    let mut turned = 0.0;
    let (mut entry, mut exit) = (WeightedMean::default(), WeightedMean::default());
    for (k, delta) in turning {
        let weight = delta.max(0.0);
        let midpoint = turned + weight / 2.0;
        turned += delta;
        if midpoint <= third {
            entry.add(profile.radius(k), weight);
        } else if midpoint >= total - third {
            exit.add(profile.radius(k), weight);
        }
    }
    let (entry, exit) = (entry.mean()?, exit.mean()?);
    let relative = (exit - entry) / entry;

    let exit_grade = config.grade_for_radius(exit);
    if exit_grade == config.grade_for_radius(entry) {
        return None;
    }
    let modifier = if relative <= -config.radius_change_ratio {
        Modifier::Tightens(exit_grade)
    } else if relative >= config.radius_change_ratio {
        Modifier::Widens(exit_grade)
    } else {
        return None;
    };
    Some(RadiusChange {
        modifier,
        entry_radius_m: entry,
        exit_radius_m: exit,
    })
}

#[derive(Debug, Default)]
struct WeightedMean {
    sum: f64,
    weight: f64,
}

impl WeightedMean {
    fn add(&mut self, value: f64, weight: f64) {
        if weight > 0.0 {
            self.sum += value * weight;
            self.weight += weight;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.weight > 0.0).then(|| self.sum / self.weight)
    }
}

/// Entry and exit bearings must fall on the same side of the chord.
fn turns_consistently(slice: &[RoutePoint]) -> bool {
    let n = slice.len();
    if n < 3 {
        return false;
    }
    let (a, b) = (&slice[0], &slice[1]);
    let (y, z) = (&slice[n - 2], &slice[n - 1]);
    let entry = bearing_deg(a.lat, a.lon, b.lat, b.lon);
    let exit = bearing_deg(y.lat, y.lon, z.lat, z.lon);
    let chord = bearing_deg(a.lat, a.lon, z.lat, z.lon);

    let into_chord = heading_change_deg(entry, chord);
    let out_of_chord = heading_change_deg(chord, exit);
    into_chord * out_of_chord > 0.0
}

/// Dominant elevation hazard anywhere along a corner.
///
/// Slides a `hazard_window_m` window over the corner in half-window strides,
/// so a short climb inside a long corner is not averaged away. A jump beats a
/// crest, which beats a dip.
pub fn scan_elevation(points: &[RoutePoint], config: &PaceNoteConfig) -> Option<Hazard> {
    let window = config.samples_for(config.hazard_window_m).max(2);
    if points.len() <= window + 1 {
        return classify_elevation(points, config, true);
    }
    let last_start = points.len() - 1 - window;
    (0..last_start)
        .step_by((window / 2).max(1))
        .chain(std::iter::once(last_start))
        .filter_map(|i| classify_elevation(&points[i..=i + window], config, true))
        .max_by_key(|hazard| hazard_rank(*hazard))
}

fn hazard_rank(hazard: Hazard) -> u8 {
    match hazard {
        Hazard::Jump => 3,
        Hazard::Crest => 2,
        Hazard::Dip => 1,
    }
}

/// Dominant elevation hazard over a run of points.
///
/// Checked in order: jump, peak (crest), valley (dip), then net slope when
/// `include_slope` is set.
pub fn classify_elevation(
    points: &[RoutePoint],
    config: &PaceNoteConfig,
    include_slope: bool,
) -> Option<Hazard> {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() >= 3 => (first, last),
        _ => return None,
    };
    let span = last.distance_m - first.distance_m;
    if span <= 0.0 {
        return None;
    }

    let (mut high, mut low) = (0usize, 0usize);
    for (i, point) in points.iter().enumerate() {
        if point.elevation_m > points[high].elevation_m {
            high = i;
        }
        if point.elevation_m < points[low].elevation_m {
            low = i;
        }
    }
    let peak = points[high].elevation_m;
    let trough = points[low].elevation_m;

    if peak - trough > config.jump_range_m && span < config.jump_span_m {
        return Some(Hazard::Jump);
    }

    let interior = |i: usize| i > 0 && i + 1 < points.len();
    if interior(high)
        && peak - first.elevation_m >= config.peak_rise_m
        && peak - last.elevation_m >= config.peak_rise_m
    {
        return Some(Hazard::Crest);
    }
    if interior(low)
        && first.elevation_m - trough >= config.peak_rise_m
        && last.elevation_m - trough >= config.peak_rise_m
    {
        return Some(Hazard::Dip);
    }

    if include_slope {
        let slope = (last.elevation_m - first.elevation_m) / span * 100.0;
        if slope > config.slope_per_100m {
            return Some(Hazard::Crest);
        }
        if slope < -config.slope_per_100m {
            return Some(Hazard::Dip);
        }
    }
    None
}

fn advisories(severity: Severity, hazard: Option<Hazard>) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    if severity.grade().value() <= 2 || severity.shape() == Some(TurnShape::Hairpin) {
        advisories.push(Advisory::Caution);
    }
    match hazard {
        Some(Hazard::Jump) => advisories.push(Advisory::HeavyBraking),
        Some(Hazard::Crest) => advisories.push(Advisory::Blind),
        _ => {}
    }
    advisories
}

/// Scan the straights between corners for jumps, crests and dips.
///
/// Sustained slope alone is not called on a straight; only shaped features are.
pub fn analyze_straights(
    corners: &[CornerCandidate],
    points: &[RoutePoint],
    config: &PaceNoteConfig,
) -> Vec<PaceNote> {
    if points.len() < 3 {
        return Vec::new();
    }
    let window = config.samples_for(config.hazard_window_m).max(2);
    let last_index = points.len() - 1;

    let mut gaps = Vec::with_capacity(corners.len() + 1);
    let mut from = 0usize;
    for corner in corners {
        if corner.start > from {
            gaps.push((from, corner.start - 1));
        }
        from = from.max(corner.end + 1);
    }
    if from < last_index {
        gaps.push((from, last_index));
    }

    let mut notes = Vec::new();
    for (gap_start, gap_end) in gaps {
        let mut i = gap_start;
        while i + window <= gap_end {
            let slice = &points[i..=i + window];
            match classify_elevation(slice, config, false) {
                Some(hazard) => {
                    let mut note = PaceNote::new(points[i].distance_m, Callout::Straight);
                    note.add_hazard(hazard);
                    match hazard {
                        Hazard::Jump => note.add_advisory(Advisory::HeavyBraking),
                        Hazard::Crest => note.add_advisory(Advisory::Blind),
                        Hazard::Dip => {}
                    }
                    notes.push(note);
                    i += window;
                }
                None => i += (window / 2).max(1),
            }
        }
    }
    notes
}
