//! End-to-end pace note generation.

use crate::analyzer::{analyze_corner, analyze_straights};
use crate::assembler::assemble;
use crate::chicane::merge_chicanes;
use crate::config::PaceNoteConfig;
use crate::curvature::CurvatureProfile;
use crate::error::ConfigError;
use crate::models::{PaceNote, RouteInput};
use crate::resample::{annotate_distances, resample};
use crate::segmenter::detect_corners;

/// Runs the full pipeline with one validated configuration.
///
/// Generation is pure, so a single generator can be shared across threads.
#[derive(Debug, Clone)]
pub struct PaceNoteGenerator {
    config: PaceNoteConfig,
}

impl PaceNoteGenerator {
    pub fn new(config: PaceNoteConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PaceNoteConfig {
        &self.config
    }

    /// Produce the ordered notes for a route.
    ///
    /// Routes with fewer than two points, or too short to resample, yield an
    /// empty list.
    pub fn generate(&self, route: &RouteInput) -> Vec<PaceNote> {
        let span = tracing::debug_span!("pace_notes", raw_points = route.points.len());
        let _guard = span.enter();
        let config = &self.config;

        if route.points.len() < 2 {
            tracing::debug!("route too short to analyze");
            return Vec::new();
        }
        let annotated = annotate_distances(&route.points);
        let measured_m = annotated.last().map(|p| p.distance_m).unwrap_or(0.0);
        let total_m = match route.total_distance_m {
            Some(total) if total.is_finite() && total > 0.0 => total,
            _ => measured_m,
        };

        let points = resample(&annotated, config);
        if points.is_empty() {
            tracing::debug!(measured_m, "route resampled to too few points");
            return Vec::new();
        }
        let profile = CurvatureProfile::build(&points, config);
        tracing::debug!(
            resampled = points.len(),
            samples = profile.len(),
            "curvature profile built"
        );

        let corners = detect_corners(&points, &profile, config);
        let corner_notes: Vec<PaceNote> = corners
            .iter()
            .map(|corner| analyze_corner(corner, &points, &profile, config))
            .collect();
        let straight_notes = analyze_straights(&corners, &points, config);
        tracing::debug!(
            corners = corner_notes.len(),
            straight_hazards = straight_notes.len(),
            "notes analyzed"
        );

        let notes = assemble(corner_notes, straight_notes, total_m, config);
        let notes = merge_chicanes(notes, config);
        tracing::debug!(notes = notes.len(), total_m, "pace notes ready");
        notes
    }
}

impl Default for PaceNoteGenerator {
    fn default() -> Self {
        Self {
            config: PaceNoteConfig::default(),
        }
    }
}

/// Generate pace notes with the default tuning.
pub fn generate_pace_notes(route: &RouteInput) -> Vec<PaceNote> {
    PaceNoteGenerator::default().generate(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoteKind, RawPoint};

    #[test]
    fn rejects_invalid_config() {
        let config = PaceNoteConfig {
            chicane_distance_m: -1.0,
            ..PaceNoteConfig::default()
        };
        assert!(matches!(
            PaceNoteGenerator::new(config),
            Err(ConfigError::NegativeDistance {
                name: "chicane_distance_m",
                ..
            })
        ));
    }

    #[test]
    fn degenerate_routes_yield_nothing() {
        let generator = PaceNoteGenerator::default();
        assert!(generator.generate(&RouteInput::default()).is_empty());
        assert!(generator
            .generate(&RouteInput::new(vec![RawPoint::new(45.0, 6.0)]))
            .is_empty());
        // Two points 10m apart resample to 4 points.
        assert!(generator
            .generate(&RouteInput::new(vec![
                RawPoint::new(45.0, 6.0),
                RawPoint::new(45.00009, 6.0),
            ]))
            .is_empty());
    }

    #[test]
    fn provided_total_distance_wins() {
        let route = RouteInput {
            points: vec![RawPoint::new(45.0, 6.0), RawPoint::new(45.001, 6.0)],
            total_distance_m: Some(150.0),
        };
        let notes = generate_pace_notes(&route);
        let kinds: Vec<NoteKind> = notes.iter().map(PaceNote::kind).collect();
        assert_eq!(kinds, vec![NoteKind::Start, NoteKind::Finish]);
        assert_eq!(notes[1].position_m, 150.0);
    }
}
