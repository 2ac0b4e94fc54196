//! Route-level statistics over a finished note list.

use crate::models::{Callout, Hazard, PaceNote};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Position of the Finish note, or of the last note.
    pub length_m: f64,
    /// Corners called, counting both halves of a chicane.
    pub corners: usize,
    pub shaped_turns: usize,
    pub chicanes: usize,
    /// Corners per grade, index 0 is grade 1.
    pub grade_counts: [usize; 6],
    pub crests: usize,
    pub dips: usize,
    pub jumps: usize,
}

impl RouteSummary {
    pub fn from_notes(notes: &[PaceNote]) -> Self {
        let mut summary = Self {
            length_m: notes.last().map(|n| n.position_m).unwrap_or(0.0),
            ..Self::default()
        };

        for note in notes {
            if let Callout::Turn(turn) = &note.callout {
                let grades = std::iter::once(turn.severity)
                    .chain(turn.chicane.as_ref().map(|link| link.severity));
                for severity in grades {
                    summary.corners += 1;
                    summary.grade_counts[usize::from(severity.grade().value() - 1)] += 1;
                    if severity.shape().is_some() {
                        summary.shaped_turns += 1;
                    }
                }
                if turn.chicane.is_some() {
                    summary.chicanes += 1;
                }
            }
            for hazard in &note.hazards {
                match hazard {
                    Hazard::Crest => summary.crests += 1,
                    Hazard::Dip => summary.dips += 1,
                    Hazard::Jump => summary.jumps += 1,
                }
            }
        }
        summary
    }

    /// Tightest grade called on the route.
    pub fn tightest_grade(&self) -> Option<u8> {
        self.grade_counts
            .iter()
            .position(|count| *count > 0)
            .map(|i| i as u8 + 1)
    }
}
