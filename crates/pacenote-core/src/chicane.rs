//! Chicane merging: two closely spaced corners are called as one.

use crate::assembler::fill_distances;
use crate::config::PaceNoteConfig;
use crate::models::{Callout, ChicaneLink, PaceNote};

/// Fold adjacent corner pairs into compound "A into B" callouts.
///
/// The merged note keeps the first corner's position and carries the second
/// corner as a [`ChicaneLink`]. A merged note never absorbs a third corner.
pub fn merge_chicanes(notes: Vec<PaceNote>, config: &PaceNoteConfig) -> Vec<PaceNote> {
    let mut merged = Vec::with_capacity(notes.len());
    let mut count = 0usize;
    let mut iter = notes.into_iter().peekable();

    while let Some(mut note) = iter.next() {
        if let Some(second) = iter.next_if(|next| can_merge(&note, next, config)) {
            absorb(&mut note, second);
            count += 1;
        }
        merged.push(note);
    }

    if count > 0 {
        fill_distances(&mut merged, config);
    }
    tracing::debug!(chicanes = count, "chicane merge");
    merged
}

/// Whether `second` may be called together with `first`.
pub fn can_merge(first: &PaceNote, second: &PaceNote, config: &PaceNoteConfig) -> bool {
    let (Some(a), Some(b)) = (first.turn(), second.turn()) else {
        return false;
    };
    if a.chicane.is_some() || b.chicane.is_some() {
        return false;
    }
    let (grade_a, grade_b) = (a.severity.grade(), b.severity.grade());
    // Grade 1 always gets its own callout.
    if grade_a.value() == 1 || grade_b.value() == 1 {
        return false;
    }
    let gap = second.position_m - first.position_m;
    gap >= 0.0
        && gap <= config.chicane_distance_m
        && grade_a.diff(grade_b) <= config.chicane_max_grade_gap
}

fn absorb(first: &mut PaceNote, second: PaceNote) {
    let PaceNote {
        position_m,
        callout,
        hazards,
        advisories,
        ..
    } = second;
    for hazard in hazards {
        first.add_hazard(hazard);
    }
    for advisory in advisories {
        first.add_advisory(advisory);
    }
    if let (Some(turn), Callout::Turn(absorbed)) = (first.turn_mut(), callout) {
        turn.chicane = Some(ChicaneLink {
            direction: absorbed.direction,
            severity: absorbed.severity,
            modifiers: absorbed.modifiers,
            position_m,
        });
    }
}
