//! Final note ordering: start and finish notes, rounding, distance-to-next.

use crate::config::PaceNoteConfig;
use crate::models::{Callout, PaceNote};

/// Merge corner and straight notes into the ordered callout list.
///
/// A Start note is placed at 0 unless the first corner begins within
/// `start_snap_m`, in which case that corner is moved to 0 and stands in for
/// it. A Finish note closes the list at `total_distance_m`. Positions are
/// clamped to the route and rounded to `rounding_step_m`.
pub fn assemble(
    corner_notes: Vec<PaceNote>,
    straight_notes: Vec<PaceNote>,
    total_distance_m: f64,
    config: &PaceNoteConfig,
) -> Vec<PaceNote> {
    let total = total_distance_m.max(0.0);
    let mut notes: Vec<PaceNote> = corner_notes.into_iter().chain(straight_notes).collect();
    sort_by_position(&mut notes);

    let snapped = notes
        .iter()
        .position(|note| matches!(note.callout, Callout::Turn(_)))
        .filter(|i| notes[*i].position_m < config.start_snap_m);
    match snapped {
        Some(i) => {
            notes[i].position_m = 0.0;
            sort_by_position(&mut notes);
        }
        None => notes.insert(0, PaceNote::start()),
    }
    notes.push(PaceNote::finish(total));

    for note in notes.iter_mut() {
        note.position_m = config.round_distance(note.position_m.clamp(0.0, total));
    }
    fill_distances(&mut notes, config);
    notes
}

/// Stable sort keeps corners ahead of straight hazards at equal positions.
fn sort_by_position(notes: &mut [PaceNote]) {
    notes.sort_by(|a, b| a.position_m.total_cmp(&b.position_m));
}

/// Set `distance_to_next_m` from rounded positions. The last note gets none.
pub fn fill_distances(notes: &mut [PaceNote], config: &PaceNoteConfig) {
    let positions: Vec<f64> = notes.iter().map(|note| note.position_m).collect();
    for (i, note) in notes.iter_mut().enumerate() {
        note.distance_to_next_m = positions
            .get(i + 1)
            .map(|next| config.round_distance(next - positions[i]));
    }
}
