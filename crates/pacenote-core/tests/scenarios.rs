//! End-to-end pace note scenarios on synthetic courses.
//!
//! Run with: cargo test -p pacenote-core --test scenarios

use pacenote_core::sim::CourseBuilder;
use pacenote_core::Direction::{Left, Right};
use pacenote_core::{
    generate_pace_notes, Advisory, Callout, Hazard, Modifier, NoteKind, PaceNote,
    PaceNoteConfig, PaceNoteGenerator, RouteSummary, TurnShape,
};

fn notes_for(course: &CourseBuilder) -> Vec<PaceNote> {
    generate_pace_notes(&course.build_route())
}

fn turns(notes: &[PaceNote]) -> Vec<&PaceNote> {
    notes.iter().filter(|n| n.turn().is_some()).collect()
}

fn mixed_courses() -> Vec<CourseBuilder> {
    vec![
        CourseBuilder::new()
            .straight(200.0)
            .turn(Right, 30.0, 90.0)
            .straight(120.0)
            .turn(Left, 140.0, 45.0)
            .straight(30.0)
            .turn(Right, 90.0, 40.0)
            .straight(300.0),
        CourseBuilder::new()
            .starting_at(60.2, 24.9, 135.0)
            .start_elevation(120.0)
            .straight(20.0)
            .turn(Left, 45.0, 90.0)
            .climb(12.0)
            .straight(30.0)
            .straight(200.0)
            .turn(Right, 18.0, 175.0)
            .straight(100.0)
            .turn(Left, 60.0, 70.0)
            .turn(Right, 60.0, 70.0)
            .straight(250.0),
        CourseBuilder::new()
            .starting_at(-33.9, 151.2, 270.0)
            .straight(400.0)
            .turn(Left, 250.0, 50.0)
            .straight(100.0)
            .turn(Left, 110.0, 30.0)
            .turn(Left, 40.0, 70.0)
            .straight(150.0)
            .climb(-9.0)
            .turn(Right, 75.0, 100.0)
            .straight(500.0),
    ]
}

/// A straight 2km route is just Start and Finish.
#[test]
fn test_straight_route_has_start_and_finish_only() {
    let notes = notes_for(&CourseBuilder::new().straight(2000.0));
    let kinds: Vec<NoteKind> = notes.iter().map(PaceNote::kind).collect();
    assert_eq!(kinds, vec![NoteKind::Start, NoteKind::Finish]);
    assert_eq!(notes[0].position_m, 0.0);
    assert_eq!(notes[0].distance_to_next_m, Some(2000.0));
    assert_eq!(notes[1].position_m, 2000.0);
    assert_eq!(notes[1].distance_to_next_m, None);
}

/// A clean 90 degree right of 30m radius at 500m.
#[test]
fn test_square_right_at_500m() {
    let notes = notes_for(
        &CourseBuilder::new()
            .straight(500.0)
            .turn(Right, 30.0, 90.0)
            .straight(500.0),
    );
    let corners = turns(&notes);
    assert_eq!(corners.len(), 1, "{notes:#?}");

    let note = corners[0];
    assert!((note.position_m - 500.0).abs() <= 20.0, "at {}", note.position_m);
    let turn = note.turn().unwrap();
    assert_eq!(turn.direction, Right);
    assert!(
        turn.severity.grade().value() == 2 || turn.severity.shape() == Some(TurnShape::Square),
        "severity {}",
        turn.severity
    );
    assert!(note.advisories.contains(&Advisory::Caution));
}

/// A 20m hairpin is called on its own even with a corner right after it.
#[test]
fn test_hairpin_stands_alone() {
    let notes = notes_for(
        &CourseBuilder::new()
            .straight(300.0)
            .turn(Left, 20.0, 170.0)
            .straight(15.0)
            .turn(Right, 65.0, 70.0)
            .straight(300.0),
    );
    let corners = turns(&notes);
    assert_eq!(corners.len(), 2, "{notes:#?}");

    let hairpin = corners[0].turn().unwrap();
    assert_eq!(hairpin.direction, Left);
    assert_eq!(hairpin.severity.shape(), Some(TurnShape::Hairpin));
    assert_eq!(hairpin.severity.grade().value(), 1);
    assert!(hairpin.chicane.is_none());
    assert!(corners[0].advisories.contains(&Advisory::Caution));

    assert_eq!(corners[1].direction(), Some(Right));
}

/// A short right flicking into a gentle left is called as one "3 into 6".
#[test]
fn test_close_corners_become_chicane() {
    let notes = notes_for(
        &CourseBuilder::new()
            .straight(400.0)
            .turn(Right, 70.0, 25.0)
            .straight(6.0)
            .turn(Left, 300.0, 20.0)
            .straight(400.0),
    );
    let corners = turns(&notes);
    assert_eq!(corners.len(), 1, "{notes:#?}");
    let turn = corners[0].turn().unwrap();
    let link = turn.chicane.as_ref().expect("merged chicane");
    assert_eq!(turn.direction, Right);
    assert_eq!(link.direction, Left);
    assert!(link.position_m > corners[0].position_m);
    assert!(turn.severity_label().contains(" into "));

    // Distance on the merged note points at the Finish, past the absorbed corner.
    let finish = notes.last().unwrap();
    assert_eq!(
        corners[0].distance_to_next_m,
        Some(finish.position_m - corners[0].position_m)
    );
}

/// A short climb inside a corner is called as a crest.
#[test]
fn test_climb_inside_corner_is_blind_crest() {
    let notes = notes_for(
        &CourseBuilder::new()
            .straight(300.0)
            .climb(8.0)
            .turn(Right, 60.0, 38.0)
            .turn(Right, 60.0, 22.0)
            .straight(300.0),
    );
    let corners = turns(&notes);
    assert_eq!(corners.len(), 1, "{notes:#?}");
    assert_eq!(corners[0].hazards, vec![Hazard::Crest]);
    assert!(corners[0].advisories.contains(&Advisory::Blind));
}

/// An 8m climb over 40m in the middle of a long sweeper still reads as a crest.
#[test]
fn test_short_climb_inside_long_sweeper_is_blind_crest() {
    let arc_deg = (40.0_f64 / 150.0).to_degrees();
    let notes = notes_for(
        &CourseBuilder::new()
            .straight(500.0)
            .turn(Right, 150.0, 35.0)
            .climb(8.0)
            .turn(Right, 150.0, arc_deg)
            .turn(Right, 150.0, 40.0)
            .straight(500.0),
    );
    let corners = turns(&notes);
    assert_eq!(corners.len(), 1, "{notes:#?}");
    assert_eq!(corners[0].hazards, vec![Hazard::Crest]);
    assert!(corners[0].advisories.contains(&Advisory::Blind));
}

/// A clean U-turn keeps its Hairpin label at every tight radius.
#[test]
fn test_u_turn_is_hairpin() {
    for radius in [10.0, 15.0, 20.0] {
        let notes = notes_for(
            &CourseBuilder::new()
                .straight(300.0)
                .turn(Left, radius, 180.0)
                .straight(300.0),
        );
        let corners = turns(&notes);
        assert_eq!(corners.len(), 1, "r={radius}: {notes:#?}");
        let turn = corners[0].turn().unwrap();
        assert_eq!(turn.severity.shape(), Some(TurnShape::Hairpin), "r={radius}");
        assert_eq!(turn.severity.grade().value(), 1);
        assert!(turn.modifiers.is_empty(), "r={radius}: {:?}", turn.modifiers);
    }
}

/// Two rights close together, a 4 opening into a 6, are called as one
/// widening corner that keeps the gentler exit grade.
#[test]
fn test_close_same_direction_corners_widen() {
    for gap in [8.0, 12.0, 15.0] {
        let notes = notes_for(
            &CourseBuilder::new()
                .straight(1000.0)
                .turn(Right, 100.0, 20.0)
                .straight(gap)
                .turn(Right, 400.0, 20.0)
                .straight(500.0),
        );
        let corners = turns(&notes);
        assert_eq!(corners.len(), 1, "gap {gap}: {notes:#?}");
        assert!((corners[0].position_m - 1000.0).abs() <= 10.0);
        let turn = corners[0].turn().unwrap();
        assert_eq!(turn.direction, Right);
        assert_eq!(turn.severity.grade().value(), 4, "gap {gap}");
        let exit = turn.modifiers.iter().find_map(|m| match m {
            Modifier::Widens(grade) => Some(grade.value()),
            _ => None,
        });
        assert_eq!(exit, Some(6), "gap {gap}: {:?}", turn.modifiers);
    }
}

/// Constant-radius corners never tighten or widen.
#[test]
fn test_constant_arcs_keep_their_radius() {
    for (radius, angle) in [(6.0, 180.0), (15.0, 70.0), (30.0, 70.0), (80.0, 120.0), (400.0, 70.0)] {
        let notes = notes_for(
            &CourseBuilder::new()
                .straight(300.0)
                .turn(Left, radius, angle)
                .straight(300.0),
        );
        for note in turns(&notes) {
            let modifiers = &note.turn().unwrap().modifiers;
            assert!(
                !modifiers
                    .iter()
                    .any(|m| matches!(m, Modifier::Tightens(_) | Modifier::Widens(_))),
                "r={radius} angle={angle}: {modifiers:?}"
            );
        }
    }
}

/// An S-bend is two corners, never one with a radius change.
#[test]
fn test_s_bend_is_two_notes() {
    let notes = notes_for(
        &CourseBuilder::new()
            .straight(300.0)
            .turn(Right, 60.0, 90.0)
            .turn(Left, 60.0, 90.0)
            .straight(300.0),
    );
    let corners = turns(&notes);
    assert_eq!(corners.len(), 2, "{notes:#?}");
    assert_eq!(corners[0].direction(), Some(Right));
    assert_eq!(corners[1].direction(), Some(Left));
    for corner in corners {
        let modifiers = &corner.turn().unwrap().modifiers;
        assert!(!modifiers
            .iter()
            .any(|m| matches!(m, Modifier::Tightens(_) | Modifier::Widens(_))));
    }
}

/// A jump on a straight gets its own note.
#[test]
fn test_jump_on_straight() {
    let notes = notes_for(
        &CourseBuilder::new()
            .straight(300.0)
            .climb(12.0)
            .straight(20.0)
            .straight(300.0),
    );
    let hazards: Vec<&PaceNote> = notes
        .iter()
        .filter(|n| n.kind() == NoteKind::Straight)
        .collect();
    assert_eq!(hazards.len(), 1, "{notes:#?}");
    assert_eq!(hazards[0].hazards, vec![Hazard::Jump]);
    assert_eq!(hazards[0].advisories, vec![Advisory::HeavyBraking]);
}

#[test]
fn test_first_corner_replaces_start() {
    let notes = notes_for(
        &CourseBuilder::new()
            .straight(20.0)
            .turn(Left, 80.0, 60.0)
            .straight(400.0),
    );
    assert_eq!(notes[0].position_m, 0.0);
    assert!(matches!(notes[0].callout, Callout::Turn(_)), "{notes:#?}");
    assert!(!notes.iter().any(|n| n.kind() == NoteKind::Start));
}

#[test]
fn test_positions_are_ordered_and_rounded() {
    for course in mixed_courses() {
        let notes = notes_for(&course);
        assert!(notes.len() >= 3);
        for pair in notes.windows(2) {
            assert!(pair[0].position_m <= pair[1].position_m);
        }
        for note in &notes {
            assert!(note.position_m >= 0.0);
            assert_eq!(note.position_m % 10.0, 0.0);
            if let Some(distance) = note.distance_to_next_m {
                assert_eq!(distance % 10.0, 0.0);
            }
        }
        assert_eq!(notes.last().unwrap().kind(), NoteKind::Finish);
        assert!(notes.last().unwrap().distance_to_next_m.is_none());
    }
}

/// Named turns are never looser than the grade they stand in for.
#[test]
fn test_shapes_preserve_grade_hierarchy() {
    let config = PaceNoteConfig::default();
    for course in mixed_courses() {
        for note in notes_for(&course) {
            let Some(turn) = note.turn() else { continue };
            if let Some(shape) = turn.severity.shape() {
                let cap = shape.max_grade().value() as usize;
                assert!(turn.severity.grade() <= shape.max_grade());
                assert!(turn.radius_m < config.severity_bounds_m[cap - 1]);
            }
        }
    }
}

#[test]
fn test_chicanes_respect_merge_limits() {
    for course in mixed_courses() {
        let notes = notes_for(&course);
        for note in &notes {
            let Some(turn) = note.turn() else { continue };
            if let Some(link) = &turn.chicane {
                assert!(turn.severity.grade().value() > 1);
                assert!(link.severity.grade().value() > 1);
                assert!(turn.severity.grade().diff(link.severity.grade()) <= 3);
                assert!(link.position_m - note.position_m <= 40.0);
            }
        }
        let summary = RouteSummary::from_notes(&notes);
        assert!(summary.corners >= turns(&notes).len());
    }
}

#[test]
fn test_alternate_tuning_changes_output() {
    let course = CourseBuilder::new()
        .straight(400.0)
        .turn(Right, 70.0, 25.0)
        .straight(6.0)
        .turn(Left, 300.0, 20.0)
        .straight(400.0);
    let generator = PaceNoteGenerator::new(PaceNoteConfig {
        chicane_distance_m: 0.0,
        ..PaceNoteConfig::default()
    })
    .unwrap();
    let notes = generator.generate(&course.build_route());
    let corners = turns(&notes);
    assert_eq!(corners.len(), 2, "{notes:#?}");
    assert!(corners.iter().all(|n| n.turn().unwrap().chicane.is_none()));
}

#[test]
fn test_generation_is_deterministic() {
    for course in mixed_courses() {
        let route = course.build_route();
        assert_eq!(generate_pace_notes(&route), generate_pace_notes(&route));
    }
}
