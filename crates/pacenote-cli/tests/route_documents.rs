//! Route document to report, the way the `pacenotes` binary runs it.
//!
//! Run with: cargo test -p pacenote-cli --test route_documents

use pacenote_cli::scenarios::create_forest_chicanes;
use pacenote_cli::{parse_route, render, NotesReport, OutputFormat};
use pacenote_core::{generate_pace_notes, NoteKind};
use serde_json::{json, Value};

/// The same course in all three document shapes yields the same notes.
#[test]
fn test_document_shapes_agree() {
    let course = create_forest_chicanes(45.0, 6.0).course;
    let raw = course.build();

    let native = serde_json::to_string(&course.build_route()).unwrap();
    let coordinates: Vec<[f64; 3]> = raw
        .iter()
        .map(|p| [p.lon, p.lat, p.elevation_m.unwrap_or(0.0)])
        .collect();
    let bare = serde_json::to_string(&coordinates).unwrap();
    let geojson = json!({"type": "LineString", "coordinates": coordinates}).to_string();

    let expected = generate_pace_notes(&parse_route(&native).unwrap());
    assert!(expected.iter().any(|n| n.turn().is_some()));
    assert_eq!(generate_pace_notes(&parse_route(&bare).unwrap()), expected);
    assert_eq!(generate_pace_notes(&parse_route(&geojson).unwrap()), expected);
}

#[test]
fn test_json_report_round_trips_notes() {
    let course = create_forest_chicanes(45.0, 6.0).course;
    let notes = generate_pace_notes(&course.build_route());
    let report = NotesReport::new(notes.clone());

    let value: Value = serde_json::from_str(&render(&report, OutputFormat::Json).unwrap()).unwrap();
    let parsed: Vec<pacenote_core::PaceNote> =
        serde_json::from_value(value["notes"].clone()).unwrap();
    assert_eq!(parsed, notes);
    assert_eq!(value["summary"]["jumps"], 1);
}

#[test]
fn test_text_report_lists_every_note() {
    let route = parse_route(
        r#"{"points": [{"lat": 45.0, "lon": 6.0}, {"lat": 45.009, "lon": 6.0}]}"#,
    )
    .unwrap();
    let notes = generate_pace_notes(&route);
    assert_eq!(notes[0].kind(), NoteKind::Start);

    let text = render(&NotesReport::new(notes), OutputFormat::Text).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].contains("Start"), "{text}");
    assert!(lines[1].contains("Finish"), "{text}");
    assert!(text.contains("1.0 km, 0 corners"), "{text}");
}
