//! Pre-defined synthetic courses for demos and smoke tests.

use pacenote_core::sim::CourseBuilder;
use pacenote_core::Direction::{Left, Right};

/// A named course.
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub course: CourseBuilder,
}

/// Switchbacks climbing a mountain pass.
///
/// - Two hairpins separated by a climbing straight
/// - A crest on the approach to the summit
pub fn create_mountain_pass(lat: f64, lon: f64) -> Scenario {
    let course = CourseBuilder::new()
        .starting_at(lat, lon, 20.0)
        .start_elevation(900.0)
        .straight(400.0)
        .turn(Right, 90.0, 45.0)
        .climb(12.0)
        .straight(250.0)
        .turn(Left, 18.0, 165.0)
        .climb(15.0)
        .straight(300.0)
        .turn(Right, 20.0, 170.0)
        .climb(6.0)
        .straight(40.0)
        .climb(-4.0)
        .straight(30.0)
        .straight(150.0)
        .turn(Left, 140.0, 30.0)
        .straight(400.0);
    Scenario {
        name: "mountain-pass",
        description: "switchbacks with hairpins and a summit crest",
        course,
    }
}

/// Tight forest stage with back-to-back direction changes.
pub fn create_forest_chicanes(lat: f64, lon: f64) -> Scenario {
    let course = CourseBuilder::new()
        .starting_at(lat, lon, 90.0)
        .start_elevation(250.0)
        .straight(300.0)
        .turn(Left, 70.0, 50.0)
        .straight(20.0)
        .turn(Right, 90.0, 50.0)
        .straight(350.0)
        .turn(Right, 35.0, 90.0)
        .straight(200.0)
        .climb(12.0)
        .straight(25.0)
        .straight(300.0)
        .turn(Left, 60.0, 80.0)
        .turn(Right, 60.0, 80.0)
        .straight(300.0);
    Scenario {
        name: "forest-chicanes",
        description: "chicanes, a square right, a jump and an S-bend",
        course,
    }
}

/// Fast coastal road with long sweepers and a tightening corner.
pub fn create_coastal_sweepers(lat: f64, lon: f64) -> Scenario {
    let course = CourseBuilder::new()
        .starting_at(lat, lon, 180.0)
        .start_elevation(40.0)
        .straight(500.0)
        .turn(Left, 300.0, 40.0)
        .straight(300.0)
        .turn(Right, 200.0, 60.0)
        .straight(250.0)
        .turn(Left, 120.0, 35.0)
        .turn(Left, 45.0, 60.0)
        .straight(400.0)
        .climb(-10.0)
        .turn(Right, 220.0, 25.0)
        .straight(600.0);
    Scenario {
        name: "coastal-sweepers",
        description: "long sweepers, a tightening left and a descent",
        course,
    }
}

pub fn all(lat: f64, lon: f64) -> Vec<Scenario> {
    vec![
        create_mountain_pass(lat, lon),
        create_forest_chicanes(lat, lon),
        create_coastal_sweepers(lat, lon),
    ]
}

pub fn by_name(name: &str, lat: f64, lon: f64) -> Option<Scenario> {
    all(lat, lon).into_iter().find(|s| s.name == name)
}
