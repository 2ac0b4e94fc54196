//! Emit a synthetic rally course as a route document.
//!
//! Usage:
//!   cargo run -p pacenote-cli --bin demo_route -- --scenario forest-chicanes
//!   cargo run -p pacenote-cli --bin demo_route -- --list

use anyhow::{bail, Result};
use clap::Parser;
use pacenote_cli::scenarios;
use serde_json::json;

/// Default course origin (Col de Turini area)
const ORIGIN_LAT: f64 = 43.977;
const ORIGIN_LON: f64 = 7.390;

/// Emit a synthetic course for the pace note generator
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Scenario name
    #[arg(long, default_value = "mountain-pass")]
    scenario: String,

    /// Start latitude
    #[arg(long, default_value_t = ORIGIN_LAT)]
    lat: f64,

    /// Start longitude
    #[arg(long, default_value_t = ORIGIN_LON)]
    lon: f64,

    /// Spacing between generated points in meters
    #[arg(long, default_value_t = 2.0)]
    spacing: f64,

    /// Emit a GeoJSON LineString instead of the native document
    #[arg(long)]
    geojson: bool,

    /// List the available scenarios and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.list {
        for scenario in scenarios::all(args.lat, args.lon) {
            println!("{:<18} {:>6.0}m  {}", scenario.name, scenario.course.length_m(), scenario.description);
        }
        return Ok(());
    }

    let Some(scenario) = scenarios::by_name(&args.scenario, args.lat, args.lon) else {
        bail!("unknown scenario '{}', try --list", args.scenario);
    };
    let course = scenario.course.point_spacing(args.spacing);
    eprintln!(
        "Scenario {}: {} ({:.0}m)",
        scenario.name,
        scenario.description,
        course.length_m()
    );

    let document = if args.geojson {
        let coordinates: Vec<[f64; 3]> = course
            .build()
            .iter()
            .map(|p| [p.lon, p.lat, p.elevation_m.unwrap_or(0.0)])
            .collect();
        json!({ "type": "LineString", "coordinates": coordinates })
    } else {
        serde_json::to_value(course.build_route())?
    };
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
