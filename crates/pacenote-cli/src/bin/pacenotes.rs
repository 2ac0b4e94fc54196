//! Generate rally pace notes for a route document.
//!
//! Usage:
//!   cargo run -p pacenote-cli --bin pacenotes -- route.json --format text
//!   cargo run -p pacenote-cli --bin demo_route | cargo run -p pacenote-cli --bin pacenotes

use anyhow::{Context, Result};
use clap::Parser;
use pacenote_cli::{load_config, parse_route, render, NotesReport, OutputFormat};
use pacenote_core::PaceNoteGenerator;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Turn a driven route into pace notes
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Route document (native JSON, GeoJSON LineString or coordinate array); stdin when omitted
    input: Option<PathBuf>,

    /// JSON tuning file, partial documents are merged over the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) -> Result<()> {
    // Logs go to stderr so the report on stdout can be piped.
    let filter = EnvFilter::from_default_env()
        .add_directive("pacenotes=info".parse()?)
        .add_directive("pacenote_cli=info".parse()?);
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading route document {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading route document from stdin")?;
            Ok(buffer)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json)?;

    let config = load_config(args.config.as_deref())?;
    let generator = PaceNoteGenerator::new(config).context("invalid tuning")?;

    let route = parse_route(&read_input(args.input.as_deref())?)?;
    tracing::info!(points = route.points.len(), "generating pace notes");

    let notes = generator.generate(&route);
    if notes.is_empty() {
        tracing::warn!("route is too short to produce pace notes");
    }
    let report = NotesReport::new(notes);
    tracing::info!(
        length_m = report.summary.length_m,
        corners = report.summary.corners,
        chicanes = report.summary.chicanes,
        "pace notes generated"
    );

    let rendered = render(&report, args.format)?;
    match args.output {
        Some(path) => fs::write(&path, rendered)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}
