//! Pace note CLI - command line front-end for the pace note pipeline.
//!
//! This crate provides two binaries:
//! - pacenotes: read a route document, print pace notes as JSON or text
//! - demo_route: emit a synthetic course to feed into `pacenotes`

pub mod input;
pub mod render;
pub mod scenarios;
pub mod settings;

pub use input::parse_route;
pub use render::{render, NotesReport, OutputFormat};
pub use settings::load_config;
