pub mod analyzer;
pub mod assembler;
pub mod chicane;
pub mod config;
pub mod curvature;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod resample;
pub mod segmenter;
pub mod sim;
pub mod spatial;
pub mod summary;

pub use config::{LengthCutoffs, PaceNoteConfig};
pub use error::ConfigError;
pub use models::{
    Advisory, Callout, ChicaneLink, Direction, Grade, Hazard, Modifier, NoteKind, PaceNote,
    RawPoint, RouteInput, RoutePoint, Severity, TurnCall, TurnShape,
};
pub use pipeline::{generate_pace_notes, PaceNoteGenerator};
pub use segmenter::{CornerCandidate, DetectionSource};
pub use spatial::haversine_distance;
pub use summary::RouteSummary;
