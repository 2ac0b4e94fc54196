//! Error types for the pace note library.
//!
//! The analysis itself never fails; only tuning values can be rejected.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("resample step must be positive, got {0}")]
    NonPositiveStep(f64),
    #[error("at least one curvature window is required")]
    NoCurvatureWindows,
    #[error("curvature window {0}m must be positive")]
    NonPositiveWindow(f64),
    #[error("severity radius bounds must be strictly increasing and positive: {0:?}")]
    UnorderedSeverityBounds([f64; 6]),
    #[error("curved threshold {curved}m must not exceed the straight sentinel {straight}m")]
    CurvedAboveSentinel { curved: f64, straight: f64 },
    #[error("{name} must be a ratio in (0, 1], got {value}")]
    RatioOutOfRange { name: &'static str, value: f64 },
    #[error("{name} must not be negative, got {value}")]
    NegativeDistance { name: &'static str, value: f64 },
    #[error("half-turn range is inverted: {min}..{max}")]
    InvertedRange { min: f64, max: f64 },
    #[error("invalid tuning document: {0}")]
    Parse(#[from] serde_json::Error),
}
