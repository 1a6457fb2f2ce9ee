//! Error taxonomy for the core.
//!
//! Missing input (no hand, no pose, no template) is never an error; those
//! paths produce neutral outputs. Errors exist only for malformed data handed
//! in from outside, bad configuration and the landmark source itself.

use thiserror::Error;

/// A landmark set received from the detector could not be turned into a hand or pose.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("expected {expected} landmarks, got {actual}")]
    WrongCount { expected: usize, actual: usize },
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// Rejected configuration value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("`{field}` range is inverted ({min} > {max})")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("`{field}` must be a probability in [0, 1], got {value}")]
    NotAProbability { field: &'static str, value: f32 },
    #[error("`{field}` must be positive")]
    NotPositive { field: &'static str },
    #[error("`{field}` must be zero or more, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("`{field}` must be finite")]
    NotFinite { field: &'static str },
}

/// Failure of the upstream landmark source (camera or tracking backend).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SourceError {
    #[error("landmark source unavailable: {0}")]
    Unavailable(String),
    #[error("landmark source disconnected")]
    Disconnected,
}
