//! Core of the power-window pipeline.
//!
//! Recordings are reached through the [`recording::Recording`] trait. The
//! modules locate the two boundary markers of a recording, turn them into a
//! sample window and downsample that window into per-bucket mean power.

pub mod annotation;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod recording;
pub mod telemetry;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use recording::{Recording, SignalInfo, SummaryField};

/// Start and end timestamps (µs) of the region of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryPair {
    pub start: i64,
    pub end: i64,
}

impl BoundaryPair {
    /// Builds a pair from two marker timestamps in either order.
    pub fn from_unordered(a: i64, b: i64) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Window span in microseconds.
    pub fn span_us(&self) -> i64 {
        self.end - self.start
    }
}

/// Labelled point annotation inside a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMarker {
    pub timestamp: i64,
    pub label: String,
}

/// Mean power per bucket over one recording's window.
#[derive(Debug, Clone, Default)]
pub struct PowerSeries {
    pub source: PathBuf,
    pub units: String,
    pub values: Vec<f32>,
}

impl PowerSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Common error type for locating and extracting windows.
#[derive(thiserror::Error, Debug)]
pub enum WindowError {
    #[error("missing file: {0}")]
    MissingFile(PathBuf),
    #[error("expected exactly 2 boundary markers in {path}, found {found}")]
    BoundaryCount { path: PathBuf, found: usize },
    #[error("degenerate window: {0}")]
    DivideByZero(String),
    #[error("signal not found: {0}")]
    SignalNotFound(String),
    #[error("sample range out of bounds: {0}")]
    OutOfRange(String),
    #[error("invalid container {path}: {reason}")]
    InvalidContainer { path: PathBuf, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("decode failure: {0}")]
    Decode(#[from] bincode::Error),
}

pub type WindowResult<T> = Result<T, WindowError>;
