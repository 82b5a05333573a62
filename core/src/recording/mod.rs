//! Access to recorded signals and their annotations.
//!
//! The container itself is opaque to the pipeline: everything goes through
//! [`Recording`]. All timestamps crossing this boundary are microseconds
//! since the start of the recording; the window extractor relies on that
//! when converting marker times into sample indices.

pub mod capture;

pub use capture::{CaptureReader, CaptureWriter};

use crate::annotation::AnnotationRecord;
use crate::WindowResult;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Metadata of a named signal inside a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalInfo {
    pub signal_id: u16,
    pub name: String,
    pub units: String,
    /// Samples per second.
    pub sample_rate: f64,
    pub sample_count: u64,
}

/// Column layout of the matrix returned by [`Recording::fsr_statistics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryField {
    Mean = 0,
    Std = 1,
    Min = 2,
    Max = 3,
}

impl SummaryField {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Read side of a recording container.
pub trait Recording {
    /// Looks up a signal by name.
    fn signal_lookup(&self, name: &str) -> WindowResult<SignalInfo>;

    /// Bucketed summary statistics for a fixed-sample-rate signal.
    ///
    /// Returns `length` rows, row `i` summarising samples
    /// `start + i * increment .. start + (i + 1) * increment`, with columns
    /// indexed by [`SummaryField`].
    fn fsr_statistics(
        &self,
        signal_id: u16,
        start: u64,
        increment: u64,
        length: usize,
    ) -> WindowResult<Array2<f32>>;

    /// Annotation records in arrival order.
    fn annotations(&self) -> Box<dyn Iterator<Item = &AnnotationRecord> + '_>;
}
