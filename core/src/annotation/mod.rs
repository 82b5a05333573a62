pub mod locator;

pub use locator::{annotation_path, locate_boundaries, locate_text_markers, ANNOTATION_SUFFIX};

use serde::{Deserialize, Serialize};

/// Annotation kinds stored alongside a recording.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnnotationKind {
    Text,
    VerticalMarker,
    HorizontalMarker,
}

/// Single annotation entry, in recording arrival order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotationRecord {
    /// Microseconds since recording start.
    pub timestamp: i64,
    pub y: f32,
    pub kind: AnnotationKind,
    pub group_id: u8,
    pub payload: Option<String>,
}

impl AnnotationRecord {
    pub fn vertical(timestamp: i64, group_id: u8) -> Self {
        Self {
            timestamp,
            y: 0.0,
            kind: AnnotationKind::VerticalMarker,
            group_id,
            payload: None,
        }
    }

    pub fn text(timestamp: i64, label: impl Into<String>) -> Self {
        Self {
            timestamp,
            y: 0.0,
            kind: AnnotationKind::Text,
            group_id: 0,
            payload: Some(label.into()),
        }
    }

    pub fn is_vertical(&self) -> bool {
        self.kind == AnnotationKind::VerticalMarker
    }
}
