pub use crate::annotation::locator::{
    annotation_path, locate_boundaries, locate_text_markers, ANNOTATION_SUFFIX,
};
pub use crate::annotation::{AnnotationKind, AnnotationRecord};
pub use crate::processing::window::{extract_window, extract_window_from, POWER_SIGNAL};
pub use crate::recording::{CaptureReader, CaptureWriter, Recording, SignalInfo, SummaryField};
pub use crate::{BoundaryPair, PowerSeries, TextMarker, WindowError, WindowResult};
