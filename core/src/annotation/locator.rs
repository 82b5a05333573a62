use crate::annotation::{AnnotationKind, AnnotationRecord};
use crate::recording::{CaptureReader, Recording};
use crate::telemetry::log::LogManager;
use crate::{BoundaryPair, TextMarker, WindowError, WindowResult};
use std::path::{Path, PathBuf};

/// Extension replacing the data file's own to name its annotation file.
pub const ANNOTATION_SUFFIX: &str = "anno.jls";

/// `capture/run1.jls` -> `capture/run1.anno.jls`.
pub fn annotation_path<P: AsRef<Path>>(data_path: P) -> PathBuf {
    data_path.as_ref().with_extension(ANNOTATION_SUFFIX)
}

fn open_annotations(data_path: &Path) -> WindowResult<(PathBuf, CaptureReader)> {
    let path = annotation_path(data_path);
    if !path.is_file() {
        return Err(WindowError::MissingFile(path));
    }
    let reader = CaptureReader::open(&path)?;
    Ok((path, reader))
}

/// Reads the annotation file paired with `data_path` and returns its two
/// vertical boundary markers.
pub fn locate_boundaries<P: AsRef<Path>>(data_path: P) -> WindowResult<BoundaryPair> {
    let (path, reader) = open_annotations(data_path.as_ref())?;
    boundaries_from(&reader, &path)
}

/// Scans every record of `recording`; exactly two vertical markers must
/// exist. `origin` only feeds the error message.
pub fn boundaries_from<R: Recording + ?Sized>(
    recording: &R,
    origin: &Path,
) -> WindowResult<BoundaryPair> {
    let logger = LogManager::new("locator");
    let verticals: Vec<i64> = recording
        .annotations()
        .filter(|record| record.is_vertical())
        .map(|record| record.timestamp)
        .collect();

    match verticals.as_slice() {
        [first, second] => {
            let pair = BoundaryPair::from_unordered(*first, *second);
            logger.record(&format!(
                "{}: window {}..{} us",
                origin.display(),
                pair.start,
                pair.end
            ));
            Ok(pair)
        }
        other => Err(WindowError::BoundaryCount {
            path: origin.to_path_buf(),
            found: other.len(),
        }),
    }
}

/// First `limit` vertical markers, stopping the scan as soon as they are
/// found.
pub fn first_vertical_markers<R: Recording + ?Sized>(recording: &R, limit: usize) -> Vec<i64> {
    recording
        .annotations()
        .filter(|record| record.is_vertical())
        .map(|record| record.timestamp)
        .take(limit)
        .collect()
}

/// Reads the annotation file paired with `data_path` and returns its text
/// markers in order of appearance.
pub fn locate_text_markers<P: AsRef<Path>>(data_path: P) -> WindowResult<Vec<TextMarker>> {
    let (path, reader) = open_annotations(data_path.as_ref())?;
    let markers = text_markers_from(&reader);
    LogManager::new("locator").record(&format!(
        "{}: {} text markers",
        path.display(),
        markers.len()
    ));
    Ok(markers)
}

pub fn text_markers_from<R: Recording + ?Sized>(recording: &R) -> Vec<TextMarker> {
    recording
        .annotations()
        .filter(|record| record.kind == AnnotationKind::Text)
        .map(|record: &AnnotationRecord| TextMarker {
            timestamp: record.timestamp,
            label: record.payload.clone().unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::CaptureWriter;
    use tempfile::tempdir;

    fn write_annotations(dir: &Path, records: Vec<AnnotationRecord>) -> PathBuf {
        let data_path = dir.join("run1.jls");
        let mut writer = CaptureWriter::new();
        for record in records {
            writer.annotate(record);
        }
        writer.write(annotation_path(&data_path)).unwrap();
        data_path
    }

    #[test]
    fn annotation_path_replaces_extension() {
        assert_eq!(
            annotation_path("data/deviceA/run1.jls"),
            PathBuf::from("data/deviceA/run1.anno.jls")
        );
        assert_eq!(annotation_path("run1"), PathBuf::from("run1.anno.jls"));
    }

    #[test]
    fn two_vertical_markers_form_the_window() {
        let dir = tempdir().unwrap();
        let data_path = write_annotations(
            dir.path(),
            vec![
                AnnotationRecord::text(50, "idle"),
                AnnotationRecord::vertical(100_000, 1),
                AnnotationRecord::vertical(900_000, 2),
            ],
        );
        let pair = locate_boundaries(&data_path).unwrap();
        assert_eq!(
            pair,
            BoundaryPair {
                start: 100_000,
                end: 900_000
            }
        );
    }

    #[test]
    fn reversed_markers_are_ordered() {
        let dir = tempdir().unwrap();
        let data_path = write_annotations(
            dir.path(),
            vec![
                AnnotationRecord::vertical(900, 1),
                AnnotationRecord::vertical(100, 2),
            ],
        );
        let pair = locate_boundaries(&data_path).unwrap();
        assert_eq!((pair.start, pair.end), (100, 900));
    }

    #[test]
    fn wrong_marker_count_is_reported_with_the_exact_count() {
        for count in [0usize, 1, 3, 4] {
            let dir = tempdir().unwrap();
            let records = (0..count)
                .map(|i| AnnotationRecord::vertical(i as i64 * 1000, i as u8))
                .collect();
            let data_path = write_annotations(dir.path(), records);
            match locate_boundaries(&data_path) {
                Err(WindowError::BoundaryCount { found, .. }) => assert_eq!(found, count),
                other => panic!("expected BoundaryCount for {count}, got {other:?}"),
            }
        }
    }

    #[test]
    fn horizontal_markers_do_not_count_as_boundaries() {
        let dir = tempdir().unwrap();
        let mut horizontal = AnnotationRecord::vertical(500, 3);
        horizontal.kind = AnnotationKind::HorizontalMarker;
        let data_path = write_annotations(
            dir.path(),
            vec![
                AnnotationRecord::vertical(100, 1),
                horizontal,
                AnnotationRecord::vertical(900, 2),
            ],
        );
        assert!(locate_boundaries(&data_path).is_ok());
    }

    #[test]
    fn missing_annotation_file_is_detected_before_opening() {
        let dir = tempdir().unwrap();
        let data_path = dir.path().join("lonely.jls");
        match locate_boundaries(&data_path) {
            Err(WindowError::MissingFile(path)) => {
                assert_eq!(path, dir.path().join("lonely.anno.jls"))
            }
            other => panic!("expected MissingFile, got {other:?}"),
        }
        assert!(matches!(
            locate_text_markers(&data_path),
            Err(WindowError::MissingFile(_))
        ));
    }

    #[test]
    fn text_markers_keep_order_of_appearance() {
        let dir = tempdir().unwrap();
        let data_path = write_annotations(
            dir.path(),
            vec![
                AnnotationRecord::vertical(0, 1),
                AnnotationRecord::text(700, "radio on"),
                AnnotationRecord::text(300, "sensor read"),
                AnnotationRecord::vertical(1000, 2),
            ],
        );
        let markers = locate_text_markers(&data_path).unwrap();
        let labels: Vec<&str> = markers.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["radio on", "sensor read"]);
        assert_eq!(markers[0].timestamp, 700);
    }

    #[test]
    fn early_termination_stops_after_limit() {
        let dir = tempdir().unwrap();
        let data_path = write_annotations(
            dir.path(),
            vec![
                AnnotationRecord::vertical(10, 1),
                AnnotationRecord::vertical(20, 2),
                AnnotationRecord::vertical(30, 3),
            ],
        );
        let reader = CaptureReader::open(annotation_path(&data_path)).unwrap();
        assert_eq!(first_vertical_markers(&reader, 2), vec![10, 20]);
    }
}
