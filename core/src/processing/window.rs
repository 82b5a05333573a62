use crate::recording::{CaptureReader, Recording, SummaryField};
use crate::telemetry::log::LogManager;
use crate::{BoundaryPair, PowerSeries, WindowError, WindowResult};
use std::path::Path;

/// Name of the signal the window is extracted from.
pub const POWER_SIGNAL: &str = "power";

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// `round(timestamp * rate / 1e6)` with ties rounded to even.
pub fn sample_index(timestamp_us: i64, sample_rate: f64) -> i64 {
    (timestamp_us as f64 * sample_rate / MICROS_PER_SECOND).round_ties_even() as i64
}

/// Sample range and bucketing derived from a boundary pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlan {
    pub start_index: u64,
    pub length: u64,
    pub bucket_size: u64,
    pub bucket_count: usize,
}

impl WindowPlan {
    pub fn new(
        boundaries: &BoundaryPair,
        sample_rate: f64,
        target_resolution: usize,
    ) -> WindowResult<Self> {
        if target_resolution == 0 {
            return Err(WindowError::DivideByZero("target resolution is 0".into()));
        }

        let start = sample_index(boundaries.start, sample_rate);
        let end = sample_index(boundaries.end, sample_rate);
        if start < 0 {
            return Err(WindowError::OutOfRange(format!(
                "window starts before the recording ({} us)",
                boundaries.start
            )));
        }
        let length = end - start;
        if length <= 0 {
            return Err(WindowError::DivideByZero(format!(
                "window {}..{} us covers no samples at {} Hz",
                boundaries.start, boundaries.end, sample_rate
            )));
        }

        let bucket_size = (length as f64 / target_resolution as f64).round_ties_even() as u64;
        if bucket_size == 0 {
            return Err(WindowError::DivideByZero(format!(
                "{} samples cannot fill {} buckets",
                length, target_resolution
            )));
        }
        let bucket_count = (length as f64 / bucket_size as f64).round_ties_even() as usize;

        Ok(Self {
            start_index: start as u64,
            length: length as u64,
            bucket_size,
            bucket_count,
        })
    }

    /// Drops trailing buckets that would read past `sample_count`.
    pub fn clamp_to(mut self, sample_count: u64) -> WindowResult<Self> {
        if self.start_index >= sample_count {
            return Err(WindowError::OutOfRange(format!(
                "window start {} is past the last sample {}",
                self.start_index, sample_count
            )));
        }
        let available = (sample_count - self.start_index) / self.bucket_size;
        if (self.bucket_count as u64) > available {
            self.bucket_count = available as usize;
        }
        Ok(self)
    }
}

/// Opens `data_path` and returns the mean power per bucket over
/// `boundaries` together with the resolution actually used.
pub fn extract_window<P: AsRef<Path>>(
    data_path: P,
    boundaries: &BoundaryPair,
    target_resolution: usize,
) -> WindowResult<(PowerSeries, usize)> {
    let data_path = data_path.as_ref();
    if !data_path.is_file() {
        return Err(WindowError::MissingFile(data_path.to_path_buf()));
    }
    let reader = CaptureReader::open(data_path)?;
    extract_window_from(&reader, data_path, boundaries, target_resolution)
}

/// Same as [`extract_window`] for an already opened recording.
pub fn extract_window_from<R: Recording + ?Sized>(
    recording: &R,
    origin: &Path,
    boundaries: &BoundaryPair,
    target_resolution: usize,
) -> WindowResult<(PowerSeries, usize)> {
    let logger = LogManager::new("extractor");
    let signal = recording.signal_lookup(POWER_SIGNAL)?;

    let planned = WindowPlan::new(boundaries, signal.sample_rate, target_resolution)?;
    let plan = planned.clamp_to(signal.sample_count)?;
    if plan.bucket_count != planned.bucket_count {
        logger.anomaly(&format!(
            "{}: window runs past the recording, {} of {} buckets kept",
            origin.display(),
            plan.bucket_count,
            planned.bucket_count
        ));
    }

    let stats = recording.fsr_statistics(
        signal.signal_id,
        plan.start_index,
        plan.bucket_size,
        plan.bucket_count,
    )?;
    let values = stats.column(SummaryField::Mean.index()).to_vec();

    logger.record(&format!(
        "{}: {} samples from {} in {} buckets of {}",
        origin.display(),
        plan.length,
        plan.start_index,
        plan.bucket_count,
        plan.bucket_size
    ));

    let series = PowerSeries {
        source: origin.to_path_buf(),
        units: signal.units,
        values,
    };
    Ok((series, plan.bucket_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::CaptureWriter;
    use tempfile::tempdir;

    fn constant_recording(dir: &Path, rate: f64, samples: usize) -> std::path::PathBuf {
        let path = dir.join("flat.jls");
        let mut writer = CaptureWriter::new();
        writer.add_signal(POWER_SIGNAL, "mW", rate, vec![2.5; samples]);
        writer.write(&path).unwrap();
        path
    }

    #[test]
    fn sample_index_rounds_half_to_even() {
        assert_eq!(sample_index(1_000_000, 1000.0), 1000);
        assert_eq!(sample_index(2_500, 1000.0), 2);
        assert_eq!(sample_index(3_500, 1000.0), 4);
    }

    #[test]
    fn plan_follows_bucket_arithmetic() {
        let pair = BoundaryPair {
            start: 1_000_000,
            end: 3_000_000,
        };
        let plan = WindowPlan::new(&pair, 1_000_000.0, 1000).unwrap();
        assert_eq!(plan.start_index, 1_000_000);
        assert_eq!(plan.length, 2_000_000);
        assert_eq!(plan.bucket_size, 2000);
        assert_eq!(plan.bucket_count, 1000);
    }

    #[test]
    fn long_windows_stay_within_one_bucket_of_target() {
        for (length, target) in [
            (1_234_567i64, 1000usize),
            (999_999, 1000),
            (500_001, 1000),
            (7_777_777, 640),
        ] {
            let pair = BoundaryPair {
                start: 0,
                end: length,
            };
            let plan = WindowPlan::new(&pair, 1_000_000.0, target).unwrap();
            let diff = (plan.bucket_count as i64 - target as i64).abs();
            assert!(diff <= 1, "length {length}: got {}", plan.bucket_count);
        }
    }

    #[test]
    fn degenerate_windows_are_rejected() {
        let pair = BoundaryPair { start: 0, end: 400 };
        assert!(matches!(
            WindowPlan::new(&pair, 1_000_000.0, 0),
            Err(WindowError::DivideByZero(_))
        ));
        assert!(matches!(
            WindowPlan::new(&pair, 1_000_000.0, 1000),
            Err(WindowError::DivideByZero(_))
        ));
        let empty = BoundaryPair { start: 10, end: 10 };
        assert!(matches!(
            WindowPlan::new(&empty, 1_000_000.0, 10),
            Err(WindowError::DivideByZero(_))
        ));
    }

    #[test]
    fn clamp_keeps_whole_buckets_only() {
        let plan = WindowPlan {
            start_index: 90,
            length: 20,
            bucket_size: 4,
            bucket_count: 5,
        };
        assert_eq!(plan.clamp_to(100).unwrap().bucket_count, 2);
        assert!(matches!(plan.clamp_to(90), Err(WindowError::OutOfRange(_))));
    }

    #[test]
    fn extract_window_returns_bucket_means() {
        let dir = tempdir().unwrap();
        let path = constant_recording(dir.path(), 10_000.0, 20_000);
        let pair = BoundaryPair {
            start: 100_000,
            end: 1_100_000,
        };
        let (series, used) = extract_window(&path, &pair, 100).unwrap();
        assert_eq!(used, 100);
        assert_eq!(series.len(), 100);
        assert_eq!(series.units, "mW");
        assert!(series.values.iter().all(|&v| v == 2.5));
    }

    #[test]
    fn extract_window_requires_the_data_file() {
        let dir = tempdir().unwrap();
        let pair = BoundaryPair { start: 0, end: 10 };
        assert!(matches!(
            extract_window(dir.path().join("gone.jls"), &pair, 10),
            Err(WindowError::MissingFile(_))
        ));
    }

    #[test]
    fn extract_window_requires_a_power_signal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("current.jls");
        let mut writer = CaptureWriter::new();
        writer.add_signal("current", "A", 1000.0, vec![1.0; 1000]);
        writer.write(&path).unwrap();
        let pair = BoundaryPair {
            start: 0,
            end: 500_000,
        };
        assert!(matches!(
            extract_window(&path, &pair, 10),
            Err(WindowError::SignalNotFound(_))
        ));
    }
}
