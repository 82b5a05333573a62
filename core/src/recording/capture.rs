use crate::annotation::AnnotationRecord;
use crate::math::stats::StatsHelper;
use crate::recording::{Recording, SignalInfo, SummaryField};
use crate::{WindowError, WindowResult};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const MAGIC: &[u8; 8] = b"PWRCAP01";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CaptureBody {
    signals: Vec<SignalTrack>,
    annotations: Vec<AnnotationRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SignalTrack {
    signal_id: u16,
    name: String,
    units: String,
    sample_rate: f64,
    samples: Vec<f32>,
}

impl SignalTrack {
    fn info(&self) -> SignalInfo {
        SignalInfo {
            signal_id: self.signal_id,
            name: self.name.clone(),
            units: self.units.clone(),
            sample_rate: self.sample_rate,
            sample_count: self.samples.len() as u64,
        }
    }
}

/// In-memory view of a capture file. The file handle is released once
/// [`CaptureReader::open`] returns.
#[derive(Debug)]
pub struct CaptureReader {
    path: PathBuf,
    body: CaptureBody,
}

impl CaptureReader {
    pub fn open<P: AsRef<Path>>(path: P) -> WindowResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(WindowError::MissingFile(path.to_path_buf()));
        }
        let bytes = fs::read(path)?;
        if !bytes.starts_with(MAGIC) {
            return Err(WindowError::InvalidContainer {
                path: path.to_path_buf(),
                reason: "missing capture header".into(),
            });
        }
        let body: CaptureBody = bincode::deserialize(&bytes[MAGIC.len()..])?;
        log::debug!(
            "opened {} ({} signals, {} annotations)",
            path.display(),
            body.signals.len(),
            body.annotations.len()
        );
        Ok(Self {
            path: path.to_path_buf(),
            body,
        })
    }

    fn track(&self, signal_id: u16) -> WindowResult<&SignalTrack> {
        self.body
            .signals
            .iter()
            .find(|track| track.signal_id == signal_id)
            .ok_or_else(|| WindowError::SignalNotFound(format!("id {}", signal_id)))
    }
}

impl Recording for CaptureReader {
    fn signal_lookup(&self, name: &str) -> WindowResult<SignalInfo> {
        self.body
            .signals
            .iter()
            .find(|track| track.name == name)
            .map(SignalTrack::info)
            .ok_or_else(|| {
                WindowError::SignalNotFound(format!("{} in {}", name, self.path.display()))
            })
    }

    fn fsr_statistics(
        &self,
        signal_id: u16,
        start: u64,
        increment: u64,
        length: usize,
    ) -> WindowResult<Array2<f32>> {
        if increment == 0 {
            return Err(WindowError::DivideByZero("statistics increment is 0".into()));
        }
        let track = self.track(signal_id)?;
        let begin = usize::try_from(start)
            .map_err(|_| WindowError::OutOfRange(format!("start {}", start)))?;
        let step = usize::try_from(increment)
            .map_err(|_| WindowError::OutOfRange(format!("increment {}", increment)))?;
        let end = step
            .checked_mul(length)
            .and_then(|span| span.checked_add(begin))
            .ok_or_else(|| WindowError::OutOfRange("bucket range overflows".into()))?;
        if end > track.samples.len() {
            return Err(WindowError::OutOfRange(format!(
                "samples {}..{} exceed signal length {}",
                begin,
                end,
                track.samples.len()
            )));
        }

        let mut stats = Array2::<f32>::zeros((length, SummaryField::COUNT));
        for (row, chunk) in track.samples[begin..end].chunks_exact(step).enumerate() {
            let summary = StatsHelper::summarize(chunk);
            stats[[row, SummaryField::Mean.index()]] = summary.mean;
            stats[[row, SummaryField::Std.index()]] = summary.std;
            stats[[row, SummaryField::Min.index()]] = summary.min;
            stats[[row, SummaryField::Max.index()]] = summary.max;
        }
        Ok(stats)
    }

    fn annotations(&self) -> Box<dyn Iterator<Item = &AnnotationRecord> + '_> {
        Box::new(self.body.annotations.iter())
    }
}

/// Builder for capture files. Annotation files are capture files without
/// signals.
#[derive(Debug, Default)]
pub struct CaptureWriter {
    body: CaptureBody,
}

impl CaptureWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fixed-rate signal and returns its id.
    pub fn add_signal(
        &mut self,
        name: &str,
        units: &str,
        sample_rate: f64,
        samples: Vec<f32>,
    ) -> u16 {
        let signal_id = self.body.signals.len() as u16 + 1;
        self.body.signals.push(SignalTrack {
            signal_id,
            name: name.to_string(),
            units: units.to_string(),
            sample_rate,
            samples,
        });
        signal_id
    }

    pub fn annotate(&mut self, record: AnnotationRecord) -> &mut Self {
        self.body.annotations.push(record);
        self
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> WindowResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut bytes = MAGIC.to_vec();
        bytes.extend(bincode::serialize(&self.body)?);
        fs::write(path, bytes)?;
        Ok(())
    }
}
