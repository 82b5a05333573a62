use crate::generator::template::{burst_envelope, ripple};
use anyhow::{ensure, Context};
use powerwin::prelude::{annotation_path, AnnotationRecord, CaptureWriter, POWER_SIGNAL};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Text annotation placed inside a synthetic recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub at_s: f64,
    pub label: String,
}

/// Configuration for generating a synthetic power recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub sample_rate: f64,
    pub duration_s: f64,
    pub window_start_s: f64,
    pub window_end_s: f64,
    pub idle_mw: f32,
    pub active_mw: f32,
    pub ripple_hz: f32,
    pub noise: f32,
    pub seed: u64,
    pub text_markers: Vec<MarkerSpec>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sample_rate: 10_000.0,
            duration_s: 3.0,
            window_start_s: 0.5,
            window_end_s: 2.5,
            idle_mw: 1.2,
            active_mw: 45.0,
            ripple_hz: 4.0,
            noise: 0.3,
            seed: 0,
            text_markers: vec![
                MarkerSpec {
                    at_s: 1.0,
                    label: "radio on".into(),
                },
                MarkerSpec {
                    at_s: 2.0,
                    label: "radio off".into(),
                },
            ],
        }
    }
}

fn micros(seconds: f64) -> i64 {
    (seconds * MICROS_PER_SECOND).round() as i64
}

fn build_power_trace(config: &GeneratorConfig) -> anyhow::Result<Vec<f32>> {
    ensure!(config.sample_rate > 0.0, "sample rate must be positive");
    ensure!(
        0.0 <= config.window_start_s
            && config.window_start_s < config.window_end_s
            && config.window_end_s <= config.duration_s,
        "window {}..{} s must lie inside 0..{} s",
        config.window_start_s,
        config.window_end_s,
        config.duration_s
    );
    let sample_count = (config.sample_rate * config.duration_s).round();
    ensure!(
        sample_count.is_finite() && sample_count >= 1.0,
        "recording of {} s at {} Hz has no samples",
        config.duration_s,
        config.sample_rate
    );
    let sample_count = usize::try_from(sample_count as u64)
        .context("sample count does not fit in memory")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let ramp = (config.window_end_s - config.window_start_s) * 0.02;
    let noise = config.noise.abs();

    let samples = (0..sample_count)
        .map(|index| {
            let t = index as f64 / config.sample_rate;
            let envelope = burst_envelope(t, config.window_start_s, config.window_end_s, ramp);
            let active = config.active_mw * (1.0 + 0.1 * ripple(t, config.ripple_hz));
            let jitter = if noise > 0.0 {
                rng.gen_range(-noise..noise)
            } else {
                0.0
            };
            (config.idle_mw + envelope * (active - config.idle_mw) + jitter).max(0.0)
        })
        .collect();
    Ok(samples)
}

/// Writes `data_path` and its annotation file.
pub fn write_synthetic_recording<P: AsRef<Path>>(
    data_path: P,
    config: &GeneratorConfig,
) -> anyhow::Result<()> {
    let data_path = data_path.as_ref();
    let samples = build_power_trace(config)?;

    let mut data = CaptureWriter::new();
    data.add_signal(POWER_SIGNAL, "mW", config.sample_rate, samples);
    data.write(data_path)
        .with_context(|| format!("writing recording {}", data_path.display()))?;

    let mut annotations = CaptureWriter::new();
    annotations.annotate(AnnotationRecord::vertical(micros(config.window_start_s), 1));
    for marker in &config.text_markers {
        annotations.annotate(AnnotationRecord::text(micros(marker.at_s), marker.label.clone()));
    }
    annotations.annotate(AnnotationRecord::vertical(micros(config.window_end_s), 2));
    let anno_path = annotation_path(data_path);
    annotations
        .write(&anno_path)
        .with_context(|| format!("writing annotations {}", anno_path.display()))?;

    log::info!(
        "synthesized {} ({} s at {} Hz)",
        data_path.display(),
        config.duration_s,
        config.sample_rate
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerwin::prelude::{locate_boundaries, locate_text_markers, CaptureReader, Recording};
    use tempfile::tempdir;

    #[test]
    fn generator_builds_expected_sample_count() {
        let samples = build_power_trace(&GeneratorConfig::default()).unwrap();
        assert_eq!(samples.len(), 30_000);
        assert!(samples.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn burst_sits_between_the_boundaries() {
        let config = GeneratorConfig {
            noise: 0.0,
            ..Default::default()
        };
        let samples = build_power_trace(&config).unwrap();
        assert_eq!(samples[1_000], config.idle_mw);
        assert!(samples[15_000] > config.active_mw * 0.8);
        assert_eq!(samples[29_000], config.idle_mw);
    }

    #[test]
    fn invalid_window_is_rejected() {
        let config = GeneratorConfig {
            window_start_s: 2.0,
            window_end_s: 1.0,
            ..Default::default()
        };
        assert!(build_power_trace(&config).is_err());
    }

    #[test]
    fn written_recording_round_trips_through_the_locator() {
        let dir = tempdir().unwrap();
        let data_path = dir.path().join("synthetic.jls");
        write_synthetic_recording(&data_path, &GeneratorConfig::default()).unwrap();

        let pair = locate_boundaries(&data_path).unwrap();
        assert_eq!((pair.start, pair.end), (500_000, 2_500_000));
        assert_eq!(locate_text_markers(&data_path).unwrap().len(), 2);

        let reader = CaptureReader::open(&data_path).unwrap();
        let info = reader.signal_lookup(POWER_SIGNAL).unwrap();
        assert_eq!(info.sample_count, 30_000);
        assert_eq!(info.units, "mW");
    }
}
