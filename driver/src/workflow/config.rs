use anyhow::Context;
use powerwin_render::{OutputFormat, RendererConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_RESOLUTION: usize = 1000;

/// Which annotations besides the boundaries end up on the chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerMode {
    None,
    Text,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Target number of buckets per series.
    pub resolution: usize,
    pub marker_mode: MarkerMode,
    /// Write a JSON description next to the chart.
    pub summary: bool,
    pub renderer: RendererConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            marker_mode: MarkerMode::None,
            summary: false,
            renderer: RendererConfig::default(),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub resolution: Option<usize>,
    pub text_markers: bool,
    pub summary: bool,
    pub output_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

impl PipelineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading pipeline config {}", path_ref.display()))?;
        let config: PipelineConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing pipeline config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(resolution) = overrides.resolution {
            self.resolution = resolution;
        }
        if overrides.text_markers {
            self.marker_mode = MarkerMode::Text;
        }
        if overrides.summary {
            self.summary = true;
        }
        if let Some(dir) = overrides.output_dir.as_ref() {
            self.renderer.output_dir = dir.clone();
        }
        if let Some(format) = overrides.format {
            self.renderer.format = format;
        }
        self
    }
}
