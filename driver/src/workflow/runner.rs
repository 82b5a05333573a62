use crate::workflow::config::{MarkerMode, PipelineConfig};
use anyhow::{bail, Context};
use powerwin::prelude::{
    annotation_path, extract_window, locate_boundaries, locate_text_markers, WindowError,
};
use powerwin::BoundaryPair;
use powerwin_render::naming::explicit_stem;
use powerwin_render::{output_stem, PlotSpec, RenderSummary, Renderer};
use std::fs;
use std::path::PathBuf;

/// One run of the pipeline as requested on the command line.
#[derive(Clone, Debug, Default)]
pub struct Invocation {
    pub data_files: Vec<PathBuf>,
    /// Reference recordings drawn after the data files.
    pub overlays: Vec<PathBuf>,
    pub labels: Vec<String>,
    pub output_name: Option<String>,
    pub show: bool,
}

pub struct PipelineReport {
    pub summary: RenderSummary,
    /// Buckets actually produced per series.
    pub resolutions: Vec<usize>,
    pub summary_path: Option<PathBuf>,
}

#[derive(Clone)]
pub struct Runner {
    config: PipelineConfig,
}

impl Runner {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Reads every input and assembles the chart description. Nothing is
    /// written.
    pub fn prepare(&self, invocation: &Invocation) -> anyhow::Result<(PlotSpec, Vec<usize>)> {
        let primary = match invocation.data_files.first() {
            Some(path) => path.clone(),
            None => bail!("no data files given"),
        };

        let inputs: Vec<&PathBuf> = invocation
            .data_files
            .iter()
            .chain(invocation.overlays.iter())
            .collect();
        for path in &inputs {
            if !path.is_file() {
                return Err(WindowError::MissingFile(path.to_path_buf()))
                    .context("checking input recordings");
            }
            let annotations = annotation_path(path);
            if !annotations.is_file() {
                return Err(WindowError::MissingFile(annotations))
                    .context("checking input annotations");
            }
        }

        let mut window: Option<BoundaryPair> = None;
        let mut series = Vec::with_capacity(inputs.len());
        let mut resolutions = Vec::with_capacity(inputs.len());
        for path in inputs {
            let boundaries = locate_boundaries(path)
                .with_context(|| format!("locating boundary markers for {}", path.display()))?;
            let (power, used) = extract_window(path, &boundaries, self.config.resolution)
                .with_context(|| format!("extracting window from {}", path.display()))?;
            log::info!(
                "{}: {} buckets (requested {})",
                path.display(),
                used,
                self.config.resolution
            );
            window.get_or_insert(boundaries);
            series.push(power);
            resolutions.push(used);
        }
        let window = window.context("no window located")?;

        let markers = match self.config.marker_mode {
            MarkerMode::Text => locate_text_markers(&primary)
                .with_context(|| format!("reading text markers for {}", primary.display()))?,
            MarkerMode::None => Vec::new(),
        };

        if invocation.labels.len() > series.len() {
            log::warn!(
                "{} labels for {} series, extra labels ignored",
                invocation.labels.len(),
                series.len()
            );
        }
        let labels = invocation.labels.iter().cloned().map(Some).collect();

        let output_name = match invocation.output_name.as_deref() {
            Some(name) => explicit_stem(name).unwrap_or_else(|| {
                log::warn!("output name {:?} has no file name, deriving one", name);
                output_stem(&primary)
            }),
            None => output_stem(&primary),
        };

        let spec = PlotSpec {
            series,
            window,
            markers,
            labels,
            output_name,
            show: invocation.show,
        };
        Ok((spec, resolutions))
    }

    pub fn execute(&self, invocation: &Invocation) -> anyhow::Result<PipelineReport> {
        let (spec, resolutions) = self.prepare(invocation)?;
        let renderer = Renderer::new(self.config.renderer.clone());
        let summary = renderer
            .render(&spec)
            .with_context(|| format!("rendering {}", spec.output_name))?;

        let summary_path = if self.config.summary {
            let path = summary.path.with_extension("json");
            let json = serde_json::to_string_pretty(&summary).context("encoding chart summary")?;
            fs::write(&path, json)
                .with_context(|| format!("writing chart summary {}", path.display()))?;
            Some(path)
        } else {
            None
        };

        Ok(PipelineReport {
            summary,
            resolutions,
            summary_path,
        })
    }

    /// Structure the chart would have, without drawing it.
    pub fn plan(&self, invocation: &Invocation) -> anyhow::Result<RenderSummary> {
        let (spec, _) = self.prepare(invocation)?;
        let renderer = Renderer::new(self.config.renderer.clone());
        renderer
            .plan(&spec)
            .with_context(|| format!("laying out {}", spec.output_name))
    }
}
