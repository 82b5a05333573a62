//! Renders marker-windowed power series into chart files.
//!
//! [`Renderer`] owns its [`RendererConfig`]; nothing here touches global
//! plotting state, so several renders in one process do not interfere.

pub mod chart;
pub mod config;
pub mod interactive;
pub mod layout;
pub mod naming;
pub mod timeaxis;

pub use config::{OutputFormat, RendererConfig};
pub use layout::{ChartLayout, MarkerTick};
pub use naming::{output_path, output_stem};
pub use timeaxis::TimeUnit;

use plotters::prelude::{BitMapBackend, IntoDrawingArea, SVGBackend};
use powerwin::{BoundaryPair, PowerSeries, TextMarker};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Everything needed to draw one chart.
#[derive(Debug, Clone)]
pub struct PlotSpec {
    pub series: Vec<PowerSeries>,
    pub window: BoundaryPair,
    pub markers: Vec<TextMarker>,
    /// One optional legend label per series, in series order.
    pub labels: Vec<Option<String>>,
    pub output_name: String,
    pub show: bool,
}

/// Structural description of a rendered chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub unit: TimeUnit,
    pub x_max: f64,
    pub y_max: f64,
    pub point_count: usize,
    pub series_count: usize,
    pub marker_count: usize,
}

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("nothing to plot: {0}")]
    EmptySeries(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("drawing failed: {0}")]
    Draw(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Lays the chart out without drawing it.
    pub fn plan(&self, spec: &PlotSpec) -> RenderResult<RenderSummary> {
        let layout = ChartLayout::build(spec)?;
        Ok(layout.summary(self.target(spec)))
    }

    /// Draws `spec` into the output directory and returns what was drawn.
    pub fn render(&self, spec: &PlotSpec) -> RenderResult<RenderSummary> {
        let layout = ChartLayout::build(spec)?;
        let path = self.target(spec);
        fs::create_dir_all(&self.config.output_dir)?;

        let size = (self.config.width, self.config.height);
        match self.config.format {
            OutputFormat::Svg => {
                chart::draw(
                    SVGBackend::new(&path, size).into_drawing_area(),
                    &layout,
                    &self.config,
                )?;
            }
            OutputFormat::Png => {
                chart::draw(
                    BitMapBackend::new(&path, size).into_drawing_area(),
                    &layout,
                    &self.config,
                )?;
            }
        }
        log::info!("chart written to {}", path.display());

        if spec.show {
            interactive::show(&layout, &self.config, &spec.output_name);
        }

        Ok(layout.summary(path))
    }

    fn target(&self, spec: &PlotSpec) -> PathBuf {
        output_path(&self.config.output_dir, &spec.output_name, self.config.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn series(len: usize, value: f32) -> PowerSeries {
        PowerSeries {
            source: PathBuf::from("data/deviceA/run1.jls"),
            units: "mW".into(),
            values: vec![value; len],
        }
    }

    fn spec() -> PlotSpec {
        PlotSpec {
            series: vec![series(1000, 1.0), series(998, 3.0)],
            window: BoundaryPair {
                start: 0,
                end: 2_000_000,
            },
            markers: vec![TextMarker {
                timestamp: 500_000,
                label: "radio".into(),
            }],
            labels: vec![Some("a".into()), Some("b".into())],
            output_name: "deviceA-run1".into(),
            show: false,
        }
    }

    #[test]
    fn plan_targets_the_configured_directory() {
        let renderer = Renderer::new(RendererConfig {
            output_dir: PathBuf::from("out"),
            ..Default::default()
        });
        let summary = renderer.plan(&spec()).unwrap();
        assert_eq!(summary.path, PathBuf::from("out/deviceA-run1.svg"));
        assert_eq!(summary.point_count, 998);
        assert_eq!(summary.series_count, 2);
        assert_eq!(summary.marker_count, 1);
        assert_eq!(summary.unit, TimeUnit::Seconds);
        assert_eq!(summary.y_max, 3.0);
    }

    #[test]
    fn planning_twice_gives_the_same_structure() {
        let renderer = Renderer::new(RendererConfig::default());
        assert_eq!(
            renderer.plan(&spec()).unwrap(),
            renderer.plan(&spec()).unwrap()
        );
    }

    #[test]
    fn empty_specs_are_rejected() {
        let renderer = Renderer::new(RendererConfig::default());
        let mut empty = spec();
        empty.series.clear();
        assert!(matches!(
            renderer.plan(&empty),
            Err(RenderError::EmptySeries(_))
        ));
    }

    fn render_into(dir: &std::path::Path, format: OutputFormat, spec: &PlotSpec) -> RenderSummary {
        let renderer = Renderer::new(RendererConfig {
            output_dir: dir.join("out"),
            format,
            ..Default::default()
        });
        renderer.render(spec).unwrap()
    }

    #[test]
    fn render_writes_svg_with_markers() {
        let dir = tempdir().unwrap();
        let summary = render_into(dir.path(), OutputFormat::Svg, &spec());
        assert_eq!(summary.path, dir.path().join("out").join("deviceA-run1.svg"));
        assert!(summary.path.is_file());
        let svg = fs::read_to_string(&summary.path).unwrap();
        assert!(svg.contains("<svg"));
        assert_eq!(summary.marker_count, 1);
    }

    #[test]
    fn render_writes_png_with_and_without_markers() {
        let dir = tempdir().unwrap();
        let marked = render_into(dir.path(), OutputFormat::Png, &spec());
        assert!(marked.path.is_file());

        let mut plain = spec();
        plain.markers.clear();
        plain.labels.clear();
        plain.output_name = "plain".into();
        let summary = render_into(dir.path(), OutputFormat::Png, &plain);
        assert_eq!(summary.path, dir.path().join("out").join("plain.png"));
        assert!(fs::metadata(&summary.path).unwrap().len() > 0);
    }

    #[test]
    fn render_writes_unlabelled_svg_without_markers() {
        let dir = tempdir().unwrap();
        let mut plain = spec();
        plain.markers.clear();
        plain.labels = vec![None, None];
        let summary = render_into(dir.path(), OutputFormat::Svg, &plain);
        assert!(summary.path.is_file());
        assert_eq!(summary.marker_count, 0);
    }
}
