use crate::timeaxis::{linspace, TimeUnit};
use crate::{PlotSpec, RenderError, RenderResult, RenderSummary};
use powerwin::math::StatsHelper;
use std::path::PathBuf;

/// Text marker placed on the secondary axis.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerTick {
    pub glyph: String,
    /// Offset from the window start, in display units.
    pub offset: f64,
    pub legend: String,
}

/// Display-ready geometry of a chart. Series are truncated to a common
/// length and every time value is in `unit`.
#[derive(Debug, Clone)]
pub struct ChartLayout<'a> {
    pub unit: TimeUnit,
    pub x_max: f64,
    pub y_max: f64,
    pub time_axis: Vec<f64>,
    pub series: Vec<&'a [f32]>,
    pub labels: Vec<Option<&'a str>>,
    pub markers: Vec<MarkerTick>,
    pub y_units: &'a str,
}

/// `①`..`⑳`, then `(21)` onwards.
pub fn marker_glyph(position: usize) -> String {
    match position {
        1..=20 => char::from_u32(0x2460 + position as u32 - 1)
            .map(String::from)
            .unwrap_or_else(|| format!("({})", position)),
        _ => format!("({})", position),
    }
}

impl<'a> ChartLayout<'a> {
    pub fn build(spec: &'a PlotSpec) -> RenderResult<Self> {
        let common = spec
            .series
            .iter()
            .map(|series| series.len())
            .min()
            .ok_or_else(|| RenderError::EmptySeries("no series supplied".into()))?;
        if common == 0 {
            return Err(RenderError::EmptySeries(format!(
                "{} series without buckets",
                spec.series.iter().filter(|s| s.is_empty()).count()
            )));
        }
        let longest = spec.series.iter().map(|s| s.len()).max().unwrap_or(common);
        if longest != common {
            log::warn!(
                "series lengths differ ({}..{}), truncating all to {}",
                common,
                longest,
                common
            );
        }

        let span_us = spec.window.span_us();
        let unit = TimeUnit::for_span(span_us);
        let x_max = unit.scale(span_us);

        let series: Vec<&[f32]> = spec
            .series
            .iter()
            .map(|s| &s.values[..common])
            .collect();
        let y_max = StatsHelper::finite_max(series.iter().flat_map(|values| values.iter()))
            .filter(|max| *max > 0.0)
            .map(f64::from)
            .unwrap_or(1.0);

        let labels = (0..series.len())
            .map(|index| spec.labels.get(index).and_then(|label| label.as_deref()))
            .collect();

        let markers = spec
            .markers
            .iter()
            .enumerate()
            .map(|(index, marker)| {
                let glyph = marker_glyph(index + 1);
                let offset = unit.scale(marker.timestamp - spec.window.start);
                let legend = format!(
                    "{} ({}, {:.2} {})",
                    glyph,
                    marker.label,
                    offset,
                    unit.symbol()
                );
                MarkerTick {
                    glyph,
                    offset,
                    legend,
                }
            })
            .collect();

        Ok(Self {
            unit,
            x_max,
            y_max,
            time_axis: linspace(x_max, common),
            series,
            labels,
            markers,
            y_units: spec.series[0].units.as_str(),
        })
    }

    pub fn point_count(&self) -> usize {
        self.time_axis.len()
    }

    /// Series legend is drawn only when at least one label was given.
    pub fn has_series_legend(&self) -> bool {
        self.labels.iter().any(Option::is_some)
    }

    pub fn has_legend(&self) -> bool {
        self.has_series_legend() || !self.markers.is_empty()
    }

    pub fn x_description(&self) -> String {
        format!("t / {}", self.unit.symbol())
    }

    pub fn y_description(&self, quantity: &str) -> String {
        if self.y_units.is_empty() {
            quantity.to_string()
        } else {
            format!("{} / {}", quantity, self.y_units)
        }
    }

    /// Glyph of the marker closest to `offset`.
    pub fn glyph_at(&self, offset: f64) -> String {
        self.markers
            .iter()
            .min_by(|a, b| {
                (a.offset - offset)
                    .abs()
                    .total_cmp(&(b.offset - offset).abs())
            })
            .map(|marker| marker.glyph.clone())
            .unwrap_or_default()
    }

    pub fn summary(&self, path: PathBuf) -> RenderSummary {
        RenderSummary {
            path,
            unit: self.unit,
            x_max: self.x_max,
            y_max: self.y_max,
            point_count: self.point_count(),
            series_count: self.series.len(),
            marker_count: self.markers.len(),
        }
    }
}
