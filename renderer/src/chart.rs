use crate::config::RendererConfig;
use crate::layout::ChartLayout;
use crate::{RenderError, RenderResult};
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::{CoordTranslate, Shift};
use plotters::prelude::*;
use std::fmt::Display;
use std::ops::Range;

fn draw_error<E: Display>(err: E) -> RenderError {
    RenderError::Draw(err.to_string())
}

fn font_family(name: &str) -> FontFamily<'_> {
    match name {
        "serif" => FontFamily::Serif,
        "sans-serif" => FontFamily::SansSerif,
        "monospace" => FontFamily::Monospace,
        other => FontFamily::Name(other),
    }
}

/// Time axis whose only ticks sit at the marker offsets.
struct MarkerAxis {
    span: RangedCoordf64,
    offsets: Vec<f64>,
}

impl MarkerAxis {
    fn new(x_max: f64, offsets: Vec<f64>) -> Self {
        Self {
            span: (0f64..x_max).into(),
            offsets,
        }
    }
}

impl Ranged for MarkerAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.span.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.offsets.clone()
    }

    fn range(&self) -> Range<f64> {
        self.span.range()
    }
}

/// Draws the window chart onto `root` and flushes the backend.
pub fn draw<DB>(
    root: DrawingArea<DB, Shift>,
    layout: &ChartLayout<'_>,
    config: &RendererConfig,
) -> RenderResult<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(draw_error)?;

    let font = FontDesc::new(
        font_family(&config.font_family),
        config.font_size,
        FontStyle::Normal,
    );

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(15)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 45);
    if !layout.markers.is_empty() {
        builder.set_label_area_size(LabelAreaPosition::Top, 30);
    }
    let mut chart = builder
        .build_cartesian_2d(0f64..layout.x_max, 0f64..layout.y_max)
        .map_err(draw_error)?;

    chart
        .configure_mesh()
        .x_desc(layout.x_description())
        .y_desc(layout.y_description(&config.y_label))
        .label_style(font.clone())
        .axis_desc_style(font.clone())
        .light_line_style(&TRANSPARENT)
        .bold_line_style(&BLACK.mix(0.15))
        .draw()
        .map_err(draw_error)?;

    for (index, values) in layout.series.iter().enumerate() {
        let [r, g, b] = config.rgb_for(index);
        let color = RGBColor(r, g, b);
        let points = layout
            .time_axis
            .iter()
            .copied()
            .zip(values.iter().map(|&v| f64::from(v)));
        let drawn = chart
            .draw_series(LineSeries::new(points, color.stroke_width(1)))
            .map_err(draw_error)?;
        if let Some(label) = layout.labels.get(index).copied().flatten() {
            drawn
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
    }

    if layout.markers.is_empty() {
        draw_legend(&mut chart, layout, &font)?;
    } else {
        let offsets: Vec<f64> = layout.markers.iter().map(|m| m.offset).collect();
        let mut chart = chart.set_secondary_coord(
            MarkerAxis::new(layout.x_max, offsets),
            0f64..layout.y_max,
        );
        let glyph_at = |offset: &f64| layout.glyph_at(*offset);
        chart
            .configure_secondary_axes()
            .x_labels(layout.markers.len())
            .x_label_formatter(&glyph_at)
            .label_style(font.clone())
            .draw()
            .map_err(draw_error)?;

        for marker in &layout.markers {
            chart
                .draw_series(LineSeries::new(
                    vec![(marker.offset, 0.0), (marker.offset, layout.y_max)],
                    &BLACK.mix(0.35),
                ))
                .map_err(draw_error)?
                .label(marker.legend.clone())
                .legend(|(x, y)| Circle::new((x + 10, y), 3, BLACK.filled()));
        }
        draw_legend(&mut *chart, layout, &font)?;
    }

    root.present().map_err(draw_error)?;
    Ok(())
}

fn draw_legend<'a, DB, CT>(
    chart: &mut ChartContext<'a, DB, CT>,
    layout: &ChartLayout<'_>,
    font: &FontDesc<'_>,
) -> RenderResult<()>
where
    DB: DrawingBackend + 'a,
    CT: CoordTranslate,
{
    if !layout.has_legend() {
        return Ok(());
    }
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.3))
        .label_font(font.clone())
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(draw_error)
}
