use crate::config::RendererConfig;
use crate::layout::ChartLayout;
use plotly::common::{Mode, Title};
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};

/// Builds the browser view of a chart layout.
pub fn build_plot(layout: &ChartLayout<'_>, config: &RendererConfig, title: &str) -> Plot {
    let mut plot = Plot::new();

    for (index, values) in layout.series.iter().enumerate() {
        let trace = Scatter::new(layout.time_axis.clone(), values.to_vec()).mode(Mode::Lines);
        let trace = match layout.labels.get(index).copied().flatten() {
            Some(label) => trace.name(label),
            None => trace.name(&format!("series {}", index + 1)).show_legend(false),
        };
        plot.add_trace(trace);
    }

    if !layout.markers.is_empty() {
        let offsets: Vec<f64> = layout.markers.iter().map(|m| m.offset).collect();
        let tops = vec![layout.y_max; offsets.len()];
        let legends: Vec<String> = layout.markers.iter().map(|m| m.legend.clone()).collect();
        let trace = Scatter::new(offsets, tops)
            .mode(Mode::MarkersText)
            .text_array(legends)
            .name("markers");
        plot.add_trace(trace);
    }

    let plot_layout = Layout::new()
        .title(Title::new(title))
        .x_axis(
            Axis::new()
                .title(Title::new(&layout.x_description()))
                .range(vec![0.0, layout.x_max]),
        )
        .y_axis(
            Axis::new()
                .title(Title::new(&layout.y_description(&config.y_label)))
                .range(vec![0.0, layout.y_max]),
        )
        .height(config.height as usize)
        .width(config.width as usize);
    plot.set_layout(plot_layout);
    plot
}

/// Opens the chart in the default browser.
pub fn show(layout: &ChartLayout<'_>, config: &RendererConfig, title: &str) {
    build_plot(layout, config, title).show();
}
