use std::path::Path;

use eyre::Error;
use model::{AggregateSeries, KarmaError};
use plotters::prelude::*;

const CHART_SIZE: (u32, u32) = (800, 600);

/// Draws a single-series bar chart (no legend) and writes it as a PNG.
/// The backend is presented before returning, so the file is complete
/// once this succeeds.
pub fn render_bar_chart(series: &AggregateSeries, title: &str, path: &Path) -> Result<(), Error> {
    if series.is_empty() {
        return Err(KarmaError::Render("refusing to draw an empty series".to_string()).into());
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|err| KarmaError::Render(format!("creating {}: {}", dir.display(), err)))?;
    }

    let labels: Vec<&str> = series
        .entries()
        .iter()
        .map(|entry| entry.label.as_str())
        .collect();
    let max_value = series
        .entries()
        .iter()
        .map(|entry| entry.value)
        .max()
        .unwrap_or(1)
        .max(1);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(50)
        .build_cartesian_2d(
            (0..labels.len()).into_segmented(),
            0u64..max_value + max_value / 10 + 1,
        )
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(idx) if *idx < labels.len() => labels[*idx].to_string(),
            _ => String::new(),
        })
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(series.entries().iter().enumerate().map(|(idx, entry)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(idx), 0u64),
                    (SegmentValue::Exact(idx + 1), entry.value),
                ],
                BLUE.filled(),
            )
        }))
        .map_err(render_err)?;

    root.present()
        .map_err(|err| KarmaError::Render(format!("writing {}: {}", path.display(), err)))?;
    log::info!("rendered {} to {}", title, path.display());
    Ok(())
}

fn render_err<E: std::fmt::Display>(err: E) -> Error {
    KarmaError::Render(err.to_string()).into()
}
