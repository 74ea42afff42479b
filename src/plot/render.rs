//! PNG rendering with `plotters`.

use super::{
    viridis, AxisInfo, PlotKind, PlotRequest, Plotter, DPI, FIGURE_HEIGHT_IN, FIGURE_WIDTH_IN,
};
use crate::data::Statistics;
use crate::error::{OoiPlotError, Result};
use chrono::{DateTime, NaiveDateTime};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

const TITLE_LINE_HEIGHT: u32 = 34;
const TIME_AXIS_LABEL: &str = "Time (GMT)";

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Writes figures as PNG files of a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct PngPlotter {
    size: (u32, u32),
}

impl Default for PngPlotter {
    fn default() -> Self {
        Self {
            size: (
                (FIGURE_WIDTH_IN * DPI).round() as u32,
                (FIGURE_HEIGHT_IN * DPI).round() as u32,
            ),
        }
    }
}

impl PngPlotter {
    /// Create a plotter producing 12 x 8.5 inch figures at 150 DPI.
    pub fn new() -> Self {
        Self::default()
    }

    /// Figure size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

impl Plotter for PngPlotter {
    fn plot(&mut self, request: &PlotRequest) -> Result<()> {
        debug!("Rendering {}", request.output.display());
        if let Some(dir) = request.output.parent() {
            std::fs::create_dir_all(dir)?;
        }

        // The drawing area and its pixel buffer live only for this call.
        let root = BitMapBackend::new(&request.output, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(OoiPlotError::render)?;

        let title_height = TITLE_LINE_HEIGHT * (request.title.lines().count() as u32 + 1);
        let (title_area, body) = root.split_vertically(title_height as i32);
        draw_title(&title_area, &request.title)?;

        match (request.kind, &request.depth) {
            (PlotKind::DepthProfile, Some((depth, depth_axis))) => {
                draw_depth_profile(&body, request, depth, depth_axis)?
            }
            (PlotKind::DepthProfile, None) => {
                return Err(OoiPlotError::Render(format!(
                    "depth profile {} has no depth data",
                    request.output.display()
                )))
            }
            (PlotKind::Timeseries, _) => draw_timeseries(&body, request)?,
        }

        root.present().map_err(OoiPlotError::render)?;
        Ok(())
    }
}

fn draw_title(area: &Area<'_>, title: &str) -> Result<()> {
    let (width, _) = area.dim_in_pixel();
    let style = TextStyle::from(("sans-serif", 26).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (i, line) in title.lines().enumerate() {
        let y = (TITLE_LINE_HEIGHT / 2 + i as u32 * TITLE_LINE_HEIGHT) as i32;
        area.draw_text(line, &style, (width as i32 / 2, y))
            .map_err(OoiPlotError::render)?;
    }
    Ok(())
}

fn draw_timeseries(area: &Area<'_>, request: &PlotRequest) -> Result<()> {
    let points: Vec<(f64, f64)> = request
        .time
        .iter()
        .map(epoch_seconds)
        .zip(request.values.iter().copied())
        .collect();

    let (x0, x1) = padded_range(points.iter().map(|p| p.0), 3600.0);
    let (y0, y1) = padded_range(points.iter().map(|p| p.1), 1.0);

    let mut chart = ChartBuilder::on(area)
        .margin(25)
        .x_label_area_size(60)
        .y_label_area_size(110)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(OoiPlotError::render)?;

    chart
        .configure_mesh()
        .x_desc(TIME_AXIS_LABEL)
        .y_desc(request.value_axis.description())
        .x_labels(8)
        .x_label_formatter(&|v| format_epoch(*v))
        .label_style(("sans-serif", 18))
        .draw()
        .map_err(OoiPlotError::render)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &RED))
        .map_err(OoiPlotError::render)?;
    chart
        .draw_series(points.iter().map(|&p| Circle::new(p, 3, RED.filled())))
        .map_err(OoiPlotError::render)?;

    Ok(())
}

fn draw_depth_profile(
    area: &Area<'_>,
    request: &PlotRequest,
    depth: &[f64],
    depth_axis: &AxisInfo,
) -> Result<()> {
    // (time, -depth, value): depth is negated so it increases downwards.
    let points: Vec<(f64, f64, f64)> = request
        .time
        .iter()
        .zip(depth)
        .zip(&request.values)
        .filter(|((_, d), v)| d.is_finite() && v.is_finite())
        .map(|((t, d), v)| (epoch_seconds(t), -d, *v))
        .collect();

    let (value_min, value_max) = Statistics::compute(points.iter().map(|p| &p.2))
        .min_max
        .unwrap_or((0.0, 1.0));
    let span = if value_max > value_min { value_max - value_min } else { 1.0 };

    let (width, _) = area.dim_in_pixel();
    let (chart_area, bar_area) = area.split_horizontally(width.saturating_sub(170) as i32);

    let (x0, x1) = padded_range(points.iter().map(|p| p.0), 3600.0);
    let (y0, y1) = padded_range(points.iter().map(|p| p.1), 1.0);

    let mut chart = ChartBuilder::on(&chart_area)
        .margin(25)
        .x_label_area_size(60)
        .y_label_area_size(110)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(OoiPlotError::render)?;

    chart
        .configure_mesh()
        .x_desc(TIME_AXIS_LABEL)
        .y_desc(depth_axis.description())
        .x_labels(8)
        .x_label_formatter(&|v| format_epoch(*v))
        .y_label_formatter(&|v| format!("{:.1}", -v))
        .label_style(("sans-serif", 18))
        .draw()
        .map_err(OoiPlotError::render)?;

    chart
        .draw_series(points.iter().map(|&(x, y, v)| {
            Circle::new((x, y), 3, viridis((v - value_min) / span).filled())
        }))
        .map_err(OoiPlotError::render)?;

    draw_colorbar(&bar_area, &request.value_axis, value_min, value_max)
}

fn draw_colorbar(area: &Area<'_>, axis: &AxisInfo, min: f64, max: f64) -> Result<()> {
    const STEPS: i32 = 100;
    let (_, height) = area.dim_in_pixel();
    let top = 40;
    let bottom = height as i32 - 100;
    let step = ((bottom - top) / STEPS).max(1);

    for i in 0..STEPS {
        let y = bottom - (i + 1) * step;
        let color = viridis(i as f64 / (STEPS - 1) as f64);
        area.draw(&Rectangle::new([(20, y), (50, y + step)], color.filled()))
            .map_err(OoiPlotError::render)?;
    }

    let style = TextStyle::from(("sans-serif", 16).into_font()).color(&BLACK);
    let bar_top = bottom - STEPS * step;
    area.draw_text(&format!("{:.3}", max), &style, (56, bar_top))
        .map_err(OoiPlotError::render)?;
    area.draw_text(&format!("{:.3}", min), &style, (56, bottom - 16))
        .map_err(OoiPlotError::render)?;
    area.draw_text(&axis.description(), &style, (4, bottom + 20))
        .map_err(OoiPlotError::render)?;
    Ok(())
}

fn epoch_seconds(t: &NaiveDateTime) -> f64 {
    t.and_utc().timestamp() as f64
}

fn format_epoch(seconds: f64) -> String {
    DateTime::from_timestamp(seconds.round() as i64, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Bounds of `values`, widened by `pad` on each side when they coincide and
/// by 5% otherwise.
fn padded_range(values: impl Iterator<Item = f64>, pad: f64) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    if max > min {
        let margin = (max - min) * 0.05;
        (min - margin, max + margin)
    } else {
        (min - pad, max + pad)
    }
}
