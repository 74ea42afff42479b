//! Plot requests and the plotting collaborator.
//!
//! The pipeline builds one [`PlotRequest`] per figure and hands it to a
//! [`Plotter`], which owns every figure resource for the duration of the call.

mod colormaps;
mod render;

pub use colormaps::viridis;
pub use render::PngPlotter;

use crate::data::Statistics;
use crate::error::Result;
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Figure width in inches.
pub const FIGURE_WIDTH_IN: f64 = 12.0;

/// Figure height in inches.
pub const FIGURE_HEIGHT_IN: f64 = 8.5;

/// Output resolution.
pub const DPI: f64 = 150.0;

/// Kind of figure produced for a (variable, window) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotKind {
    /// Value against time.
    #[default]
    Timeseries,
    /// Depth against time, coloured by value.
    DepthProfile,
}

impl PlotKind {
    /// Directory the figures of this kind are saved in.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Timeseries => "timeseries",
            Self::DepthProfile => "depth_profiles",
        }
    }
}

/// Label and units of one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisInfo {
    /// Descriptive name.
    pub label: String,
    /// Units, possibly empty.
    pub units: String,
}

impl AxisInfo {
    /// Create axis info.
    pub fn new(label: impl Into<String>, units: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            units: units.into(),
        }
    }

    /// `label (units)`, or just the label when there are no units.
    pub fn description(&self) -> String {
        if self.units.is_empty() {
            self.label.clone()
        } else {
            format!("{} ({})", self.label, self.units)
        }
    }
}

/// Everything needed to draw and save one figure.
#[derive(Debug, Clone)]
pub struct PlotRequest {
    /// Kind of figure.
    pub kind: PlotKind,
    /// Multi-line title.
    pub title: String,
    /// Sample times.
    pub time: Vec<NaiveDateTime>,
    /// Variable values, finite, one per sample time.
    pub values: Vec<f64>,
    /// Variable axis (y for timeseries, colour for depth profiles).
    pub value_axis: AxisInfo,
    /// Depth per sample, only for depth profiles.
    pub depth: Option<(Vec<f64>, AxisInfo)>,
    /// Destination file.
    pub output: PathBuf,
}

/// Renders plot requests.
pub trait Plotter {
    /// Extension of the files this plotter writes.
    fn file_extension(&self) -> &'static str {
        "png"
    }

    /// Draw and save one figure.
    fn plot(&mut self, request: &PlotRequest) -> Result<()>;
}

/// Reports what would be written without rendering anything.
#[derive(Debug, Default)]
pub struct DryRunPlotter {
    /// Paths reported so far.
    pub planned: Vec<PathBuf>,
}

impl Plotter for DryRunPlotter {
    fn plot(&mut self, request: &PlotRequest) -> Result<()> {
        println!("{}", request.output.display());
        self.planned.push(request.output.clone());
        Ok(())
    }
}

/// Drop samples whose value lies more than `stdev` standard deviations from
/// the mean. Non-finite values are always dropped.
pub fn reject_outliers(
    time: &[NaiveDateTime],
    values: &[f64],
    stdev: f64,
) -> (Vec<NaiveDateTime>, Vec<f64>) {
    let stats = Statistics::compute(values);
    let keep = |v: f64| match (stats.mean, stats.std) {
        (Some(mean), Some(std)) => (v - mean).abs() <= stdev * std,
        _ => true,
    };

    time.iter()
        .zip(values)
        .filter(|(_, v)| v.is_finite() && keep(**v))
        .map(|(t, v)| (*t, *v))
        .unzip()
}
