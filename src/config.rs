//! Per-invocation settings.

use crate::data::TIME_VARIABLE;
use crate::error::Result;
use crate::plot::PlotKind;
use crate::segment::SegmentMode;
use crate::select::{ExclusionPreset, ExclusionSet};
use std::path::PathBuf;

/// Default depth coordinate for depth profiles.
pub const DEFAULT_DEPTH_VARIABLE: &str = "pressure";

/// Default outlier threshold, in standard deviations.
pub const DEFAULT_OUTLIER_STDEV: f64 = 3.0;

/// Everything one run needs, passed explicitly to the pipeline.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Root of the output directory tree.
    pub out_dir: PathBuf,
    /// Kind of figure to produce.
    pub kind: PlotKind,
    /// How the time axis is split.
    pub segment_mode: SegmentMode,
    /// Fragments marking non-science variables.
    pub exclusions: ExclusionSet,
    /// Variable used as the vertical axis of depth profiles.
    pub depth_variable: String,
    /// Time coordinate variable, `time` unless a stream stores it elsewhere.
    pub time_variable: String,
    /// Samples further than this many standard deviations from the mean are
    /// dropped from the outliers-removed timeseries.
    pub outlier_stdev: f64,
}

impl PlotConfig {
    /// Timeseries settings with the standard exclusions, bisected windows and
    /// a 3-sigma outlier threshold.
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            out_dir: out_dir.into(),
            kind: PlotKind::default(),
            segment_mode: SegmentMode::default(),
            exclusions: ExclusionSet::from_preset(
                ExclusionPreset::default(),
                Vec::<String>::new(),
            )?,
            depth_variable: DEFAULT_DEPTH_VARIABLE.to_string(),
            time_variable: TIME_VARIABLE.to_string(),
            outlier_stdev: DEFAULT_OUTLIER_STDEV,
        })
    }
}
