//! Per-dataset orchestration: select variables, split time, build and hand
//! off plot requests.

use crate::config::PlotConfig;
use crate::data::{AggregateDataset, DatasetHandle, DatasetIdentity, NetcdfDataset};
use crate::error::{OoiPlotError, Result};
use crate::naming::{
    aggregate_output_dir, build_aggregate_save_name, build_aggregate_title, build_save_name,
    build_title, file_stem, output_dir, OUTLIERS_REMOVED_SUFFIX,
};
use crate::plot::{reject_outliers, AxisInfo, PlotKind, PlotRequest, Plotter};
use crate::segment::{time_windows, SegmentMode, TimeSegment, TimeWindow};
use crate::select::select_science_variables;
use chrono::NaiveDateTime;
use ndarray::Array1;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What processing one dataset produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    /// Figures handed to the plotter.
    pub figures: usize,
    /// (variable, window) combinations skipped.
    pub skipped: usize,
}

/// Open `source` and plot it.
pub fn process_source<P: Plotter + ?Sized>(
    source: &str,
    config: &PlotConfig,
    plotter: &mut P,
) -> Result<ProcessSummary> {
    info!("Processing {}", source);
    let dataset = NetcdfDataset::open_with_time(source, &config.time_variable)?;
    process_dataset(&dataset, config, plotter)
}

/// Join every `.nc` file under `dir` and plot each science variable once over
/// the whole record. Figures are named after the first file.
pub fn process_directory<P: Plotter + ?Sized>(
    dir: &Path,
    config: &PlotConfig,
    plotter: &mut P,
) -> Result<ProcessSummary> {
    info!("Processing directory {}", dir.display());
    let dataset = AggregateDataset::open_dir(dir, &config.time_variable)?;
    let stem = dataset.files().first().map(|f| file_stem(f)).unwrap_or_default();
    let naming = Naming::Aggregate {
        save_dir: aggregate_output_dir(&config.out_dir, &stem, config.kind),
        stem,
    };
    plot_dataset(&dataset, config, SegmentMode::Whole, &naming, plotter)
}

/// Plot every science variable of `dataset` over every time window.
pub fn process_dataset<D, P>(
    dataset: &D,
    config: &PlotConfig,
    plotter: &mut P,
) -> Result<ProcessSummary>
where
    D: DatasetHandle + ?Sized,
    P: Plotter + ?Sized,
{
    let naming = Naming::Dataset {
        save_dir: output_dir(&config.out_dir, dataset.identity(), config.kind),
    };
    plot_dataset(dataset, config, config.segment_mode, &naming, plotter)
}

/// How figures of one run are titled and named.
enum Naming {
    /// Per-deployment tree with time-stamped names.
    Dataset { save_dir: PathBuf },
    /// Joined files, named after the first file.
    Aggregate { save_dir: PathBuf, stem: String },
}

impl Naming {
    fn save_dir(&self) -> &Path {
        match self {
            Self::Dataset { save_dir } | Self::Aggregate { save_dir, .. } => save_dir,
        }
    }

    fn title(&self, identity: &DatasetIdentity, variable: &str, segment: &TimeSegment) -> String {
        match self {
            Self::Dataset { .. } => build_title(identity, variable, segment),
            Self::Aggregate { .. } => build_aggregate_title(identity),
        }
    }

    fn save_name(
        &self,
        identity: &DatasetIdentity,
        variable: &str,
        segment: &TimeSegment,
    ) -> String {
        match self {
            Self::Dataset { .. } => build_save_name(identity, variable, segment),
            Self::Aggregate { stem, .. } => build_aggregate_save_name(stem, variable),
        }
    }
}

fn plot_dataset<D, P>(
    dataset: &D,
    config: &PlotConfig,
    mode: SegmentMode,
    naming: &Naming,
    plotter: &mut P,
) -> Result<ProcessSummary>
where
    D: DatasetHandle + ?Sized,
    P: Plotter + ?Sized,
{
    let identity = dataset.identity();
    let time = dataset.time();
    let science = select_science_variables(dataset.variable_names(), &config.exclusions);
    let windows = time_windows(time, mode)?;

    info!(
        "{}: {} science variables, {} windows ({})",
        dataset.source(),
        science.len(),
        windows.len(),
        mode
    );

    let depth = match config.kind {
        PlotKind::DepthProfile => {
            let variable = dataset.load_variable(&config.depth_variable)?;
            let axis = AxisInfo::new(variable.meta.label(), variable.meta.units());
            Some((variable.series(time.len())?, axis))
        }
        PlotKind::Timeseries => None,
    };

    let mut summary = ProcessSummary::default();
    for window in &windows {
        for name in &science {
            info!("{}", name);

            let variable = match dataset.load_variable(name) {
                Ok(variable) => variable,
                Err(e @ OoiPlotError::UnsupportedVariable { .. }) => {
                    warn!("Skipping: {}", e);
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            let values = match variable.series(time.len()) {
                Ok(values) => values,
                Err(e) => {
                    warn!("Skipping: {}", e);
                    summary.skipped += 1;
                    continue;
                }
            };

            let title = naming.title(identity, name, &window.segment);
            let save_name = naming.save_name(identity, name, &window.segment);
            let value_axis = AxisInfo::new(variable.meta.label(), variable.meta.units());
            let target = Target {
                dir: naming.save_dir(),
                name: &save_name,
                extension: plotter.file_extension(),
            };

            let requests = match &depth {
                None => timeseries_requests(
                    time,
                    &values,
                    window,
                    config.outlier_stdev,
                    title,
                    value_axis,
                    &target,
                ),
                Some((depth_values, depth_axis)) => depth_requests(
                    time,
                    &values,
                    (depth_values, depth_axis),
                    window,
                    title,
                    value_axis,
                    &target,
                ),
            };

            if requests.is_empty() {
                debug!("{} has no finite data in window {:?}", name, window.segment);
                summary.skipped += 1;
                continue;
            }

            for request in &requests {
                plotter.plot(request)?;
                summary.figures += 1;
            }
        }
    }

    Ok(summary)
}

/// Where the figures of one (variable, window) pair are written.
struct Target<'a> {
    dir: &'a Path,
    name: &'a str,
    extension: &'a str,
}

impl Target<'_> {
    fn path(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}{}.{}", self.name, suffix, self.extension))
    }
}

/// Finite samples of `values` selected by `window`.
fn select_finite(
    time: &[NaiveDateTime],
    values: &Array1<f64>,
    window: &TimeWindow,
) -> (Vec<NaiveDateTime>, Vec<f64>) {
    window
        .indices
        .iter()
        .filter(|&&i| values[i].is_finite())
        .map(|&i| (time[i], values[i]))
        .unzip()
}

fn timeseries_requests(
    time: &[NaiveDateTime],
    values: &Array1<f64>,
    window: &TimeWindow,
    stdev: f64,
    title: String,
    value_axis: AxisInfo,
    target: &Target<'_>,
) -> Vec<PlotRequest> {
    let (t, v) = select_finite(time, values, window);
    if v.is_empty() {
        return Vec::new();
    }
    let (clean_t, clean_v) = reject_outliers(&t, &v, stdev);

    let all = PlotRequest {
        kind: PlotKind::Timeseries,
        title: title.clone(),
        time: t,
        values: v,
        value_axis: value_axis.clone(),
        depth: None,
        output: target.path(""),
    };
    let cleaned = PlotRequest {
        kind: PlotKind::Timeseries,
        title,
        time: clean_t,
        values: clean_v,
        value_axis,
        depth: None,
        output: target.path(OUTLIERS_REMOVED_SUFFIX),
    };
    vec![all, cleaned]
}

fn depth_requests(
    time: &[NaiveDateTime],
    values: &Array1<f64>,
    (depth, depth_axis): (&Array1<f64>, &AxisInfo),
    window: &TimeWindow,
    title: String,
    value_axis: AxisInfo,
    target: &Target<'_>,
) -> Vec<PlotRequest> {
    let mut t = Vec::new();
    let mut v = Vec::new();
    let mut d = Vec::new();
    for &i in &window.indices {
        if values[i].is_finite() && depth[i].is_finite() {
            t.push(time[i]);
            v.push(values[i]);
            d.push(depth[i]);
        }
    }
    if v.is_empty() {
        return Vec::new();
    }

    vec![PlotRequest {
        kind: PlotKind::DepthProfile,
        title,
        time: t,
        values: v,
        value_axis,
        depth: Some((d, depth_axis.clone())),
        output: target.path(""),
    }]
}
