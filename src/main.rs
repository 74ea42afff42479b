//! ooiplot - Plot science variables of OOI netCDF datasets.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use ooiplot::config::{PlotConfig, DEFAULT_DEPTH_VARIABLE, DEFAULT_OUTLIER_STDEV};
use ooiplot::data::manifest::{is_remote, resolve_inputs};
use ooiplot::data::TIME_VARIABLE;
use ooiplot::pipeline::{process_directory, process_source, ProcessSummary};
use ooiplot::plot::{DryRunPlotter, PlotKind, Plotter, PngPlotter};
use ooiplot::segment::SegmentMode;
use ooiplot::select::{ExclusionPreset, ExclusionSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "ooiplot")]
#[command(about = "Plot the science variables of OOI netCDF datasets", long_about = None)]
struct Args {
    /// URL or path of a .nc/.ncml file, a text file listing one per line
    /// (lines containing '#' are skipped), or a directory whose .nc files are
    /// plotted together
    files: String,

    /// Directory to save plots in
    out: PathBuf,

    /// Kind of plot to produce
    #[arg(long, value_enum, default_value_t = KindArg::Timeseries)]
    kind: KindArg,

    /// Time windows: whole, bisect, or a calendar unit
    /// (year, month, day, hour, dayofyear; a "time." prefix is accepted)
    #[arg(long, default_value = "bisect")]
    segment: SegmentMode,

    /// Depth variable for depth profiles
    #[arg(long, default_value = DEFAULT_DEPTH_VARIABLE)]
    depth: String,

    /// Time coordinate variable (e.g. met_timeflx for METBK hourly streams)
    #[arg(long, default_value = TIME_VARIABLE)]
    time_variable: String,

    /// Built-in list of name fragments that mark non-science variables
    #[arg(long, value_enum, default_value_t = PresetArg::Standard)]
    preset: PresetArg,

    /// Additional name fragment to exclude (repeatable)
    #[arg(long = "exclude", value_name = "FRAGMENT")]
    exclude: Vec<String>,

    /// Outlier threshold in standard deviations
    #[arg(long, default_value_t = DEFAULT_OUTLIER_STDEV)]
    stdev: f64,

    /// Print the files that would be written without rendering
    #[arg(long)]
    dry_run: bool,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Timeseries,
    DepthProfile,
}

impl From<KindArg> for PlotKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Timeseries => PlotKind::Timeseries,
            KindArg::DepthProfile => PlotKind::DepthProfile,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    Standard,
    Minimal,
    Metbk,
}

impl From<PresetArg> for ExclusionPreset {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Standard => ExclusionPreset::Standard,
            PresetArg::Minimal => ExclusionPreset::Minimal,
            PresetArg::Metbk => ExclusionPreset::Metbk,
        }
    }
}

impl Args {
    fn to_config(&self) -> Result<PlotConfig> {
        if !(self.stdev.is_finite() && self.stdev > 0.0) {
            bail!("--stdev must be a positive number, got {}", self.stdev);
        }
        let exclusions = ExclusionSet::from_preset(self.preset.into(), self.exclude.iter().cloned())
            .context("Invalid --exclude fragment")?;

        Ok(PlotConfig {
            out_dir: self.out.clone(),
            kind: self.kind.into(),
            segment_mode: self.segment,
            exclusions,
            depth_variable: self.depth.clone(),
            time_variable: self.time_variable.clone(),
            outlier_stdev: self.stdev,
        })
    }
}

fn init_logging(log: Option<&PathBuf>) -> Result<()> {
    if let Some(log_path) = log {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_ref())?;
    info!("Starting ooiplot");

    // Validate path if local
    if !is_remote(&args.files) && !Path::new(&args.files).exists() {
        eprintln!("Error: Path not found: {}", args.files);
        std::process::exit(1);
    }

    let config = args.to_config()?;
    let mut plotter: Box<dyn Plotter> = if args.dry_run {
        Box::new(DryRunPlotter::default())
    } else {
        Box::new(PngPlotter::new())
    };

    let report = |source: &str, result: ooiplot::Result<ProcessSummary>| match result {
        Ok(summary) => {
            info!(
                "{}: {} figures, {} skipped",
                source, summary.figures, summary.skipped
            );
            true
        }
        Err(err) => {
            error!("{}: {}", source, err);
            if args.log.is_some() {
                eprintln!("Error: {}: {}", source, err);
            }
            false
        }
    };

    let dir = Path::new(&args.files);
    let (inputs, failed) = if dir.is_dir() {
        let ok = report(&args.files, process_directory(dir, &config, plotter.as_mut()));
        (vec![args.files.clone()], usize::from(!ok))
    } else {
        let inputs = resolve_inputs(&args.files)
            .with_context(|| format!("Failed to read dataset list {}", args.files))?;
        let mut failed = 0usize;
        for source in &inputs {
            if !report(source, process_source(source, &config, plotter.as_mut())) {
                failed += 1;
            }
        }
        (inputs, failed)
    };

    info!("ooiplot exited");
    if failed > 0 {
        bail!("{} of {} datasets failed", failed, inputs.len());
    }
    Ok(())
}
