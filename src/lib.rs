//! ooiplot - Timeseries and depth-profile plots for OOI datasets.
//!
//! ooiplot reads Ocean Observatories Initiative netCDF datasets, keeps the
//! science variables (dropping engineering, QC and provenance fields by name),
//! splits the record into time windows and renders one figure per variable
//! and window.
//!
//! # Features
//!
//! - Science variable selection from ordered exclusion fragments
//! - Whole, bisected or calendar-grouped time windows
//! - Timeseries with and without outliers, and depth profiles
//! - Output paths compatible with earlier plot archives
//!
//! # Example
//!
//! ```ignore
//! use ooiplot::config::PlotConfig;
//! use ooiplot::pipeline::process_source;
//! use ooiplot::plot::PngPlotter;
//!
//! let config = PlotConfig::new("plots")?;
//! let summary = process_source("deployment0001_CE09OSSM.nc", &config, &mut PngPlotter::new())?;
//! println!("Wrote {} figures", summary.figures);
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod config;
pub mod data;
pub mod error;
pub mod naming;
pub mod pipeline;
pub mod plot;
pub mod segment;
pub mod select;

pub use error::{OoiPlotError, Result};
