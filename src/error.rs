//! Error types for ooiplot.
//!
//! This module provides a unified error handling approach using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ooiplot operations.
pub type Result<T> = std::result::Result<T, OoiPlotError>;

/// Errors that can occur in ooiplot.
#[derive(Debug, Error)]
pub enum OoiPlotError {
    /// Failed to open a file.
    #[error("Failed to open file: {path}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory holds no `.nc` files.
    #[error("No .nc files found under {path}")]
    NoDatasets { path: PathBuf },

    /// Failed to read NetCDF file.
    #[error("NetCDF error: {0}")]
    NetCDF(String),

    /// A required global attribute is absent from the dataset.
    #[error("Dataset has no '{name}' attribute")]
    MissingAttribute { name: String },

    /// A required variable is absent from the dataset.
    #[error("Variable not found: {name}")]
    MissingVariable { name: String },

    /// A variable exists but cannot be plotted.
    #[error("Variable '{name}' cannot be plotted: {reason}")]
    UnsupportedVariable { name: String, reason: String },

    /// Time units are not of the form `<unit> since <reference>`.
    #[error("Invalid time units: {0}")]
    TimeUnits(String),

    /// Time segmentation was asked to work on an empty time axis.
    #[error("Cannot segment an empty time axis")]
    EmptyInput,

    /// An exclusion fragment was the empty string and would exclude everything.
    #[error("Exclusion fragments must not be empty")]
    EmptyFragment,

    /// Exclusion fragments could not be compiled.
    #[error("Invalid exclusion pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Unknown segmentation mode.
    #[error("Unknown segmentation mode: {0}")]
    SegmentMode(String),

    /// Rendering a figure failed.
    #[error("Render error: {0}")]
    Render(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OoiPlotError {
    /// Create a FileOpen error.
    pub fn file_open(path: PathBuf, source: std::io::Error) -> Self {
        Self::FileOpen { path, source }
    }

    /// Create a MissingAttribute error.
    pub fn missing_attribute(name: impl Into<String>) -> Self {
        Self::MissingAttribute { name: name.into() }
    }

    /// Create a MissingVariable error.
    pub fn missing_variable(name: impl Into<String>) -> Self {
        Self::MissingVariable { name: name.into() }
    }

    /// Create an UnsupportedVariable error.
    pub fn unsupported_variable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedVariable {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a Render error from any displayable backend error.
    pub fn render(err: impl std::fmt::Display) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<netcdf::Error> for OoiPlotError {
    fn from(err: netcdf::Error) -> Self {
        Self::NetCDF(err.to_string())
    }
}
