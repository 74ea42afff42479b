//! Data reading and representation.
//!
//! This module handles locating datasets, opening NetCDF files (alone or a
//! directory joined along time), decoding the time coordinate and loading
//! variables for plotting.

mod aggregate;
mod dataset;
pub mod manifest;
mod reader;
pub mod time;
mod variable_data;

pub use aggregate::{find_datasets, AggregateDataset};
pub use dataset::{DatasetHandle, DatasetIdentity, VariableMeta};
pub use reader::{NetcdfDataset, DEPLOYMENT_VARIABLE, TIME_VARIABLE};
pub use variable_data::{read_variable, LoadedVariable, Statistics};
