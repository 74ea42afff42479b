//! NetCDF dataset reader.

use super::time::{check_calendar, TimeUnits};
use super::variable_data::{read_values, read_variable};
use super::{DatasetHandle, DatasetIdentity, LoadedVariable, VariableMeta};
use crate::error::{OoiPlotError, Result};
use chrono::NaiveDateTime;
use netcdf::AttributeValue;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Name of the time coordinate in OOI files.
pub const TIME_VARIABLE: &str = "time";

/// Name of the variable holding the deployment ordinal.
pub const DEPLOYMENT_VARIABLE: &str = "deployment";

/// A netCDF file (or OPeNDAP/NCML reference) opened for plotting.
pub struct NetcdfDataset {
    source: String,
    file: netcdf::File,
    time_variable: String,
    identity: DatasetIdentity,
    time: Vec<NaiveDateTime>,
}

impl std::fmt::Debug for NetcdfDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetcdfDataset")
            .field("source", &self.source)
            .field("time_variable", &self.time_variable)
            .field("identity", &self.identity)
            .field("time_steps", &self.time.len())
            .finish()
    }
}

impl NetcdfDataset {
    /// Open `source` and validate the attributes and coordinates plotting needs.
    pub fn open(source: &str) -> Result<Self> {
        Self::open_with_time(source, TIME_VARIABLE)
    }

    /// Like [`NetcdfDataset::open`], reading time from `time_variable`
    /// (e.g. `met_timeflx` in METBK hourly streams).
    pub fn open_with_time(source: &str, time_variable: &str) -> Result<Self> {
        let file = netcdf::open(source)
            .map_err(|e| OoiPlotError::NetCDF(format!("Failed to open {}: {}", source, e)))?;

        let identity = read_identity(&file)?;
        let time = read_time(&file, time_variable)?;
        debug!(
            "Opened {} ({} time steps, deployment {})",
            source,
            time.len(),
            identity.deployment
        );

        Ok(Self {
            source: source.to_string(),
            file,
            time_variable: time_variable.to_string(),
            identity,
            time,
        })
    }
}

impl DatasetHandle for NetcdfDataset {
    fn source(&self) -> &str {
        &self.source
    }

    fn identity(&self) -> &DatasetIdentity {
        &self.identity
    }

    fn variable_names(&self) -> Vec<String> {
        let mut coordinates: BTreeSet<String> = self
            .file
            .variables()
            .filter_map(|var| {
                var.attribute("coordinates")
                    .and_then(|attr| attr_value_to_string(&attr))
            })
            .flat_map(|names| {
                names
                    .split_whitespace()
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .collect();
        coordinates.insert(TIME_VARIABLE.to_string());
        coordinates.insert(self.time_variable.clone());

        self.file
            .variables()
            .filter(|var| !is_coordinate_variable(var))
            .map(|var| var.name())
            .filter(|name| !coordinates.contains(name))
            .collect()
    }

    fn time(&self) -> &[NaiveDateTime] {
        &self.time
    }

    fn load_variable(&self, name: &str) -> Result<LoadedVariable> {
        let var = self
            .file
            .variable(name)
            .ok_or_else(|| OoiPlotError::missing_variable(name))?;
        read_variable(&var)
    }
}

// A coordinate variable is named after its only dimension.
fn is_coordinate_variable(var: &netcdf::Variable<'_>) -> bool {
    let dims = var.dimensions();
    dims.len() == 1 && dims[0].name() == var.name()
}

fn read_identity(file: &netcdf::File) -> Result<DatasetIdentity> {
    let global = |name: &str| -> Result<String> {
        file.attribute(name)
            .and_then(|attr| attr_value_to_string(&attr))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| OoiPlotError::missing_attribute(name))
    };

    let deployment = file
        .variable(DEPLOYMENT_VARIABLE)
        .ok_or_else(|| OoiPlotError::missing_variable(DEPLOYMENT_VARIABLE))?;
    let deployment = read_values(&deployment)?
        .into_iter()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .fold(None, |lowest: Option<f64>, v| Some(lowest.map_or(v, |l| l.min(v))))
        .ok_or_else(|| OoiPlotError::missing_variable(DEPLOYMENT_VARIABLE))?;

    Ok(DatasetIdentity {
        subsite: global("subsite")?,
        node: global("node")?,
        sensor: global("sensor")?,
        stream: global("stream")?,
        deployment: deployment as u32,
    })
}

fn read_time(file: &netcdf::File, name: &str) -> Result<Vec<NaiveDateTime>> {
    let var = file
        .variable(name)
        .ok_or_else(|| OoiPlotError::missing_variable(name))?;
    let units = var
        .attribute("units")
        .and_then(|attr| attr_value_to_string(&attr))
        .ok_or_else(|| OoiPlotError::TimeUnits(format!("'{}' has no units", name)))?;
    let units = TimeUnits::parse(&units)?;
    let calendar = var
        .attribute("calendar")
        .and_then(|attr| attr_value_to_string(&attr));
    if let Some(calendar) = calendar {
        check_calendar(&calendar)?;
    }
    units.decode_all(&read_values(&var)?)
}

/// Read a variable's attributes, dropping any that cannot be decoded.
pub(crate) fn read_attributes(var: &netcdf::Variable<'_>) -> VariableMeta {
    let mut meta = VariableMeta::new(var.name());
    for attr in var.attributes() {
        insert_attribute(&mut meta, attr.name(), attr.value().ok());
    }
    meta
}

fn insert_attribute(meta: &mut VariableMeta, key: &str, value: Option<AttributeValue>) {
    match value.and_then(decode_attribute) {
        Some(text) => {
            meta.attributes.insert(key.to_string(), text);
        }
        None => warn!("Dropping undecodable attribute '{}' of '{}'", key, meta.name),
    }
}

fn attr_value_to_string(attr: &netcdf::Attribute<'_>) -> Option<String> {
    attr.value().ok().and_then(decode_attribute)
}

/// Attribute value as text. Text that was not valid in the file's encoding
/// comes back from netcdf with replacement characters and is rejected.
fn decode_attribute(value: AttributeValue) -> Option<String> {
    let text = match value {
        AttributeValue::Uchar(v) => format!("{}", v),
        AttributeValue::Schar(v) => format!("{}", v),
        AttributeValue::Ushort(v) => format!("{}", v),
        AttributeValue::Short(v) => format!("{}", v),
        AttributeValue::Uint(v) => format!("{}", v),
        AttributeValue::Int(v) => format!("{}", v),
        AttributeValue::Ulonglong(v) => format!("{}", v),
        AttributeValue::Longlong(v) => format!("{}", v),
        AttributeValue::Float(v) => format!("{}", v),
        AttributeValue::Double(v) => format!("{}", v),
        AttributeValue::Str(v) if v.contains(char::REPLACEMENT_CHARACTER) => return None,
        AttributeValue::Str(v) => v,
        AttributeValue::Uchars(v) => format!("{:?}", v),
        AttributeValue::Schars(v) => format!("{:?}", v),
        AttributeValue::Ushorts(v) => format!("{:?}", v),
        AttributeValue::Shorts(v) => format!("{:?}", v),
        AttributeValue::Uints(v) => format!("{:?}", v),
        AttributeValue::Ints(v) => format!("{:?}", v),
        AttributeValue::Ulonglongs(v) => format!("{:?}", v),
        AttributeValue::Longlongs(v) => format!("{:?}", v),
        AttributeValue::Floats(v) => format!("{:?}", v),
        AttributeValue::Doubles(v) => format!("{:?}", v),
        AttributeValue::Strs(v) if v.iter().any(|s| s.contains(char::REPLACEMENT_CHARACTER)) => {
            return None
        }
        AttributeValue::Strs(v) => v.join(", "),
    };
    Some(text)
}
