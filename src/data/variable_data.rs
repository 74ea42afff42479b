//! Variable data reading and summary statistics.

use super::reader::read_attributes;
use super::VariableMeta;
use crate::error::{OoiPlotError, Result};
use ndarray::{Array1, ArrayD, Ix1, IxDyn};
use netcdf::types::{FloatType, IntType, NcVariableType};

/// Loaded variable with its data and metadata.
#[derive(Debug, Clone)]
pub struct LoadedVariable {
    /// Name and attributes.
    pub meta: VariableMeta,
    /// Dimension names.
    pub dim_names: Vec<String>,
    /// Values as f64, with fill values replaced by NaN and CF scale/offset applied.
    pub data: ArrayD<f64>,
}

impl LoadedVariable {
    /// Variable name.
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// The values as a 1-D series of `expected_len` samples, one per time step.
    pub fn series(&self, expected_len: usize) -> Result<Array1<f64>> {
        if self.data.ndim() != 1 {
            return Err(OoiPlotError::unsupported_variable(
                self.name(),
                format!("expected 1 dimension, found {}", self.data.ndim()),
            ));
        }
        if self.data.len() != expected_len {
            return Err(OoiPlotError::unsupported_variable(
                self.name(),
                format!("{} values for {} time steps", self.data.len(), expected_len),
            ));
        }
        self.data
            .clone()
            .into_dimensionality::<Ix1>()
            .map_err(|e| OoiPlotError::unsupported_variable(self.name(), e.to_string()))
    }
}

/// Summary of the finite values of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    /// Minimum and maximum values.
    pub min_max: Option<(f64, f64)>,
    /// Mean value.
    pub mean: Option<f64>,
    /// Sample standard deviation.
    pub std: Option<f64>,
    /// Count of valid (finite) values.
    pub valid_count: usize,
}

impl Statistics {
    /// Compute statistics over the finite values, ignoring NaN and infinities.
    pub fn compute<'a>(values: impl IntoIterator<Item = &'a f64>) -> Self {
        let finite: Vec<f64> = values.into_iter().copied().filter(|v| v.is_finite()).collect();
        let count = finite.len();
        if count == 0 {
            return Self {
                min_max: None,
                mean: None,
                std: None,
                valid_count: 0,
            };
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0f64;
        for &v in &finite {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
            sum += v;
        }
        let mean = sum / count as f64;
        let std = if count > 1 {
            let ssd: f64 = finite.iter().map(|v| (v - mean) * (v - mean)).sum();
            Some((ssd / (count - 1) as f64).sqrt())
        } else {
            None
        };

        Self {
            min_max: Some((min, max)),
            mean: Some(mean),
            std,
            valid_count: count,
        }
    }
}

/// Read a variable's values and attributes.
pub fn read_variable(var: &netcdf::Variable<'_>) -> Result<LoadedVariable> {
    let name = var.name();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let dim_names: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    let meta = read_attributes(var);

    let parse_attr = |key: &str| meta.attribute(key).and_then(|s| s.trim().parse::<f64>().ok());
    let fill_value = parse_attr("_FillValue");
    let missing_value = parse_attr("missing_value");
    let scale_factor = parse_attr("scale_factor").unwrap_or(1.0);
    let add_offset = parse_attr("add_offset").unwrap_or(0.0);

    let mut data = read_variable_array(var, &name, &shape)?;

    // Mask before scaling: fill values are stored in packed units.
    data.mapv_inplace(|v| {
        if is_fill(v, fill_value) || is_fill(v, missing_value) {
            f64::NAN
        } else {
            v
        }
    });

    // Apply CF scale/offset if present
    if (scale_factor - 1.0).abs() > 0.0 || add_offset != 0.0 {
        data.mapv_inplace(|v| v * scale_factor + add_offset);
    }

    Ok(LoadedVariable {
        meta,
        dim_names,
        data,
    })
}

// Fill values round-trip through text, so f32 fills only match approximately.
fn is_fill(v: f64, fill: Option<f64>) -> bool {
    match fill {
        Some(f) if f == 0.0 => v == 0.0,
        Some(f) => v == f || ((v - f) / f).abs() < 1e-6,
        None => false,
    }
}

/// Read a 1-D numeric variable as plain values, e.g. a coordinate.
pub(crate) fn read_values(var: &netcdf::Variable<'_>) -> Result<Vec<f64>> {
    let name = var.name();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    Ok(read_variable_array(var, &name, &shape)?.into_iter().collect())
}

fn read_variable_array(
    var: &netcdf::Variable<'_>,
    name: &str,
    shape: &[usize],
) -> Result<ArrayD<f64>> {
    let vartype = var.vartype();

    // Helper to build ArrayD<f64> from a Vec<f64> and the known shape
    let from_vec = |v: Vec<f64>| -> Result<ArrayD<f64>> {
        ArrayD::from_shape_vec(IxDyn(shape), v).map_err(|e| {
            OoiPlotError::NetCDF(format!("Invalid shape/data size for {}: {}", name, e))
        })
    };

    macro_rules! read_as {
        ($t:ty) => {{
            let values: Vec<$t> = var.get_values(..).map_err(|e| {
                OoiPlotError::NetCDF(format!(
                    "Failed to read {} data for {}: {}",
                    stringify!($t),
                    name,
                    e
                ))
            })?;
            from_vec(values.into_iter().map(|x| x as f64).collect())
        }};
    }

    match vartype {
        NcVariableType::Float(FloatType::F64) => read_as!(f64),
        NcVariableType::Float(FloatType::F32) => read_as!(f32),
        NcVariableType::Int(IntType::I64) => read_as!(i64),
        NcVariableType::Int(IntType::I32) => read_as!(i32),
        NcVariableType::Int(IntType::I16) => read_as!(i16),
        NcVariableType::Int(IntType::I8) => read_as!(i8),
        NcVariableType::Int(IntType::U64) => read_as!(u64),
        NcVariableType::Int(IntType::U32) => read_as!(u32),
        NcVariableType::Int(IntType::U16) => read_as!(u16),
        NcVariableType::Int(IntType::U8) => read_as!(u8),
        NcVariableType::Char | NcVariableType::String => Err(OoiPlotError::unsupported_variable(
            name,
            "character/string data cannot be plotted",
        )),
        _ => Err(OoiPlotError::unsupported_variable(
            name,
            format!("unsupported variable type {:?}", vartype),
        )),
    }
}
