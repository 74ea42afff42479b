//! Several netCDF files read as one dataset.

use super::{DatasetHandle, DatasetIdentity, LoadedVariable, NetcdfDataset};
use crate::error::{OoiPlotError, Result};
use chrono::NaiveDateTime;
use ndarray::{concatenate, ArrayViewD, Axis};
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// Every `.nc` file under a directory, joined along time in file name order.
///
/// Identity and the variable list come from the first file.
#[derive(Debug)]
pub struct AggregateDataset {
    source: String,
    files: Vec<PathBuf>,
    parts: Vec<NetcdfDataset>,
    identity: DatasetIdentity,
    time: Vec<NaiveDateTime>,
}

impl AggregateDataset {
    /// Open every `.nc` file below `dir`, reading time from `time_variable`.
    pub fn open_dir(dir: &Path, time_variable: &str) -> Result<Self> {
        let files = find_datasets(dir);
        if files.is_empty() {
            return Err(OoiPlotError::NoDatasets {
                path: dir.to_path_buf(),
            });
        }

        let parts = files
            .iter()
            .map(|file| NetcdfDataset::open_with_time(&file.to_string_lossy(), time_variable))
            .collect::<Result<Vec<_>>>()?;
        let identity = parts[0].identity().clone();
        let time = parts.iter().flat_map(|p| p.time().iter().copied()).collect();
        info!("{}: joined {} files", dir.display(), files.len());

        Ok(Self {
            source: dir.display().to_string(),
            files,
            parts,
            identity,
            time,
        })
    }

    /// Files making up the dataset, in the order they are joined.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// `.nc` files below `dir`, sorted by name at every level.
pub fn find_datasets(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "nc"))
        .map(|e| e.into_path())
        .collect()
}

impl DatasetHandle for AggregateDataset {
    fn source(&self) -> &str {
        &self.source
    }

    fn identity(&self) -> &DatasetIdentity {
        &self.identity
    }

    fn variable_names(&self) -> Vec<String> {
        self.parts
            .first()
            .map(|part| part.variable_names())
            .unwrap_or_default()
    }

    fn time(&self) -> &[NaiveDateTime] {
        &self.time
    }

    fn load_variable(&self, name: &str) -> Result<LoadedVariable> {
        let mut loaded = Vec::with_capacity(self.parts.len());
        for part in &self.parts {
            match part.load_variable(name) {
                Ok(variable) => loaded.push(variable),
                // Absent from one file only: cannot be joined.
                Err(OoiPlotError::MissingVariable { .. }) if !loaded.is_empty() => {
                    return Err(OoiPlotError::unsupported_variable(
                        name,
                        format!("missing from {}", part.source()),
                    ))
                }
                Err(e) => return Err(e),
            }
        }

        let data = {
            let views: Vec<ArrayViewD<'_, f64>> = loaded.iter().map(|v| v.data.view()).collect();
            concatenate(Axis(0), &views).map_err(|e| {
                OoiPlotError::unsupported_variable(name, format!("cannot join files: {}", e))
            })?
        };

        let first = loaded
            .into_iter()
            .next()
            .ok_or_else(|| OoiPlotError::missing_variable(name))?;
        Ok(LoadedVariable {
            meta: first.meta,
            dim_names: first.dim_names,
            data,
        })
    }
}
