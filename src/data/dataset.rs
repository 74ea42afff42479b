//! Dataset identity and the read-only dataset interface.

use super::LoadedVariable;
use crate::error::Result;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Who produced a dataset: the OOI reference designator split into its
/// parts, plus stream and deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetIdentity {
    /// Site or platform code, e.g. `CE09OSSM`.
    pub subsite: String,
    /// Node code, e.g. `RID27`.
    pub node: String,
    /// Sensor code, e.g. `04-DOSTAD000`.
    pub sensor: String,
    /// Stream name.
    pub stream: String,
    /// Deployment ordinal.
    pub deployment: u32,
}

impl DatasetIdentity {
    /// Deployment as used in output directories: `D0000` followed by the
    /// ordinal, so deployment 1 is `D00001` and deployment 12 is `D000012`.
    pub fn deployment_code(&self) -> String {
        format!("D0000{}", self.deployment)
    }
}

/// Attributes of one variable.
#[derive(Debug, Clone, Default)]
pub struct VariableMeta {
    /// Variable name.
    pub name: String,
    /// Decoded attributes. Attributes that could not be decoded are absent.
    pub attributes: BTreeMap<String, String>,
}

impl VariableMeta {
    /// Create metadata with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up an attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Axis label: `long_name`, then `standard_name`, then the variable name.
    pub fn label(&self) -> &str {
        self.attribute("long_name")
            .or_else(|| self.attribute("standard_name"))
            .unwrap_or(&self.name)
    }

    /// Units, empty when the variable has none.
    pub fn units(&self) -> &str {
        self.attribute("units").unwrap_or("")
    }
}

/// Read-only access to one opened dataset.
pub trait DatasetHandle {
    /// Reference the dataset was opened from.
    fn source(&self) -> &str;

    /// Validated identity attributes.
    fn identity(&self) -> &DatasetIdentity;

    /// Names of the data variables, in file order.
    fn variable_names(&self) -> Vec<String>;

    /// Decoded time coordinate.
    fn time(&self) -> &[NaiveDateTime];

    /// Read a variable's values and metadata.
    fn load_variable(&self, name: &str) -> Result<LoadedVariable>;
}
