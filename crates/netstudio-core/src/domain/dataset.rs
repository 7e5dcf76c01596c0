//! Dataset purposes, formats and file naming.
//!
//! Datasets are opaque bytes supplied by the user.  Each network may hold one
//! file per purpose; the file name is derived from `(purpose, id, format)`
//! alone so any layer can locate it without consulting the index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::ValidationError;
use super::net::NetId;

/// What a dataset is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetPurpose {
    Training,
    Testing,
}

impl DatasetPurpose {
    pub const ALL: [DatasetPurpose; 2] = [DatasetPurpose::Training, DatasetPurpose::Testing];

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetPurpose::Training => "training",
            DatasetPurpose::Testing => "testing",
        }
    }
}

impl fmt::Display for DatasetPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetPurpose {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetPurpose::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownDatasetPurpose(s.to_string()))
    }
}

/// File format of a stored dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    Csv,
}

impl DatasetFormat {
    pub const ALL: [DatasetFormat; 1] = [DatasetFormat::Csv];

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            DatasetFormat::Csv => "csv",
        }
    }
}

/// File name of a dataset, e.g. `training_<id>.csv`.
pub fn dataset_file_name(purpose: DatasetPurpose, id: NetId, format: DatasetFormat) -> String {
    format!("{}_{}.{}", purpose.as_str(), id, format.extension())
}
