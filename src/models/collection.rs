//! Container, collection and file descriptor models

use serde::{Deserialize, Serialize};

/// Opaque handle for the data source being scanned (a drive, bucket, share...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DataContainer {
    pub name: String,
}

impl DataContainer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A logical grouping of one or more files sharing a schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataCollection {
    pub container: DataContainer,
    pub name: String,
}

impl DataCollection {
    pub fn new(container: &DataContainer, name: impl Into<String>) -> Self {
        Self {
            container: container.clone(),
            name: name.into(),
        }
    }
}

/// Size metrics for one collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCollectionMetrics {
    /// Collection name
    pub name: String,
    /// Sum of row counts of all member files
    pub row_count: u64,
    /// Total size of all member files, in kibibytes
    pub total_space_kb: f64,
    /// Space occupied by data; equal to the total for flat files
    pub used_space_kb: f64,
}

/// A file reported by a file lister
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileInfo {
    /// Path of the file relative to the container root
    pub file_path: String,
    /// File size in bytes
    pub file_size: u64,
    /// Number of data rows, known after schema inference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
}

impl DriveFileInfo {
    pub fn new(file_path: impl Into<String>, file_size: u64) -> Self {
        Self {
            file_path: file_path.into(),
            file_size,
            row_count: None,
        }
    }
}
