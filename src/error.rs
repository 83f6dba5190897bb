//! Error types for schema inference and sampling

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised by a file processor while reading one file
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// The stream could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream could not be (re)opened
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Document is not valid JSON
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document root is neither an object nor an array
    #[error("Invalid document structure: expected object or array at root, found {found}")]
    InvalidStructure { found: String },

    /// Columnar file could not be decoded
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// Errors surfaced by the collector
#[derive(Error, Debug)]
pub enum CollectorError {
    /// Listing the container failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A file could not be processed
    #[error("Failed to process {}: {source}", .path.display())]
    Processor {
        path: PathBuf,
        #[source]
        source: ProcessorError,
    },

    /// Configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// One or more files failed while sampling a field; the others were still sampled
    #[error("Sampling failed for {} file(s): {}", .failures.len(), describe_failures(.failures))]
    SampleFailures { failures: Vec<FileFailure> },
}

/// A per-file failure recorded while sampling a multi-file collection
#[derive(Debug)]
pub struct FileFailure {
    pub path: String,
    pub error: ProcessorError,
}

fn describe_failures(failures: &[FileFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.path, f.error))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CollectorError {
    pub(crate) fn processor(path: impl Into<PathBuf>, source: ProcessorError) -> Self {
        CollectorError::Processor {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = CollectorError> = std::result::Result<T, E>;
