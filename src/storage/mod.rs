//! Storage boundary
//!
//! The collector never touches a concrete backend. It only needs two capabilities:
//! - [`FileLister`]: enumerate the files of a container (optionally below a prefix)
//! - [`FileOpener`]: open a fresh, independent byte stream for one file
//!
//! Implementations:
//! - `LocalDriveStorage`: native file system
//! - `MemoryDriveStorage`: in-memory files (embedding hosts and tests)

use std::io::Read;

use crate::models::{DataContainer, DriveFileInfo};

pub mod filesystem;
pub mod memory;

pub use filesystem::LocalDriveStorage;
pub use memory::MemoryDriveStorage;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

/// A readable byte stream owned by the caller for exactly one read pass
pub type FileStream = Box<dyn Read + Send>;

/// Enumerates the files of a container
pub trait FileLister {
    /// List all files, optionally restricted to the subtree `prefix`.
    ///
    /// Returned paths are relative to the container root and use `/` separators.
    fn list_files(
        &self,
        container: &DataContainer,
        prefix: Option<&str>,
    ) -> Result<Vec<DriveFileInfo>, StorageError>;
}

/// Opens file content as a stream
pub trait FileOpener {
    /// Open `path` for reading. Every call returns a new stream positioned at
    /// the start of the file, so processors needing two passes call it twice.
    fn open_file(&self, container: &DataContainer, path: &str) -> Result<FileStream, StorageError>;
}

/// A backend offering both capabilities
pub trait DriveStorage: FileLister + FileOpener {}

impl<T: FileLister + FileOpener> DriveStorage for T {}
