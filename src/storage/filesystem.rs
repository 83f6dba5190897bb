//! File system storage backend
//!
//! Serves a local directory tree as a container.
//!
//! ## Security
//!
//! All path operations are validated to prevent path traversal attacks.
//! Paths containing ".." are rejected, and all resolved paths are verified
//! to remain within the base directory.

use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::{FileLister, FileOpener, FileStream, StorageError};
use crate::models::{DataContainer, DriveFileInfo};

/// File system storage backend rooted at a base directory
#[derive(Debug, Clone)]
pub struct LocalDriveStorage {
    base_path: PathBuf,
}

impl LocalDriveStorage {
    /// Create a new file system storage backend
    ///
    /// # Example
    ///
    /// ```rust
    /// use drive_schema_sdk::storage::LocalDriveStorage;
    ///
    /// let storage = LocalDriveStorage::new("/data/drive");
    /// ```
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn base_canonical(&self) -> PathBuf {
        self.base_path
            .canonicalize()
            .unwrap_or_else(|_| self.base_path.clone())
    }

    /// Resolve a path relative to the base path with security checks.
    fn resolve_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        let normalized = path.trim_start_matches('/');

        // Only whole `..` segments traverse; `report..v2.csv` is a plain name
        if Path::new(normalized)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(StorageError::PermissionDenied(
                "Path traversal (..) not allowed".to_string(),
            ));
        }

        let full = self.base_path.join(normalized);

        if full.exists() {
            let canonical = full
                .canonicalize()
                .map_err(|e| StorageError::IoError(format!("Failed to resolve path: {}", e)))?;

            if !canonical.starts_with(self.base_canonical()) {
                return Err(StorageError::PermissionDenied(
                    "Path escapes base directory".to_string(),
                ));
            }

            return Ok(canonical);
        }

        Ok(full)
    }

    fn collect_files(
        &self,
        dir: &Path,
        base: &Path,
        files: &mut Vec<DriveFileInfo>,
    ) -> Result<(), StorageError> {
        let read_dir = fs::read_dir(dir).map_err(|e| {
            StorageError::IoError(format!("Failed to read directory {}: {}", dir.display(), e))
        })?;

        for entry in read_dir {
            let entry = entry.map_err(|e| {
                StorageError::IoError(format!("Failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            let metadata = entry.metadata().map_err(|e| {
                StorageError::IoError(format!("Failed to stat {}: {}", path.display(), e))
            })?;

            if metadata.is_dir() {
                self.collect_files(&path, base, files)?;
            } else if metadata.is_file() {
                match relative_path(&path, base) {
                    Some(rel) => files.push(DriveFileInfo::new(rel, metadata.len())),
                    None => debug!("Skipping file outside base directory: {}", path.display()),
                }
            }
        }

        Ok(())
    }
}

/// Render `path` relative to `base` with `/` separators
fn relative_path(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

impl FileLister for LocalDriveStorage {
    fn list_files(
        &self,
        _container: &DataContainer,
        prefix: Option<&str>,
    ) -> Result<Vec<DriveFileInfo>, StorageError> {
        let prefix = prefix.unwrap_or("");
        let root = self.resolve_path(prefix)?;
        let base = self.base_canonical();

        let metadata = fs::metadata(&root).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::DirectoryNotFound(prefix.to_string())
            } else {
                StorageError::IoError(format!("Failed to stat {}: {}", prefix, e))
            }
        })?;

        let mut files = Vec::new();
        if metadata.is_file() {
            if let Some(rel) = relative_path(&root, &base) {
                files.push(DriveFileInfo::new(rel, metadata.len()));
            }
        } else {
            self.collect_files(&root, &base, &mut files)?;
        }

        // Sort by path for consistent ordering
        files.sort_by(|a, b| a.file_path.cmp(&b.file_path));

        Ok(files)
    }
}

impl FileOpener for LocalDriveStorage {
    fn open_file(&self, _container: &DataContainer, path: &str) -> Result<FileStream, StorageError> {
        let full_path = self.resolve_path(path)?;

        let file = File::open(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::FileNotFound(path.to_string())
            } else {
                StorageError::IoError(format!("Failed to open file {}: {}", path, e))
            }
        })?;

        Ok(Box::new(file))
    }
}
