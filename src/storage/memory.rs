//! In-memory storage backend
//!
//! Holds file contents in a map keyed by path. Useful for hosts that already
//! have the bytes at hand and for tests.

use std::collections::BTreeMap;
use std::io::Cursor;

use bytes::Bytes;

use super::{FileLister, FileOpener, FileStream, StorageError};
use crate::models::{DataContainer, DriveFileInfo};

#[derive(Debug, Clone, Default)]
pub struct MemoryDriveStorage {
    files: BTreeMap<String, Bytes>,
}

impl MemoryDriveStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Bytes>) {
        self.files.insert(path.into(), content.into());
    }

    /// Builder-style variant of [`insert`](Self::insert)
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Bytes>) -> Self {
        self.insert(path, content);
        self
    }
}

impl FileLister for MemoryDriveStorage {
    fn list_files(
        &self,
        _container: &DataContainer,
        prefix: Option<&str>,
    ) -> Result<Vec<DriveFileInfo>, StorageError> {
        let prefix = prefix.map(|p| p.trim_matches('/')).unwrap_or("");

        // A prefix names a folder (or a single file), never a partial name
        let in_subtree = |path: &str| {
            prefix.is_empty()
                || path == prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        };

        Ok(self
            .files
            .iter()
            .filter(|(path, _)| in_subtree(path))
            .map(|(path, content)| DriveFileInfo::new(path.clone(), content.len() as u64))
            .collect())
    }
}

impl FileOpener for MemoryDriveStorage {
    fn open_file(&self, _container: &DataContainer, path: &str) -> Result<FileStream, StorageError> {
        let content = self
            .files
            .get(path)
            .ok_or_else(|| StorageError::FileNotFound(path.to_string()))?;

        // Bytes clones share the buffer
        Ok(Box::new(Cursor::new(content.clone())))
    }
}
