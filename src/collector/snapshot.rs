//! Immutable result of one scan over a container
//!
//! A [`SchemaSnapshot`] holds the discovered collections, their fields, their
//! member files and the [`FileFieldIndex`] that sampling needs to locate a
//! field inside each file. It is built once and only read afterwards.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::config::CollectorConfig;
use super::naming::collection_name;
use crate::error::{CollectorError, FileFailure, ProcessorError, Result};
use crate::models::{DataCollection, DataContainer, DataEntity, DriveFileInfo, Sample};
use crate::processors::{ProcessorRegistry, SampleRequest};
use crate::storage::{DriveStorage, FileLister, FileOpener, FileStream};

/// Position of each field within each file's own column order
#[derive(Debug, Clone, Default)]
pub struct FileFieldIndex {
    files: HashMap<String, HashMap<String, usize>>,
}

impl FileFieldIndex {
    pub fn insert(&mut self, file_path: &str, field: &str, position: usize) {
        self.files
            .entry(file_path.to_string())
            .or_default()
            .insert(field.to_string(), position);
    }

    /// `None` when the file does not contain the field
    pub fn get(&self, file_path: &str, field: &str) -> Option<usize> {
        self.files.get(file_path)?.get(field).copied()
    }
}

/// One collection with its merged fields and member files
#[derive(Debug, Clone)]
pub struct CollectionSchema {
    pub collection: DataCollection,
    /// Union of all member files' fields, first occurrence wins
    pub entities: Vec<DataEntity>,
    /// Member files in discovery order, with row counts filled in
    pub files: Vec<DriveFileInfo>,
}

impl CollectionSchema {
    fn new(collection: DataCollection) -> Self {
        Self {
            collection,
            entities: Vec::new(),
            files: Vec::new(),
        }
    }

    fn merge(&mut self, entities: Vec<DataEntity>) {
        for entity in entities {
            if !self.entities.iter().any(|e| e.name == entity.name) {
                self.entities.push(entity);
            }
        }
    }

    pub fn row_count(&self) -> u64 {
        self.files.iter().filter_map(|f| f.row_count).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.file_size).sum()
    }
}

/// Values gathered for one field across a collection
#[derive(Debug, Default)]
pub struct SampleReport {
    /// Concatenated in file order
    pub samples: Vec<Sample>,
    /// Files that could not be sampled
    pub failures: Vec<FileFailure>,
}

impl SampleReport {
    /// Samples when every file succeeded, otherwise the aggregated failures
    pub fn into_result(self) -> Result<Vec<Sample>> {
        if self.failures.is_empty() {
            Ok(self.samples)
        } else {
            Err(CollectorError::SampleFailures {
                failures: self.failures,
            })
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchemaSnapshot {
    container: DataContainer,
    collections: Vec<CollectionSchema>,
    index: FileFieldIndex,
}

impl SchemaSnapshot {
    /// Scan `container` and infer the schema of every supported file
    ///
    /// Files no processor handles are skipped. A file that cannot be parsed
    /// aborts the scan.
    pub fn build(
        container: &DataContainer,
        storage: &dyn DriveStorage,
        registry: &ProcessorRegistry,
        config: &CollectorConfig,
    ) -> Result<Self> {
        let files = storage.list_files(container, config.normalized_prefix())?;
        info!(container = %container.name, files = files.len(), "Scanning container");

        let mut collections: Vec<CollectionSchema> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut index = FileFieldIndex::default();

        for mut file in files {
            let Some(processor) = registry.find(&file.file_path) else {
                debug!(path = %file.file_path, "No processor for file, skipping");
                continue;
            };

            let name = collection_name(config, &file.file_path);
            let slot = *positions.entry(name.clone()).or_insert_with(|| {
                collections.push(CollectionSchema::new(DataCollection::new(container, &name)));
                collections.len() - 1
            });
            let collection = &mut collections[slot];

            let path = file.file_path.clone();
            let source = || -> std::result::Result<FileStream, ProcessorError> {
                Ok(storage.open_file(container, &path)?)
            };
            let parsed = processor
                .parse_file_schema(container, &collection.collection, &source)
                .map_err(|e| CollectorError::processor(&file.file_path, e))?;

            for (position, entity) in parsed.entities.iter().enumerate() {
                index.insert(&file.file_path, &entity.name, position);
            }
            debug!(
                path = %file.file_path,
                collection = %collection.collection.name,
                processor = processor.name(),
                fields = parsed.entities.len(),
                rows = parsed.row_count,
                "Processed file"
            );

            collection.merge(parsed.entities);
            file.row_count = Some(parsed.row_count);
            collection.files.push(file);
        }

        info!(
            container = %container.name,
            collections = collections.len(),
            "Schema scan complete"
        );
        Ok(Self {
            container: container.clone(),
            collections,
            index,
        })
    }

    pub fn container(&self) -> &DataContainer {
        &self.container
    }

    pub fn collections(&self) -> &[CollectionSchema] {
        &self.collections
    }

    pub fn collection(&self, name: &str) -> Option<&CollectionSchema> {
        self.collections.iter().find(|c| c.collection.name == name)
    }

    pub fn index(&self) -> &FileFieldIndex {
        &self.index
    }

    /// All collections and all entities, in discovery order
    pub fn schema(&self) -> (Vec<DataCollection>, Vec<DataEntity>) {
        let collections = self
            .collections
            .iter()
            .map(|c| c.collection.clone())
            .collect();
        let entities = self
            .collections
            .iter()
            .flat_map(|c| c.entities.iter().cloned())
            .collect();
        (collections, entities)
    }

    /// Sample `entity` from every member file of its collection
    ///
    /// Each file contributes up to `request.max_samples` values, so a
    /// collection of N files may return up to N times that many. Files that
    /// lack the field are skipped; files that fail are reported in the
    /// returned failures while the remaining files are still sampled.
    pub fn collect_samples(
        &self,
        storage: &dyn FileOpener,
        registry: &ProcessorRegistry,
        entity: &DataEntity,
        request: &SampleRequest,
    ) -> SampleReport {
        let mut report = SampleReport::default();
        let Some(collection) = self.collection(&entity.collection.name) else {
            debug!(collection = %entity.collection.name, "Unknown collection, no samples");
            return report;
        };

        for file in &collection.files {
            let Some(position) = self.index.get(&file.file_path, &entity.name) else {
                continue;
            };
            let Some(processor) = registry.find(&file.file_path) else {
                continue;
            };

            let result = storage
                .open_file(&self.container, &file.file_path)
                .map_err(ProcessorError::from)
                .and_then(|stream| processor.collect_samples(entity, position, stream, request));
            match result {
                Ok(samples) => {
                    debug!(path = %file.file_path, field = %entity.name, count = samples.len(), "Sampled file");
                    report.samples.extend(samples);
                }
                Err(error) => {
                    warn!(path = %file.file_path, field = %entity.name, %error, "Sampling failed");
                    report.failures.push(FileFailure {
                        path: file.file_path.clone(),
                        error,
                    });
                }
            }
        }
        report
    }
}
