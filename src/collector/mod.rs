//! Drive collector
//!
//! Ties storage, processors and configuration together:
//! - [`SchemaSnapshot`]: one immutable scan of a container
//! - [`DriveCollector`]: memoizes snapshots and answers schema, sampling and
//!   metrics requests against them
//!
//! A snapshot is reused until [`DriveCollector::invalidate`] is called or the
//! schema is explicitly requested again.

use std::collections::HashMap;

use tracing::debug;

pub mod config;
pub mod metrics;
pub mod naming;
pub mod snapshot;

pub use config::{CollectorConfig, CollectorConfigBuilder};
pub use naming::collection_name;
pub use snapshot::{CollectionSchema, FileFieldIndex, SampleReport, SchemaSnapshot};

use crate::error::Result;
use crate::models::{DataCollection, DataCollectionMetrics, DataContainer, DataEntity, Sample};
use crate::processors::{ProcessorRegistry, SampleRequest};
use crate::storage::DriveStorage;

/// Schema discovery and sampling over one storage backend
///
/// # Example
///
/// ```rust
/// use drive_schema_sdk::collector::{CollectorConfig, DriveCollector};
/// use drive_schema_sdk::models::DataContainer;
/// use drive_schema_sdk::storage::MemoryDriveStorage;
///
/// let storage = MemoryDriveStorage::new().with_file("emails.csv", "ID,NAME\n1,Ann\n");
/// let mut collector = DriveCollector::new(storage, CollectorConfig::default());
///
/// let container = DataContainer::new("drive");
/// let (collections, entities) = collector.get_schema(&container).unwrap();
/// assert_eq!(collections[0].name, "emails.csv");
///
/// let samples = collector.collect_sample(&entities[1], 10).unwrap();
/// assert_eq!(samples, vec![Some("Ann".to_string())]);
/// ```
pub struct DriveCollector<S> {
    storage: S,
    config: CollectorConfig,
    registry: ProcessorRegistry,
    snapshots: HashMap<DataContainer, SchemaSnapshot>,
}

impl<S: DriveStorage> DriveCollector<S> {
    /// Collector using the built-in processors
    pub fn new(storage: S, config: CollectorConfig) -> Self {
        let registry = ProcessorRegistry::with_defaults(config.csv.clone());
        Self::with_registry(storage, config, registry)
    }

    /// Collector using a caller-supplied processor registry
    pub fn with_registry(storage: S, config: CollectorConfig, registry: ProcessorRegistry) -> Self {
        Self {
            storage,
            config,
            registry,
            snapshots: HashMap::new(),
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable access to the processors; drops cached snapshots
    pub fn registry_mut(&mut self) -> &mut ProcessorRegistry {
        self.invalidate();
        &mut self.registry
    }

    /// Scan `container` without touching the cache
    pub fn build_schema(&self, container: &DataContainer) -> Result<SchemaSnapshot> {
        SchemaSnapshot::build(container, &self.storage, &self.registry, &self.config)
    }

    /// Rescan `container` and return its collections and entities
    pub fn get_schema(
        &mut self,
        container: &DataContainer,
    ) -> Result<(Vec<DataCollection>, Vec<DataEntity>)> {
        let snapshot = self.build_schema(container)?;
        let schema = snapshot.schema();
        self.snapshots.insert(container.clone(), snapshot);
        Ok(schema)
    }

    /// Cached snapshot of `container`, scanning it on first use
    pub fn snapshot(&mut self, container: &DataContainer) -> Result<&SchemaSnapshot> {
        self.ensure_snapshot(container)?;
        Ok(&self.snapshots[container])
    }

    fn ensure_snapshot(&mut self, container: &DataContainer) -> Result<()> {
        if !self.snapshots.contains_key(container) {
            debug!(container = %container.name, "No cached snapshot, scanning");
            let snapshot = self.build_schema(container)?;
            self.snapshots.insert(container.clone(), snapshot);
        }
        Ok(())
    }

    /// Sample values of `entity` and report per-file failures alongside them
    pub fn collect_sample_report(
        &mut self,
        entity: &DataEntity,
        request: &SampleRequest,
    ) -> Result<SampleReport> {
        self.ensure_snapshot(&entity.container)?;
        let snapshot = &self.snapshots[&entity.container];
        Ok(snapshot.collect_samples(&self.storage, &self.registry, entity, request))
    }

    /// Up to `max_samples` values of `entity` from each member file
    ///
    /// Fails with [`CollectorError::SampleFailures`](crate::error::CollectorError::SampleFailures)
    /// if any file could not be sampled.
    pub fn collect_sample(&mut self, entity: &DataEntity, max_samples: usize) -> Result<Vec<Sample>> {
        self.collect_sample_report(entity, &SampleRequest::new(max_samples))?
            .into_result()
    }

    /// Row and size metrics of every collection in `container`
    pub fn get_collection_metrics(
        &mut self,
        container: &DataContainer,
    ) -> Result<Vec<DataCollectionMetrics>> {
        let snapshot = self.snapshot(container)?;
        Ok(metrics::snapshot_metrics(snapshot))
    }

    /// Drop every cached snapshot
    pub fn invalidate(&mut self) {
        self.snapshots.clear();
    }
}
