//! Drive Schema SDK - schema inference and value sampling for file-based data sources
//!
//! Provides:
//! - Storage boundary (file listing and opening) with local and in-memory backends
//! - Format processors for CSV, JSON and Parquet files
//! - Type sniffing for untyped text values
//! - Collection building, sampling and size metrics over a whole drive

pub mod collector;
pub mod error;
pub mod inference;
pub mod models;
pub mod processors;
pub mod storage;

// Re-export commonly used types
pub use collector::{CollectorConfig, DriveCollector, SampleReport, SchemaSnapshot};
pub use error::{CollectorError, FileFailure, ProcessorError};
pub use inference::classify;
pub use models::{
    DataCollection, DataCollectionMetrics, DataContainer, DataEntity, DataType, DriveFileInfo,
    Sample,
};
pub use processors::{FileProcessor, ProcessorRegistry, SampleRequest};
pub use storage::{DriveStorage, FileLister, FileOpener, LocalDriveStorage, MemoryDriveStorage, StorageError};
