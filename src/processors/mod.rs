//! File processors
//!
//! A processor owns schema inference and value sampling for one storage shape:
//! - [`CsvFileProcessor`]: delimited text, typed by sniffing the first data row
//! - [`JsonFileProcessor`]: nested documents, flattened into dotted paths
//! - [`ParquetFileProcessor`]: columnar files, typed from the embedded schema
//!
//! The [`ProcessorRegistry`] picks the processor for a file by asking each
//! registered processor, in registration order, whether it can handle the path.

use std::path::Path;

use crate::error::ProcessorError;
use crate::models::{DataCollection, DataContainer, DataEntity, Sample};
use crate::storage::FileStream;

pub mod csv;
pub mod document;
pub mod json;
pub mod parquet;
pub mod text;

pub use self::csv::{CsvFileProcessor, CsvOptions};
pub use self::json::JsonFileProcessor;
pub use self::parquet::ParquetFileProcessor;

/// Result of inferring the schema of one file
#[derive(Debug, Clone, Default)]
pub struct ParsedSchema {
    /// Fields in the file's own column order
    pub entities: Vec<DataEntity>,
    /// Number of data rows (records for documents)
    pub row_count: u64,
}

/// Parameters of a sampling call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRequest {
    /// Upper bound of values returned by one processor call
    pub max_samples: usize,
    /// Per-row inclusion probability; `None` keeps every row
    pub probability: Option<f64>,
}

impl SampleRequest {
    pub fn new(max_samples: usize) -> Self {
        Self {
            max_samples,
            probability: None,
        }
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = Some(probability.clamp(0.0, 1.0));
        self
    }
}

/// Opens a fresh stream over the file being processed
///
/// Processors that need more than one pass over the content call
/// [`open`](StreamSource::open) once per pass; a stream is never rewound.
pub trait StreamSource {
    fn open(&self) -> Result<FileStream, ProcessorError>;
}

impl<F> StreamSource for F
where
    F: Fn() -> Result<FileStream, ProcessorError>,
{
    fn open(&self) -> Result<FileStream, ProcessorError> {
        self()
    }
}

/// Contract shared by all format handlers
pub trait FileProcessor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Returns true if this processor understands the file at `path`
    fn can_process(&self, path: &str) -> bool;

    /// Infer the fields of one file and count its rows
    fn parse_file_schema(
        &self,
        container: &DataContainer,
        collection: &DataCollection,
        source: &dyn StreamSource,
    ) -> Result<ParsedSchema, ProcessorError>;

    /// Collect up to `request.max_samples` values of `entity` from `stream`.
    ///
    /// `entity_index` is the position of the entity in this file's own field
    /// order, as reported by [`parse_file_schema`](FileProcessor::parse_file_schema).
    fn collect_samples(
        &self,
        entity: &DataEntity,
        entity_index: usize,
        stream: FileStream,
        request: &SampleRequest,
    ) -> Result<Vec<Sample>, ProcessorError>;
}

/// Case-insensitive extension check (`ext` without the leading dot)
pub(crate) fn has_extension(path: &str, ext: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Ordered set of available processors
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: Vec<Box<dyn FileProcessor>>,
}

impl ProcessorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in processors (CSV, JSON, Parquet)
    pub fn with_defaults(csv: CsvOptions) -> Self {
        let mut registry = Self::new();
        registry
            .register(CsvFileProcessor::new(csv))
            .register(JsonFileProcessor::new())
            .register(ParquetFileProcessor::new());
        registry
    }

    /// Append a processor; earlier registrations win on overlap
    pub fn register(&mut self, processor: impl FileProcessor + 'static) -> &mut Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Find the processor for `path`, if any
    pub fn find(&self, path: &str) -> Option<&dyn FileProcessor> {
        self.processors
            .iter()
            .find(|p| p.can_process(path))
            .map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.processors.iter().map(|p| p.name()))
            .finish()
    }
}
