//! JSON document processor
//!
//! A file holds either one object or an array of objects. Nested objects are
//! flattened into dotted field paths (`created.user`), and objects inside
//! arrays are merged into the array's path (`languages.name`).

use std::collections::HashSet;
use std::io::BufReader;

use serde_json::Value;
use tracing::debug;

use super::document::DocumentValue;
use super::text::DecodingReader;
use super::{FileProcessor, ParsedSchema, SampleRequest, StreamSource, has_extension};
use crate::error::ProcessorError;
use crate::models::{DataCollection, DataContainer, DataEntity, Sample};
use crate::storage::FileStream;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileProcessor;

impl JsonFileProcessor {
    pub fn new() -> Self {
        Self
    }
}

/// Parse the whole document and return its top-level records
fn read_records(stream: FileStream) -> Result<Vec<DocumentValue>, ProcessorError> {
    let value: Value = serde_json::from_reader(BufReader::new(DecodingReader::new(stream)))?;
    match DocumentValue::from(value) {
        DocumentValue::Array(items) => Ok(items),
        root @ DocumentValue::Object(_) => Ok(vec![root]),
        other => Err(ProcessorError::InvalidStructure {
            found: other.kind().label().to_string(),
        }),
    }
}

/// Collects flattened fields, keeping the first kind seen for each path
struct FieldCollector<'a> {
    container: &'a DataContainer,
    collection: &'a DataCollection,
    seen: HashSet<String>,
    entities: Vec<DataEntity>,
}

impl<'a> FieldCollector<'a> {
    fn new(container: &'a DataContainer, collection: &'a DataCollection) -> Self {
        Self {
            container,
            collection,
            seen: HashSet::new(),
            entities: Vec::new(),
        }
    }

    fn emit(&mut self, path: String, value: &DocumentValue) {
        if self.seen.contains(&path) {
            return;
        }
        let kind = value.kind();
        self.entities.push(DataEntity::new(
            path.clone(),
            kind.data_type(),
            kind.label(),
            self.container,
            self.collection,
        ));
        self.seen.insert(path);
    }

    fn visit(&mut self, prefix: &str, properties: &[(String, DocumentValue)]) {
        for (name, value) in properties {
            let path = format!("{prefix}{name}");
            match value {
                DocumentValue::Object(children) => {
                    self.visit(&format!("{path}."), children);
                }
                DocumentValue::Array(items) => {
                    self.emit(path.clone(), value);
                    let child_prefix = format!("{path}.");
                    for item in items {
                        if let DocumentValue::Object(children) = item {
                            self.visit(&child_prefix, children);
                        }
                    }
                }
                _ => self.emit(path, value),
            }
        }
    }
}

/// Append the values found at `path` below `value`
///
/// With `pad_missing`, an unresolvable path contributes a single `None` so the
/// record is still represented. Elements reached through an array are never
/// padded individually: an element lacking the path contributes nothing, and
/// only an array that yields no value at all stands in with one `None`.
fn sample_path(value: &DocumentValue, path: &[&str], pad_missing: bool, out: &mut Vec<Sample>) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    let Some(child) = value.get(head) else {
        if pad_missing {
            out.push(None);
        }
        return;
    };

    match child {
        // A final array yields one sample per element
        DocumentValue::Array(items) if rest.is_empty() => {
            out.extend(items.iter().map(DocumentValue::to_sample));
        }
        _ if rest.is_empty() => out.push(child.to_sample()),
        DocumentValue::Object(_) => sample_path(child, rest, pad_missing, out),
        DocumentValue::Array(items) => {
            let before = out.len();
            for item in items {
                if let DocumentValue::Object(_) = item {
                    sample_path(item, rest, false, out);
                }
            }
            if pad_missing && out.len() == before {
                out.push(None);
            }
        }
        _ => {
            if pad_missing {
                out.push(None);
            }
        }
    }
}

impl FileProcessor for JsonFileProcessor {
    fn name(&self) -> &'static str {
        "json"
    }

    fn can_process(&self, path: &str) -> bool {
        has_extension(path, "json")
    }

    fn parse_file_schema(
        &self,
        container: &DataContainer,
        collection: &DataCollection,
        source: &dyn StreamSource,
    ) -> Result<ParsedSchema, ProcessorError> {
        let records = read_records(source.open()?)?;

        let mut fields = FieldCollector::new(container, collection);
        for record in &records {
            if let DocumentValue::Object(properties) = record {
                fields.visit("", properties);
            }
        }

        debug!(
            collection = %collection.name,
            fields = fields.entities.len(),
            records = records.len(),
            "Inferred document schema"
        );
        Ok(ParsedSchema {
            entities: fields.entities,
            row_count: records.len() as u64,
        })
    }

    fn collect_samples(
        &self,
        entity: &DataEntity,
        _entity_index: usize,
        stream: FileStream,
        request: &SampleRequest,
    ) -> Result<Vec<Sample>, ProcessorError> {
        let records = read_records(stream)?;
        let path: Vec<&str> = entity.name.split('.').collect();

        let mut samples = Vec::new();
        for record in records.iter().take(request.max_samples) {
            match record {
                DocumentValue::Object(_) => sample_path(record, &path, true, &mut samples),
                _ => samples.push(None),
            }
        }
        Ok(samples)
    }
}
