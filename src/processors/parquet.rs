//! Parquet processor
//!
//! Field types come from the file's embedded schema, so no value sniffing is
//! needed. Values are read through the row API, one row group at a time,
//! with the rows projected down to the single column being sampled.

use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use parquet::basic::{ConvertedType, LogicalType, Type as PhysicalType};
use parquet::file::reader::{FileReader, RowGroupReader, SerializedFileReader};
use parquet::record::Field;
use parquet::schema::types::{ColumnDescriptor, Type as SchemaType, TypePtr};
use tracing::debug;

use super::{FileProcessor, ParsedSchema, SampleRequest, StreamSource, has_extension};
use crate::error::ProcessorError;
use crate::models::{DataCollection, DataContainer, DataEntity, DataType, Sample};
use crate::storage::FileStream;

#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetFileProcessor;

impl ParquetFileProcessor {
    pub fn new() -> Self {
        Self
    }
}

/// The footer sits at the end of the file, so the whole stream is buffered
fn open_reader(mut stream: FileStream) -> Result<SerializedFileReader<Bytes>, ProcessorError> {
    let mut buffer = Vec::new();
    stream.read_to_end(&mut buffer)?;
    Ok(SerializedFileReader::new(Bytes::from(buffer))?)
}

fn column_type(column: &ColumnDescriptor) -> DataType {
    let logical = column.logical_type();
    let converted = column.converted_type();

    if matches!(
        logical,
        Some(LogicalType::Timestamp { .. }) | Some(LogicalType::Date)
    ) || matches!(
        converted,
        ConvertedType::TIMESTAMP_MILLIS | ConvertedType::TIMESTAMP_MICROS | ConvertedType::DATE
    ) {
        return DataType::DateTime;
    }

    match column.physical_type() {
        PhysicalType::BOOLEAN => DataType::Boolean,
        PhysicalType::INT32
            if matches!(logical, None | Some(LogicalType::Integer { .. }))
                && matches!(
                    converted,
                    ConvertedType::NONE
                        | ConvertedType::INT_8
                        | ConvertedType::INT_16
                        | ConvertedType::INT_32
                ) =>
        {
            DataType::Int
        }
        PhysicalType::DOUBLE => DataType::Double,
        PhysicalType::INT96 => DataType::DateTime,
        // Byte arrays are read as text unless annotated as something else
        PhysicalType::BYTE_ARRAY
            if matches!(
                logical,
                None | Some(LogicalType::String) | Some(LogicalType::Enum) | Some(LogicalType::Json)
            ) && converted != ConvertedType::DECIMAL =>
        {
            DataType::String
        }
        _ => DataType::Unknown,
    }
}

fn native_label(column: &ColumnDescriptor) -> String {
    let physical = column.physical_type();
    match (column.logical_type(), column.converted_type()) {
        (Some(logical), _) => format!("{physical} ({logical:?})"),
        (None, ConvertedType::NONE) => physical.to_string(),
        (None, converted) => format!("{physical} ({converted})"),
    }
}

/// Prune `fields` down to the branch leading to the leaf at `path`
fn project_fields(fields: &[TypePtr], path: &[String]) -> Result<Vec<TypePtr>, ProcessorError> {
    let Some((head, rest)) = path.split_first() else {
        return Ok(Vec::new());
    };
    let Some(field) = fields.iter().find(|f| f.name() == head.as_str()) else {
        return Ok(Vec::new());
    };
    if rest.is_empty() || !field.is_group() {
        return Ok(vec![field.clone()]);
    }

    let info = field.get_basic_info();
    let mut builder = SchemaType::group_type_builder(info.name())
        .with_fields(project_fields(field.get_fields(), rest)?)
        .with_logical_type(info.logical_type())
        .with_converted_type(info.converted_type());
    if info.has_repetition() {
        builder = builder.with_repetition(info.repetition());
    }
    Ok(vec![Arc::new(builder.build()?)])
}

/// Message type holding only the column at `path`
fn projection(root: &SchemaType, path: &[String]) -> Result<SchemaType, ProcessorError> {
    Ok(SchemaType::group_type_builder(root.name())
        .with_fields(project_fields(root.get_fields(), path)?)
        .build()?)
}

/// Append every leaf value below `field`; lists and maps yield one value per item
fn push_values(field: &Field, out: &mut Vec<Sample>) {
    match field {
        Field::Group(row) => {
            for (_, child) in row.get_column_iter() {
                push_values(child, out);
            }
        }
        Field::ListInternal(list) => {
            for element in list.elements() {
                push_values(element, out);
            }
        }
        Field::MapInternal(map) => {
            for (key, value) in map.entries() {
                push_values(key, out);
                push_values(value, out);
            }
        }
        other => out.push(field_to_sample(other)),
    }
}

fn field_to_sample(field: &Field) -> Sample {
    match field {
        Field::Null => None,
        // Display would quote strings
        Field::Str(s) => Some(s.clone()),
        Field::Bytes(b) => Some(String::from_utf8_lossy(b.data()).into_owned()),
        other => Some(other.to_string()),
    }
}

impl FileProcessor for ParquetFileProcessor {
    fn name(&self) -> &'static str {
        "parquet"
    }

    fn can_process(&self, path: &str) -> bool {
        has_extension(path, "parquet")
    }

    fn parse_file_schema(
        &self,
        container: &DataContainer,
        collection: &DataCollection,
        source: &dyn StreamSource,
    ) -> Result<ParsedSchema, ProcessorError> {
        let reader = open_reader(source.open()?)?;
        let metadata = reader.metadata();

        let entities = metadata
            .file_metadata()
            .schema_descr()
            .columns()
            .iter()
            .map(|column| {
                DataEntity::new(
                    column.path().string(),
                    column_type(column),
                    native_label(column),
                    container,
                    collection,
                )
            })
            .collect::<Vec<_>>();

        let row_count = metadata
            .row_groups()
            .iter()
            .map(|rg| rg.num_rows().max(0) as u64)
            .sum();

        debug!(
            collection = %collection.name,
            fields = entities.len(),
            rows = row_count,
            row_groups = metadata.num_row_groups(),
            "Read columnar file schema"
        );
        Ok(ParsedSchema {
            entities,
            row_count,
        })
    }

    fn collect_samples(
        &self,
        entity: &DataEntity,
        _entity_index: usize,
        stream: FileStream,
        request: &SampleRequest,
    ) -> Result<Vec<Sample>, ProcessorError> {
        let mut samples = Vec::new();
        if request.max_samples == 0 {
            return Ok(samples);
        }

        let reader = open_reader(stream)?;
        let schema = reader.metadata().file_metadata().schema_descr_ptr();
        let Some(column) = schema
            .columns()
            .iter()
            .find(|column| column.path().string() == entity.name)
        else {
            debug!(field = %entity.name, "Column not present in file");
            return Ok(samples);
        };
        let projection = projection(schema.root_schema(), column.path().parts())?;

        for i in 0..reader.num_row_groups() {
            let row_group = reader.get_row_group(i)?;
            for row in row_group.get_row_iter(Some(projection.clone()))? {
                let row = row?;
                for (_, field) in row.get_column_iter() {
                    push_values(field, &mut samples);
                }
                if samples.len() >= request.max_samples {
                    samples.truncate(request.max_samples);
                    return Ok(samples);
                }
            }
        }
        Ok(samples)
    }
}
