//! Delimited text processor
//!
//! Lines are split on a single delimiter character. There is no quoting or
//! escaping: a delimiter inside a value always starts a new cell.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::text::decoded_lines;
use super::{FileProcessor, ParsedSchema, SampleRequest, StreamSource, has_extension};
use crate::error::ProcessorError;
use crate::inference::classify;
use crate::models::{DataCollection, DataContainer, DataEntity, DataType, Sample};
use crate::storage::FileStream;

/// Options for delimited files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CsvOptions {
    /// First line holds column names; otherwise columns are named `column0..n`
    pub has_header: bool,
    /// Cell separator
    pub delimiter: char,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: ',',
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CsvFileProcessor {
    options: CsvOptions,
}

impl CsvFileProcessor {
    pub fn new(options: CsvOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        line.split(self.options.delimiter).collect()
    }

    /// Read the header (when configured) and the first non-empty data line
    fn read_head(
        &self,
        stream: FileStream,
    ) -> Result<(Option<String>, Option<String>), ProcessorError> {
        let mut lines = decoded_lines(stream);

        let header = if self.options.has_header {
            match lines.next() {
                Some(line) => Some(line?),
                None => return Ok((None, None)),
            }
        } else {
            None
        };

        for line in lines {
            let line = line?;
            if !line.trim().is_empty() {
                return Ok((header, Some(line)));
            }
        }
        Ok((header, None))
    }

    /// Count non-empty data lines
    fn count_rows(&self, stream: FileStream) -> Result<u64, ProcessorError> {
        let skip = usize::from(self.options.has_header);
        let mut rows = 0u64;
        for line in decoded_lines(stream).skip(skip) {
            if !line?.trim().is_empty() {
                rows += 1;
            }
        }
        Ok(rows)
    }
}

fn sniff(cell: &str) -> DataType {
    let cell = cell.trim();
    if cell.is_empty() {
        DataType::String
    } else {
        classify(cell)
    }
}

impl FileProcessor for CsvFileProcessor {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn can_process(&self, path: &str) -> bool {
        has_extension(path, "csv")
    }

    fn parse_file_schema(
        &self,
        container: &DataContainer,
        collection: &DataCollection,
        source: &dyn StreamSource,
    ) -> Result<ParsedSchema, ProcessorError> {
        let (header, first_row) = self.read_head(source.open()?)?;

        let Some(first_row) = first_row else {
            debug!(collection = %collection.name, "No data rows, no fields inferred");
            return Ok(ParsedSchema::default());
        };
        let cells = self.split(&first_row);

        let names: Vec<String> = match &header {
            // A blank header names nothing
            Some(header) if header.trim().is_empty() => Vec::new(),
            Some(header) => {
                let header_cells = self.split(header);
                // Only columns present in both lines are typed
                let count = header_cells.len().min(cells.len());
                header_cells[..count]
                    .iter()
                    .map(|name| name.trim().to_string())
                    .collect()
            }
            None => (0..cells.len()).map(|i| format!("column{i}")).collect(),
        };

        let entities = names
            .into_iter()
            .zip(cells.iter())
            .map(|(name, cell)| {
                let data_type = sniff(cell);
                DataEntity::new(name, data_type, data_type.as_str(), container, collection)
            })
            .collect::<Vec<_>>();

        let row_count = self.count_rows(source.open()?)?;
        debug!(
            collection = %collection.name,
            fields = entities.len(),
            rows = row_count,
            "Inferred delimited file schema"
        );

        Ok(ParsedSchema {
            entities,
            row_count,
        })
    }

    fn collect_samples(
        &self,
        _entity: &DataEntity,
        entity_index: usize,
        stream: FileStream,
        request: &SampleRequest,
    ) -> Result<Vec<Sample>, ProcessorError> {
        let mut samples = Vec::new();
        if request.max_samples == 0 {
            return Ok(samples);
        }

        let mut rng = rand::thread_rng();
        let skip = usize::from(self.options.has_header);

        for line in decoded_lines(stream).skip(skip) {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Some(p) = request.probability
                && rng.r#gen::<f64>() >= p
            {
                continue;
            }
            // Short rows have no value for this column
            if let Some(cell) = line.split(self.options.delimiter).nth(entity_index) {
                samples.push(Some(cell.trim().to_string()));
                if samples.len() >= request.max_samples {
                    break;
                }
            }
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const EMAILS: &str = "ID,NAME,DELETED\n1,Alice,false\n2,Bob,true\n\n3,Carol,false\n";

    fn stream(content: impl Into<Vec<u8>>) -> FileStream {
        Box::new(Cursor::new(content.into()))
    }

    fn parse(processor: &CsvFileProcessor, content: &'static str) -> ParsedSchema {
        let container = DataContainer::new("drive");
        let collection = DataCollection::new(&container, "emails.csv");
        let source = || -> Result<FileStream, ProcessorError> { Ok(stream(content)) };
        processor
            .parse_file_schema(&container, &collection, &source)
            .unwrap()
    }

    fn entity(name: &str) -> DataEntity {
        let container = DataContainer::new("drive");
        let collection = DataCollection::new(&container, "emails.csv");
        DataEntity::new(name, DataType::String, "String", &container, &collection)
    }

    fn utf16le(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_schema_from_header_and_first_row() {
        let schema = parse(&CsvFileProcessor::default(), EMAILS);
        let fields: Vec<(&str, DataType)> = schema
            .entities
            .iter()
            .map(|e| (e.name.as_str(), e.data_type))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("ID", DataType::Int),
                ("NAME", DataType::String),
                ("DELETED", DataType::Boolean)
            ]
        );
        assert_eq!(schema.row_count, 3);
        assert_eq!(schema.entities[0].native_type, "Int");
    }

    #[test]
    fn test_field_count_is_min_of_header_and_row() {
        let schema = parse(&CsvFileProcessor::default(), "A,B,C\n1,2\n");
        assert_eq!(schema.entities.len(), 2);

        let schema = parse(&CsvFileProcessor::default(), "A\n1,2,3\n");
        assert_eq!(schema.entities.len(), 1);
    }

    #[test]
    fn test_header_only_and_empty_files() {
        let schema = parse(&CsvFileProcessor::default(), "A,B,C\n");
        assert!(schema.entities.is_empty());
        assert_eq!(schema.row_count, 0);

        let schema = parse(&CsvFileProcessor::default(), "");
        assert!(schema.entities.is_empty());
        assert_eq!(schema.row_count, 0);
    }

    #[test]
    fn test_blank_header_yields_no_fields() {
        let schema = parse(&CsvFileProcessor::default(), "\n1,2,3\n4,5,6\n");
        assert!(schema.entities.is_empty());
        assert_eq!(schema.row_count, 2);

        let schema = parse(&CsvFileProcessor::default(), "  \r\n1,2\n");
        assert!(schema.entities.is_empty());
        assert_eq!(schema.row_count, 1);
    }

    #[test]
    fn test_headerless_synthesises_names() {
        let processor = CsvFileProcessor::new(CsvOptions {
            has_header: false,
            delimiter: ';',
        });
        let schema = parse(&processor, "1;x;2.5\n2;y;3.5\n");
        let names: Vec<&str> = schema.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["column0", "column1", "column2"]);
        assert_eq!(schema.entities[2].data_type, DataType::Double);
        assert_eq!(schema.row_count, 2);
    }

    #[test]
    fn test_samples_skip_header_and_empty_lines() {
        let processor = CsvFileProcessor::default();
        let samples = processor
            .collect_samples(&entity("NAME"), 1, stream(EMAILS), &SampleRequest::new(10))
            .unwrap();
        assert_eq!(
            samples,
            vec![
                Some("Alice".to_string()),
                Some("Bob".to_string()),
                Some("Carol".to_string())
            ]
        );
    }

    #[test]
    fn test_samples_respect_cap() {
        let processor = CsvFileProcessor::default();
        let samples = processor
            .collect_samples(&entity("ID"), 0, stream(EMAILS), &SampleRequest::new(2))
            .unwrap();
        assert_eq!(samples, vec![Some("1".to_string()), Some("2".to_string())]);

        let samples = processor
            .collect_samples(&entity("ID"), 0, stream(EMAILS), &SampleRequest::new(0))
            .unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_samples_skip_short_rows_and_trim() {
        let processor = CsvFileProcessor::default();
        let samples = processor
            .collect_samples(
                &entity("C"),
                2,
                stream("A,B,C\n1,2, x \n1,2\n1,2,y\n"),
                &SampleRequest::new(10),
            )
            .unwrap();
        assert_eq!(samples, vec![Some("x".to_string()), Some("y".to_string())]);
    }

    #[test]
    fn test_zero_probability_samples_nothing() {
        let processor = CsvFileProcessor::default();
        let request = SampleRequest::new(10).with_probability(0.0);
        let samples = processor
            .collect_samples(&entity("ID"), 0, stream(EMAILS), &request)
            .unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_utf16_and_utf8_sample_identically() {
        let processor = CsvFileProcessor::default();
        let content = "FROM_ADDR,SUBJECT\r\nann@example.com,Hi\r\nbob@example.com,Re: Hi\r\n";
        let utf8 = processor
            .collect_samples(&entity("FROM_ADDR"), 0, stream(content), &SampleRequest::new(10))
            .unwrap();
        let utf16 = processor
            .collect_samples(
                &entity("FROM_ADDR"),
                0,
                stream(utf16le(content)),
                &SampleRequest::new(10),
            )
            .unwrap();
        assert_eq!(utf8, utf16);
        assert_eq!(utf8.len(), 2);
    }
}
