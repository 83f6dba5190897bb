//! Output formatting for the CLI

use std::fmt::Write as _;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use drive_schema_sdk::collector::SampleReport;
use drive_schema_sdk::models::{DataCollection, DataCollectionMetrics, DataEntity, Sample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

fn serialize<T: Serialize>(format: OutputFormat, value: &T) -> Result<Option<String>> {
    Ok(match format {
        OutputFormat::Json => Some(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Some(serde_yaml::to_string(value)?),
        OutputFormat::Text => None,
    })
}

#[derive(Serialize)]
struct SchemaDocument<'a> {
    collections: Vec<CollectionDocument<'a>>,
}

#[derive(Serialize)]
struct CollectionDocument<'a> {
    name: &'a str,
    fields: Vec<FieldDocument<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldDocument<'a> {
    name: &'a str,
    data_type: &'static str,
    native_type: &'a str,
}

/// Format collections with their fields
pub fn format_schema(
    format: OutputFormat,
    collections: &[DataCollection],
    entities: &[DataEntity],
) -> Result<String> {
    let document = SchemaDocument {
        collections: collections
            .iter()
            .map(|c| CollectionDocument {
                name: &c.name,
                fields: entities
                    .iter()
                    .filter(|e| e.collection.name == c.name)
                    .map(|e| FieldDocument {
                        name: &e.name,
                        data_type: e.data_type.as_str(),
                        native_type: &e.native_type,
                    })
                    .collect(),
            })
            .collect(),
    };
    if let Some(out) = serialize(format, &document)? {
        return Ok(out);
    }

    let mut output = String::new();
    writeln!(output, "{} collection(s)", document.collections.len())?;
    for collection in &document.collections {
        writeln!(output, "\n{} ({} field(s))", collection.name, collection.fields.len())?;
        for field in &collection.fields {
            writeln!(output, "  {}: {} [{}]", field.name, field.data_type, field.native_type)?;
        }
    }
    Ok(output)
}

#[derive(Serialize)]
struct FailureDocument<'a> {
    path: &'a str,
    error: String,
}

#[derive(Serialize)]
struct SamplesDocument<'a> {
    field: &'a str,
    samples: &'a [Sample],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<FailureDocument<'a>>,
}

/// Format sampled values, including per-file failures
pub fn format_samples(format: OutputFormat, field: &str, report: &SampleReport) -> Result<String> {
    let document = SamplesDocument {
        field,
        samples: &report.samples,
        failures: report
            .failures
            .iter()
            .map(|f| FailureDocument {
                path: &f.path,
                error: f.error.to_string(),
            })
            .collect(),
    };
    if let Some(out) = serialize(format, &document)? {
        return Ok(out);
    }

    let mut output = String::new();
    writeln!(output, "{} sample(s) of {}", report.samples.len(), field)?;
    for sample in &report.samples {
        writeln!(output, "  {}", sample.as_deref().unwrap_or("<null>"))?;
    }
    for failure in &document.failures {
        writeln!(output, "failed: {} ({})", failure.path, failure.error)?;
    }
    Ok(output)
}

/// Format collection metrics
pub fn format_metrics(format: OutputFormat, metrics: &[DataCollectionMetrics]) -> Result<String> {
    if let Some(out) = serialize(format, &metrics)? {
        return Ok(out);
    }

    let mut output = String::new();
    for m in metrics {
        writeln!(
            output,
            "{}: {} row(s), {:.2} KB",
            m.name, m.row_count, m.total_space_kb
        )?;
    }
    Ok(output)
}
