//! Collector tests over a local drive

use std::fs;
use std::path::Path;

use drive_schema_sdk::collector::{CollectorConfig, DriveCollector};
use drive_schema_sdk::models::{DataContainer, DataEntity, DataType};
use drive_schema_sdk::storage::LocalDriveStorage;
use drive_schema_sdk::{CollectorError, ProcessorError};
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, content: impl AsRef<[u8]>) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn utf16le(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

fn collector(dir: &TempDir, config: CollectorConfig) -> DriveCollector<LocalDriveStorage> {
    DriveCollector::new(LocalDriveStorage::new(dir.path()), config)
}

fn container() -> DataContainer {
    DataContainer::new("drive")
}

fn field<'a>(entities: &'a [DataEntity], collection: &str, name: &str) -> &'a DataEntity {
    entities
        .iter()
        .find(|e| e.collection.name == collection && e.name == name)
        .unwrap_or_else(|| panic!("missing {collection}/{name}"))
}

mod schema_tests {
    use super::*;

    #[test]
    fn test_csv_schema() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "people.csv", "ID,NAME,DELETED\n1,Alice,true\n2,Bob,false\n");
        let mut collector = collector(&temp, CollectorConfig::default());

        let (collections, entities) = collector.get_schema(&container()).unwrap();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].name, "people.csv");

        let fields: Vec<(&str, DataType)> = entities
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

        let samples = collector
            .collect_sample(field(&entities, "people.csv", "NAME"), 10)
            .unwrap();
        assert_eq!(samples, vec![Some("Alice".to_string()), Some("Bob".to_string())]);

        let metrics = collector.get_collection_metrics(&container()).unwrap();
        assert_eq!(metrics[0].row_count, 2);
    }

    #[test]
    fn test_folder_grouping_merges_formats() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "crm/2023/contacts.csv", "ID,EMAIL\n1,a@example.com\n");
        write(
            temp.path(),
            "crm/2024/contacts.json",
            r#"[{"ID": "x", "EMAIL": "b@example.com", "TAGS": ["vip"]}]"#,
        );
        write(temp.path(), "crm/notes.txt", "ignored");
        let config = CollectorConfig::builder().folder_levels(1).build();
        let mut collector = collector(&temp, config);

        let (collections, entities) = collector.get_schema(&container()).unwrap();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].name, "crm");

        let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ID", "EMAIL", "TAGS"]);
        // The CSV file was discovered first, so its type wins
        assert_eq!(field(&entities, "crm", "ID").data_type, DataType::Int);
    }

    #[test]
    fn test_prefix_limits_scan_and_naming() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "exports/mail/a.csv", "X\n1\n");
        write(temp.path(), "other/b.csv", "Y\n1\n");
        let config = CollectorConfig::builder()
            .prefix("exports")
            .folder_levels(1)
            .use_file_name_in_name(true)
            .build();
        let mut collector = collector(&temp, config);

        let (collections, _) = collector.get_schema(&container()).unwrap();
        let names: Vec<&str> = collections.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["mail/a.csv"]);
    }

    #[test]
    fn test_nested_document_schema_and_samples() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "doc.json", r#"{"a":{"b":1},"c":[{"d":2},{"d":3}]}"#);
        let mut collector = collector(&temp, CollectorConfig::default());

        let (_, entities) = collector.get_schema(&container()).unwrap();
        let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.b", "c", "c.d"]);

        let samples = collector
            .collect_sample(field(&entities, "doc.json", "c.d"), 10)
            .unwrap();
        assert_eq!(samples, vec![Some("2".to_string()), Some("3".to_string())]);
    }

    #[test]
    fn test_double_dots_in_file_names_scanned() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "report..v2.csv", "ID\n1\n");
        let mut collector = collector(&temp, CollectorConfig::default());

        let (collections, entities) = collector.get_schema(&container()).unwrap();
        assert_eq!(collections[0].name, "report..v2.csv");
        let samples = collector.collect_sample(&entities[0], 10).unwrap();
        assert_eq!(samples, vec![Some("1".to_string())]);
    }

    #[test]
    fn test_invalid_document_fails_scan() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "scalar.json", "\"just a string\"");
        let mut collector = collector(&temp, CollectorConfig::default());

        let err = collector.get_schema(&container()).unwrap_err();
        assert!(matches!(
            err,
            CollectorError::Processor {
                source: ProcessorError::InvalidStructure { .. },
                ..
            }
        ));
    }
}

mod sampling_tests {
    use super::*;

    #[test]
    fn test_utf8_and_utf16_files_sample_identically() {
        let content = "FROM_ADDR,TO_ADDR\r\nann@example.com,bob@example.com\r\ncy@example.com,di@example.com\r\n";
        let temp = TempDir::new().unwrap();
        write(temp.path(), "EMAILS-UTF8.CSV", content);
        write(temp.path(), "EMAILS-UTF16.CSV", utf16le(content));
        let mut collector = collector(&temp, CollectorConfig::default());

        let (_, entities) = collector.get_schema(&container()).unwrap();
        let utf8 = collector
            .collect_sample(field(&entities, "EMAILS-UTF8.CSV", "FROM_ADDR"), 10)
            .unwrap();
        let utf16 = collector
            .collect_sample(field(&entities, "EMAILS-UTF16.CSV", "FROM_ADDR"), 10)
            .unwrap();

        assert_eq!(utf8.len(), 2);
        assert_eq!(utf8, utf16);
    }

    #[test]
    fn test_cap_applies_per_file() {
        let temp = TempDir::new().unwrap();
        for name in ["a", "b", "c"] {
            write(temp.path(), &format!("logs/{name}.csv"), format!("ID\n{name}1\n{name}2\n"));
        }
        let config = CollectorConfig::builder().folder_levels(1).build();
        let mut collector = collector(&temp, config);

        let (_, entities) = collector.get_schema(&container()).unwrap();
        let samples = collector.collect_sample(&entities[0], 1).unwrap();
        assert_eq!(
            samples,
            vec![
                Some("a1".to_string()),
                Some("b1".to_string()),
                Some("c1".to_string())
            ]
        );
    }

    #[test]
    fn test_field_absent_from_some_files() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "t/a.json", r#"[{"x": 1, "y": "p"}]"#);
        write(temp.path(), "t/b.json", r#"[{"x": 2}]"#);
        let config = CollectorConfig::builder().folder_levels(1).build();
        let mut collector = collector(&temp, config);

        let (_, entities) = collector.get_schema(&container()).unwrap();
        let samples = collector.collect_sample(field(&entities, "t", "y"), 10).unwrap();
        assert_eq!(samples, vec![Some("p".to_string())]);
    }

    #[test]
    fn test_deleted_file_reported_and_siblings_sampled() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "t/a.csv", "ID\n1\n");
        write(temp.path(), "t/b.csv", "ID\n2\n");
        let config = CollectorConfig::builder().folder_levels(1).build();
        let mut collector = collector(&temp, config);

        let (_, entities) = collector.get_schema(&container()).unwrap();
        fs::remove_file(temp.path().join("t/a.csv")).unwrap();

        let report = collector
            .collect_sample_report(
                &entities[0],
                &drive_schema_sdk::SampleRequest::new(10),
            )
            .unwrap();
        assert_eq!(report.samples, vec![Some("2".to_string())]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "t/a.csv");
    }
}

mod metrics_tests {
    use super::*;

    #[test]
    fn test_metrics_per_collection() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a/one.csv", "ID\n1\n2\n3\n");
        write(temp.path(), "a/two.json", r#"[{"ID": 4}, {"ID": 5}]"#);
        write(temp.path(), "b/three.csv", "ID\n");
        let config = CollectorConfig::builder().folder_levels(1).build();
        let mut collector = collector(&temp, config);

        let metrics = collector.get_collection_metrics(&container()).unwrap();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].name, "a");
        assert_eq!(metrics[0].row_count, 5);
        let bytes = (9 + r#"[{"ID": 4}, {"ID": 5}]"#.len()) as f64;
        assert_eq!(metrics[0].total_space_kb, bytes / 1024.0);
        assert_eq!(metrics[1].name, "b");
        assert_eq!(metrics[1].row_count, 0);
    }
}
