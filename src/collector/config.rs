//! Configuration for drive collection

use serde::{Deserialize, Serialize};

use crate::error::{CollectorError, Result};
use crate::processors::CsvOptions;

/// Configuration for scanning a drive into collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectorConfig {
    /// Only files below this path are scanned; it is stripped before naming
    pub prefix: Option<String>,

    /// Number of leading folders that make up a collection name
    /// (0 = one collection per file)
    pub folder_levels: usize,

    /// Append the file name to the folder part of the collection name
    pub use_file_name_in_name: bool,

    /// Options for delimited files
    pub csv: CsvOptions,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            prefix: None,
            folder_levels: 0,
            use_file_name_in_name: false,
            csv: CsvOptions::default(),
        }
    }
}

impl CollectorConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> CollectorConfigBuilder {
        CollectorConfigBuilder::default()
    }

    /// Load from a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| CollectorError::Config(e.to_string()))
    }

    /// Load from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CollectorError::Config(e.to_string()))
    }

    /// The prefix without surrounding separators, `None` when blank
    pub fn normalized_prefix(&self) -> Option<&str> {
        self.prefix
            .as_deref()
            .map(|p| p.trim_matches(|c| c == '/' || c == '\\'))
            .filter(|p| !p.is_empty())
    }
}

/// Builder for CollectorConfig
#[derive(Debug, Default)]
pub struct CollectorConfigBuilder {
    config: CollectorConfig,
}

impl CollectorConfigBuilder {
    /// Restrict scanning to files below `prefix`
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = Some(prefix.into());
        self
    }

    /// Set how many leading folders name a collection
    pub fn folder_levels(mut self, levels: usize) -> Self {
        self.config.folder_levels = levels;
        self
    }

    /// Include the file name in collection names
    pub fn use_file_name_in_name(mut self, use_file_name: bool) -> Self {
        self.config.use_file_name_in_name = use_file_name;
        self
    }

    /// Whether delimited files start with a header line
    pub fn csv_has_header(mut self, has_header: bool) -> Self {
        self.config.csv.has_header = has_header;
        self
    }

    /// Cell separator for delimited files
    pub fn csv_delimiter(mut self, delimiter: char) -> Self {
        self.config.csv.delimiter = delimiter;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CollectorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CollectorConfig::default();
        assert_eq!(config.prefix, None);
        assert_eq!(config.folder_levels, 0);
        assert!(!config.use_file_name_in_name);
        assert!(config.csv.has_header);
        assert_eq!(config.csv.delimiter, ',');
    }

    #[test]
    fn test_builder() {
        let config = CollectorConfig::builder()
            .prefix("exports/")
            .folder_levels(2)
            .use_file_name_in_name(true)
            .csv_has_header(false)
            .csv_delimiter(';')
            .build();

        assert_eq!(config.normalized_prefix(), Some("exports"));
        assert_eq!(config.folder_levels, 2);
        assert!(config.use_file_name_in_name);
        assert!(!config.csv.has_header);
        assert_eq!(config.csv.delimiter, ';');
    }

    #[test]
    fn test_from_yaml() {
        let config = CollectorConfig::from_yaml_str(
            "prefix: data\nfolderLevels: 1\ncsv:\n  delimiter: '|'\n",
        )
        .unwrap();
        assert_eq!(config.prefix.as_deref(), Some("data"));
        assert_eq!(config.folder_levels, 1);
        assert_eq!(config.csv.delimiter, '|');
        // Unset keys keep their defaults
        assert!(config.csv.has_header);
    }

    #[test]
    fn test_from_json() {
        let config =
            CollectorConfig::from_json_str(r#"{"useFileNameInName": true, "folderLevels": 3}"#)
                .unwrap();
        assert!(config.use_file_name_in_name);
        assert_eq!(config.folder_levels, 3);

        let err = CollectorConfig::from_json_str("{\"folderLevels\": \"x\"}").unwrap_err();
        assert!(matches!(err, CollectorError::Config(_)));
    }

    #[test]
    fn test_blank_prefix_is_none() {
        let config = CollectorConfig::builder().prefix("/").build();
        assert_eq!(config.normalized_prefix(), None);
    }
}
