//! Collection naming
//!
//! A file's collection name is derived from its path relative to the
//! configured prefix:
//!
//! | path              | folder levels | file name | collection      |
//! |-------------------|---------------|-----------|-----------------|
//! | `a/b/c/data.csv`  | 0             | -         | `data.csv`      |
//! | `a/b/c/data.csv`  | 2             | no        | `a/b`           |
//! | `a/b/c/data.csv`  | 2             | yes       | `a/b/data.csv`  |
//!
//! Both `/` and `\` are accepted as separators; names always use `/`.

use super::config::CollectorConfig;

fn split_path(path: &str) -> Vec<&str> {
    path.split(['/', '\\']).filter(|s| !s.is_empty()).collect()
}

/// Path of `file_path` relative to `prefix`, as segments
fn relative_segments<'a>(file_path: &'a str, prefix: Option<&str>) -> Vec<&'a str> {
    let segments = split_path(file_path);
    let Some(prefix) = prefix else {
        return segments;
    };
    let prefix_segments = split_path(prefix);
    if segments.len() > prefix_segments.len() && segments.starts_with(&prefix_segments) {
        segments[prefix_segments.len()..].to_vec()
    } else {
        segments
    }
}

/// Derive the collection name for a file
pub fn collection_name(config: &CollectorConfig, file_path: &str) -> String {
    let segments = relative_segments(file_path, config.normalized_prefix());
    let Some((file_name, folders)) = segments.split_last() else {
        return String::new();
    };

    let mut parts: Vec<&str> = folders
        .iter()
        .take(config.folder_levels)
        .copied()
        .collect();
    // A file with no folders to group by is named after itself
    if config.folder_levels == 0 || config.use_file_name_in_name || parts.is_empty() {
        parts.push(file_name);
    }
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(levels: usize, use_file_name: bool) -> CollectorConfig {
        CollectorConfig::builder()
            .folder_levels(levels)
            .use_file_name_in_name(use_file_name)
            .build()
    }

    #[test]
    fn test_file_per_collection() {
        assert_eq!(collection_name(&config(0, false), "a/b/c/data.csv"), "data.csv");
        assert_eq!(collection_name(&config(0, true), "a/b/c/data.csv"), "data.csv");
    }

    #[test]
    fn test_folder_levels() {
        assert_eq!(collection_name(&config(2, false), "a/b/c/data.csv"), "a/b");
        assert_eq!(collection_name(&config(2, true), "a/b/c/data.csv"), "a/b/data.csv");
        assert_eq!(collection_name(&config(5, false), "a/b/data.csv"), "a/b");
    }

    #[test]
    fn test_backslash_separators() {
        assert_eq!(collection_name(&config(1, false), "a\\b\\data.csv"), "a");
        assert_eq!(collection_name(&config(0, false), "a\\b\\data.csv"), "data.csv");
    }

    #[test]
    fn test_prefix_stripped() {
        let config = CollectorConfig::builder()
            .prefix("exports/2024")
            .folder_levels(1)
            .build();
        assert_eq!(collection_name(&config, "exports/2024/mail/emails.csv"), "mail");
        // Paths outside the prefix are named as-is
        assert_eq!(collection_name(&config, "other/mail/emails.csv"), "other");
    }

    #[test]
    fn test_root_file_with_folder_grouping() {
        assert_eq!(collection_name(&config(2, false), "emails.csv"), "emails.csv");
    }
}
