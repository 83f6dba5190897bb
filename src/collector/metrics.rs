//! Collection size metrics

use super::snapshot::{CollectionSchema, SchemaSnapshot};
use crate::models::DataCollectionMetrics;

const BYTES_PER_KB: f64 = 1024.0;

fn collection_metrics(collection: &CollectionSchema) -> DataCollectionMetrics {
    let total_kb = collection.total_bytes() as f64 / BYTES_PER_KB;
    DataCollectionMetrics {
        name: collection.collection.name.clone(),
        row_count: collection.row_count(),
        total_space_kb: total_kb,
        // Flat files carry no index or free space
        used_space_kb: total_kb,
    }
}

/// Metrics for every collection of a snapshot, in discovery order
pub fn snapshot_metrics(snapshot: &SchemaSnapshot) -> Vec<DataCollectionMetrics> {
    snapshot
        .collections()
        .iter()
        .map(collection_metrics)
        .collect()
}
