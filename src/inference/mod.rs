//! Type inference for single text tokens
//!
//! The delimited-text processor has no declared types, so each column is typed
//! by classifying the cell found in the first data row.

mod sniffer;

pub use sniffer::classify;
