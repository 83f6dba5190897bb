//! Models module for the SDK
//!
//! Value carriers exchanged with the hosting platform: containers, collections,
//! inferred entities (fields), collection metrics, and file descriptors.

pub mod collection;
pub mod data_type;
pub mod entity;

pub use collection::{DataCollection, DataCollectionMetrics, DataContainer, DriveFileInfo};
pub use data_type::DataType;
pub use entity::DataEntity;

/// One sampled value. `None` stands for a null or unresolvable value.
pub type Sample = Option<String>;
