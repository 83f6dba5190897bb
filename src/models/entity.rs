//! Entity model: one inferred field of a collection

use serde::{Deserialize, Serialize};

use super::collection::{DataCollection, DataContainer};
use super::data_type::DataType;

/// A single typed field discovered in a collection
///
/// The `name` is a dotted path for nested documents (e.g. `created.user`) and
/// the plain column name for delimited and columnar files. It is unique within
/// its collection.
///
/// # Example
///
/// ```rust
/// use drive_schema_sdk::models::{DataCollection, DataContainer, DataEntity, DataType};
///
/// let container = DataContainer::new("drive");
/// let collection = DataCollection::new(&container, "emails.csv");
/// let entity = DataEntity::new("FROM_ADDR", DataType::String, "String", &container, &collection);
/// assert_eq!(entity.collection.name, "emails.csv");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataEntity {
    /// Field path
    pub name: String,
    /// Inferred type
    pub data_type: DataType,
    /// Label of the type as the source format describes it (diagnostic only)
    pub native_type: String,
    /// Owning container
    pub container: DataContainer,
    /// Owning collection
    pub collection: DataCollection,
}

impl DataEntity {
    pub fn new(
        name: impl Into<String>,
        data_type: DataType,
        native_type: impl Into<String>,
        container: &DataContainer,
        collection: &DataCollection,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            native_type: native_type.into(),
            container: container.clone(),
            collection: collection.clone(),
        }
    }
}
