//! Coarse data types assigned to inferred fields

use serde::{Deserialize, Serialize};

/// Closed set of types a field can be inferred as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataType {
    #[default]
    Unknown,
    String,
    Int,
    Float,
    Double,
    Boolean,
    DateTime,
    Guid,
}

impl DataType {
    /// Name of the variant, used as the native-type label for sniffed values
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Unknown => "Unknown",
            DataType::String => "String",
            DataType::Int => "Int",
            DataType::Float => "Float",
            DataType::Double => "Double",
            DataType::Boolean => "Boolean",
            DataType::DateTime => "DateTime",
            DataType::Guid => "Guid",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
