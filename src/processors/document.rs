//! Tagged document value tree
//!
//! Parsed JSON is converted into a [`DocumentValue`] so that every node carries
//! a native kind, including kinds JSON itself does not distinguish (ISO dates,
//! integers versus floats). Object properties keep their document order.

use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Number, Value};

use crate::models::{DataType, Sample};

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentValue {
    Object(Vec<(String, DocumentValue)>),
    Array(Vec<DocumentValue>),
    String(String),
    /// A string holding an ISO-8601 timestamp, kept verbatim
    Date(String),
    Number(Number),
    Boolean(bool),
    Null,
}

/// Native kind of a document node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeKind {
    Object,
    Array,
    String,
    Date,
    Integer,
    Float,
    Boolean,
    Null,
}

impl NativeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NativeKind::Object => "Object",
            NativeKind::Array => "Array",
            NativeKind::String => "String",
            NativeKind::Date => "Date",
            NativeKind::Integer => "Integer",
            NativeKind::Float => "Float",
            NativeKind::Boolean => "Boolean",
            NativeKind::Null => "Null",
        }
    }

    /// Field type for a leaf of this kind. Arrays are reported as strings.
    pub fn data_type(&self) -> DataType {
        match self {
            NativeKind::Boolean => DataType::Boolean,
            NativeKind::String | NativeKind::Array => DataType::String,
            NativeKind::Date => DataType::DateTime,
            NativeKind::Float => DataType::Float,
            NativeKind::Integer => DataType::Int,
            NativeKind::Object | NativeKind::Null => DataType::Unknown,
        }
    }
}

fn is_iso_datetime(s: &str) -> bool {
    // Cheap pre-check before the parsers run
    let bytes = s.as_bytes();
    if bytes.len() < 19 || bytes[4] != b'-' || bytes[10] != b'T' {
        return false;
    }
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

impl From<Value> for DocumentValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DocumentValue::Null,
            Value::Bool(b) => DocumentValue::Boolean(b),
            Value::Number(n) => DocumentValue::Number(n),
            Value::String(s) if is_iso_datetime(&s) => DocumentValue::Date(s),
            Value::String(s) => DocumentValue::String(s),
            Value::Array(items) => {
                DocumentValue::Array(items.into_iter().map(DocumentValue::from).collect())
            }
            Value::Object(map) => DocumentValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, DocumentValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl DocumentValue {
    pub fn kind(&self) -> NativeKind {
        match self {
            DocumentValue::Object(_) => NativeKind::Object,
            DocumentValue::Array(_) => NativeKind::Array,
            DocumentValue::String(_) => NativeKind::String,
            DocumentValue::Date(_) => NativeKind::Date,
            DocumentValue::Number(n) if n.is_f64() => NativeKind::Float,
            DocumentValue::Number(_) => NativeKind::Integer,
            DocumentValue::Boolean(_) => NativeKind::Boolean,
            DocumentValue::Null => NativeKind::Null,
        }
    }

    /// Look up an object property; `None` for missing keys and non-objects
    pub fn get(&self, key: &str) -> Option<&DocumentValue> {
        match self {
            DocumentValue::Object(properties) => properties
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Render this node as a sample value
    ///
    /// Strings and dates are returned verbatim, scalars in their JSON form and
    /// compound nodes as compact JSON. Null yields `None`.
    pub fn to_sample(&self) -> Sample {
        match self {
            DocumentValue::Null => None,
            DocumentValue::String(s) | DocumentValue::Date(s) => Some(s.clone()),
            DocumentValue::Number(n) => Some(n.to_string()),
            DocumentValue::Boolean(b) => Some(b.to_string()),
            DocumentValue::Object(_) | DocumentValue::Array(_) => Some(self.to_json().to_string()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            DocumentValue::Null => Value::Null,
            DocumentValue::Boolean(b) => Value::Bool(*b),
            DocumentValue::Number(n) => Value::Number(n.clone()),
            DocumentValue::String(s) | DocumentValue::Date(s) => Value::String(s.clone()),
            DocumentValue::Array(items) => {
                Value::Array(items.iter().map(DocumentValue::to_json).collect())
            }
            DocumentValue::Object(properties) => Value::Object(
                properties
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}
