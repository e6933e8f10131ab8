use serde::Deserialize;
use serde_json::{Map, Value};
use std::borrow::Cow;

pub mod snapshot;

pub use snapshot::{Snapshot, SnapshotError};

/// Marker rendered for fields a listing does not carry.
pub const NOT_AVAILABLE: &str = "N/A";

/// One auction record as it appears in the snapshot.
///
/// The upstream feeds disagree on field names and shapes (`ram` vs `ram_hr`,
/// strings vs arrays, plain drive names vs drive objects), so the record is
/// kept as the raw JSON object and fields are resolved on demand through
/// [`Listing::resolve`]. A listing is never mutated after it is loaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Listing {
    fields: Map<String, Value>,
}

impl Listing {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Field Resolver: looks up `key` and classifies its shape.
    ///
    /// Absent keys and JSON `null` both resolve to [`FieldValue::Missing`];
    /// absence is an expected outcome, not an error.
    pub fn resolve(&self, key: &str) -> FieldValue {
        self.fields
            .get(key)
            .map(FieldValue::from_json)
            .unwrap_or(FieldValue::Missing)
    }

    /// Best-effort identifier used in log events.
    pub fn display_id(&self) -> String {
        match self.resolve("id") {
            FieldValue::Missing => self.resolve("name").inline_text(),
            id => id.inline_text(),
        }
    }
}

impl From<Map<String, Value>> for Listing {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Shape of a resolved listing field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Missing,
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Sequence(Vec<FieldValue>),
    Record(Map<String, Value>),
}

impl FieldValue {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Missing,
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Number(n) => FieldValue::Number(n.clone()),
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Array(items) => {
                FieldValue::Sequence(items.iter().map(FieldValue::from_json).collect())
            }
            Value::Object(map) => FieldValue::Record(map.clone()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// Text of a scalar value; `None` for missing, sequence and record values.
    pub fn scalar_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s)),
            FieldValue::Number(n) => Some(Cow::Owned(n.to_string())),
            FieldValue::Bool(b) => Some(Cow::Owned(b.to_string())),
            FieldValue::Missing | FieldValue::Sequence(_) | FieldValue::Record(_) => None,
        }
    }

    /// Numeric reading of the value: JSON numbers directly, strings if they parse.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Single-line text for any shape. Records serialise compactly and
    /// sequences are joined with `", "`.
    pub fn inline_text(&self) -> String {
        match self {
            FieldValue::Missing => NOT_AVAILABLE.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Sequence(items) => items
                .iter()
                .map(FieldValue::inline_text)
                .collect::<Vec<_>>()
                .join(", "),
            FieldValue::Record(map) => compact_json(map),
        }
    }
}

pub(crate) fn compact_json(map: &Map<String, Value>) -> String {
    // Serialising a Map<String, Value> cannot fail.
    serde_json::to_string(map).unwrap_or_default()
}
