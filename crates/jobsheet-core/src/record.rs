//! Record and field value types

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::schema::Schema;

/// A scalar value held in one field of a record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// No value
    Empty,

    /// Text value (dates are stored as opaque text)
    Text(String),

    /// Numeric value
    Number(f64),

    /// Boolean value
    Boolean(bool),
}

impl FieldValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        FieldValue::Text(s.into())
    }

    /// Check if the value is empty (no value, or empty text)
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Normalize the value to text.
    ///
    /// This is the form used for storage, comparison, and suggestion lists.
    /// Whole numbers print without a fractional part.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            FieldValue::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
        }
    }

    /// Convert a JSON value into a field value.
    ///
    /// Scalars map directly; arrays and objects are kept as their JSON text.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => FieldValue::Empty,
            JsonValue::Bool(b) => FieldValue::Boolean(*b),
            JsonValue::Number(n) => match n.as_f64() {
                Some(f) => FieldValue::Number(f),
                None => FieldValue::Text(n.to_string()),
            },
            JsonValue::String(s) => FieldValue::Text(s.clone()),
            other => FieldValue::Text(other.to_string()),
        }
    }

    /// Convert the value to JSON. Empty values serialize as `""` so every
    /// schema field is present in API responses.
    pub fn to_json(&self) -> JsonValue {
        match self {
            FieldValue::Empty => JsonValue::String(String::new()),
            FieldValue::Text(s) => JsonValue::String(s.clone()),
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(self.as_text())),
            FieldValue::Boolean(b) => JsonValue::Bool(*b),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Empty
    }
}

/// One row of the job table, keyed by field name.
///
/// Field order is defined by the [`Schema`], not by the record; a record may
/// carry any subset of the schema's fields, and absent fields read as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: HashMap<String, FieldValue>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the record carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if every carried field normalizes to empty text
    pub fn is_blank(&self) -> bool {
        self.values.values().all(|v| v.is_empty())
    }

    /// Number of fields carried by the record
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Set a field value, replacing any previous value
    pub fn set<S: Into<String>>(&mut self, field: S, value: FieldValue) {
        self.values.insert(field.into(), value);
    }

    /// Get a field value, if the record carries the field
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Normalized text for a field; empty when the field is absent
    pub fn text(&self, field: &str) -> String {
        self.values
            .get(field)
            .map(FieldValue::as_text)
            .unwrap_or_default()
    }

    /// Iterate over the carried field names (in no particular order)
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Build a record from a JSON object, one field per key
    pub fn from_json_object(object: &serde_json::Map<String, JsonValue>) -> Self {
        let mut record = Record::new();
        for (field, value) in object {
            record.set(field.clone(), FieldValue::from_json(value));
        }
        record
    }

    /// Serialize the record as a JSON object with every schema field present
    /// in header order, defaulting absent fields to `""`.
    pub fn to_json_object(&self, schema: &Schema) -> serde_json::Map<String, JsonValue> {
        let mut object = serde_json::Map::new();
        for field in schema.fields() {
            let value = self
                .values
                .get(field)
                .map(FieldValue::to_json)
                .unwrap_or_else(|| JsonValue::String(String::new()));
            object.insert(field.clone(), value);
        }
        object
    }
}
