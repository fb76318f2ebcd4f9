//! Field Projector
//!
//! Selects the published subset of a snapshot. Keys come out in the order
//! of the field list, followed by the extra fields in insertion order. An
//! extra with the same name as a snapshot field replaces that field's value
//! but keeps its position. Absent snapshot values are left out.

pub mod api;
pub mod error;
pub mod extra;
pub mod fields;


use crate::source::snapshot::VersionSnapshot;
use error::{ProjectionError, ProjectionResult};
use extra::ExtraFields;
use fields::FieldSelection;
use serde_json::{Map, Value};

/// The object that gets published
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectedFields {
    values: Map<String, Value>,
}

impl ProjectedFields {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }

    /// Pretty-printed JSON with a trailing newline, as written to disk
    pub fn to_pretty_json(&self) -> ProjectionResult<String> {
        serde_json::to_string_pretty(&self.values)
            .map(|mut text| {
                text.push('\n');
                text
            })
            .map_err(|e| ProjectionError::Serialize {
                message: e.to_string(),
            })
    }

    /// Single-line JSON with a trailing newline
    pub fn to_compact_json(&self) -> ProjectionResult<String> {
        serde_json::to_string(&self.values)
            .map(|mut text| {
                text.push('\n');
                text
            })
            .map_err(|e| ProjectionError::Serialize {
                message: e.to_string(),
            })
    }
}

/// Project `snapshot` onto `selection`, then append `extra`
pub fn project(
    snapshot: &VersionSnapshot,
    selection: &FieldSelection,
    extra: &ExtraFields,
) -> ProjectedFields {
    let mut values = Map::new();

    for field in selection.fields() {
        let name = field.name();
        let value = match extra.get(name) {
            Some(overridden) => Some(overridden.to_json()),
            None => snapshot.get(*field).map(|v| Value::String(v.to_string())),
        };
        if let Some(value) = value {
            values.insert(name.to_string(), value);
        }
    }

    for (key, value) in extra.iter() {
        if !values.contains_key(key) {
            values.insert(key.to_string(), value.to_json());
        }
    }

    ProjectedFields { values }
}
