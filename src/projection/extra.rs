//! Caller-supplied static fields, classified once at configuration time

use super::error::{ProjectionError, ProjectionResult};
use serde_json::{Map, Number, Value};

/// Shape of an extra field value
#[derive(Debug, Clone, PartialEq)]
pub enum ExtraValue {
    Text(String),
    Number(Number),
    Boolean(bool),
    /// Tables and arrays, kept as JSON
    Record(Value),
}

impl ExtraValue {
    /// Classify a JSON value. `null` has no shape and is rejected.
    pub fn from_json(key: &str, value: Value) -> ProjectionResult<Self> {
        match value {
            Value::String(s) => Ok(Self::Text(s)),
            Value::Number(n) => Ok(Self::Number(n)),
            Value::Bool(b) => Ok(Self::Boolean(b)),
            Value::Object(_) | Value::Array(_) => Ok(Self::Record(value)),
            Value::Null => Err(ProjectionError::InvalidExtra {
                key: key.to_string(),
                reason: "null values are not allowed".to_string(),
            }),
        }
    }

    /// Classify a TOML value; datetimes become text
    pub fn from_toml(key: &str, value: &toml::Value) -> ProjectionResult<Self> {
        match value {
            toml::Value::String(s) => Ok(Self::Text(s.clone())),
            toml::Value::Integer(i) => Ok(Self::Number((*i).into())),
            toml::Value::Float(f) => Number::from_f64(*f)
                .map(Self::Number)
                .ok_or_else(|| ProjectionError::InvalidExtra {
                    key: key.to_string(),
                    reason: format!("{} is not a finite number", f),
                }),
            toml::Value::Boolean(b) => Ok(Self::Boolean(*b)),
            toml::Value::Datetime(dt) => Ok(Self::Text(dt.to_string())),
            toml::Value::Array(_) | toml::Value::Table(_) => {
                let json = serde_json::to_value(value).map_err(|e| ProjectionError::InvalidExtra {
                    key: key.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(Self::Record(json))
            }
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Record(v) => v.clone(),
        }
    }
}

/// Extra fields in insertion order. Re-inserting a key replaces its value
/// in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraFields {
    entries: Vec<(String, ExtraValue)>,
}

impl ExtraFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ExtraValue) -> ProjectionResult<()> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ProjectionError::InvalidExtra {
                key,
                reason: "keys must not be empty".to_string(),
            });
        }

        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
        Ok(())
    }

    pub fn with(mut self, key: impl Into<String>, value: ExtraValue) -> ProjectionResult<Self> {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Classify every entry of a TOML table
    pub fn from_toml_table(table: &toml::Table) -> ProjectionResult<Self> {
        let mut extras = Self::new();
        for (key, value) in table {
            extras.insert(key.clone(), ExtraValue::from_toml(key, value)?)?;
        }
        Ok(extras)
    }

    /// Classify every entry of a JSON object
    pub fn from_json_map(map: Map<String, Value>) -> ProjectionResult<Self> {
        let mut extras = Self::new();
        for (key, value) in map {
            let classified = ExtraValue::from_json(&key, value)?;
            extras.insert(key, classified)?;
        }
        Ok(extras)
    }

    pub fn get(&self, key: &str) -> Option<&ExtraValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtraValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
