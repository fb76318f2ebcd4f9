//! Validated list of snapshot fields to publish

use super::error::{ProjectionError, ProjectionResult};
use crate::source::snapshot::SnapshotField;
use std::str::FromStr;

/// Fields published when the configuration does not name any
pub const DEFAULT_FIELDS: [SnapshotField; 2] = [SnapshotField::Version, SnapshotField::BuildTime];

/// Ordered, duplicate-free field list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    fields: Vec<SnapshotField>,
}

impl Default for FieldSelection {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FIELDS.to_vec(),
        }
    }
}

impl FieldSelection {
    /// Keep the first occurrence of each field, in the given order
    pub fn new(fields: impl IntoIterator<Item = SnapshotField>) -> Self {
        let mut selected = Vec::new();
        for field in fields {
            if !selected.contains(&field) {
                selected.push(field);
            }
        }
        Self { fields: selected }
    }

    /// Parse field names, rejecting anything that is not a snapshot field
    pub fn parse<S: AsRef<str>>(names: &[S]) -> ProjectionResult<Self> {
        let fields = names
            .iter()
            .map(|name| {
                let name = name.as_ref().trim();
                SnapshotField::from_str(name).map_err(|_| ProjectionError::UnknownField {
                    name: name.to_string(),
                    valid: SnapshotField::names().collect::<Vec<_>>().join(", "),
                })
            })
            .collect::<ProjectionResult<Vec<_>>>()?;
        Ok(Self::new(fields))
    }

    pub fn fields(&self) -> &[SnapshotField] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name())
    }
}
