//! Record schema types.
//!
//! A [`RecordSchema`] is a named, ordered list of [`ColumnSchema`] entries.
//! Schemas are exchanged as JSON and shared behind [`SchemaRef`] once built.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::arrow::ArrowDataType;

/// Shared, immutable schema handle.
pub type SchemaRef = Arc<RecordSchema>;

/// Column definition within a record schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name.
    pub name: String,
    /// Arrow logical data type.
    pub data_type: ArrowDataType,
    /// Whether the column permits null values.
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, data_type: ArrowDataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("malformed schema JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("schema '{0}' declares no fields")]
    Empty(String),
    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField { schema: String, field: String },
}

/// Named, ordered set of typed columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    #[serde(default)]
    pub name: String,
    pub fields: Vec<ColumnSchema>,
}

impl RecordSchema {
    /// Build a schema, rejecting empty and duplicate field lists.
    pub fn new(name: impl Into<String>, fields: Vec<ColumnSchema>) -> Result<Self, SchemaError> {
        let schema = Self {
            name: name.into(),
            fields,
        };
        schema.check()?;
        Ok(schema)
    }

    /// Parse a schema from its JSON serialization.
    pub fn parse_json(json: &str) -> Result<Self, SchemaError> {
        let schema: Self = serde_json::from_str(json)?;
        schema.check()?;
        Ok(schema)
    }

    pub fn to_json(&self) -> String {
        // Plain structs of strings and unit enums always serialize.
        serde_json::to_string(self).unwrap_or_default()
    }

    fn check(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::Empty(self.name.clone()));
        }
        let mut seen = HashSet::with_capacity(self.fields.len());
        for column in &self.fields {
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: column.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn fields(&self) -> &[ColumnSchema] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&ColumnSchema> {
        self.fields.iter().find(|column| column.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|column| column.name == name)
    }
}
