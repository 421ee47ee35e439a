//! Row-level record model.
//!
//! A [`Record`] is an immutable row of [`Value`]s laid out in the order of its
//! [`SchemaRef`]. New records are accumulated field by field through a
//! [`RecordBuilder`], which enforces column types and nullability.

use std::fmt;

use crate::arrow::ArrowDataType;
use crate::error::ConnectorError;
use crate::schema::SchemaRef;

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    /// Integers, dates (days since epoch) and timestamps (microseconds).
    Int(i64),
    Float(f64),
    String(String),
    Binary(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value's variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Binary(_) => "binary",
        }
    }

    /// Whether this value may be stored in a column of `data_type`.
    ///
    /// `Null` conforms to every type; nullability is checked at build time.
    pub fn conforms_to(&self, data_type: ArrowDataType) -> bool {
        match (self, data_type) {
            (Self::Null, _) => true,
            (Self::Boolean(_), ArrowDataType::Boolean) => true,
            (Self::Int(v), ArrowDataType::Int32 | ArrowDataType::Date32) => {
                i32::try_from(*v).is_ok()
            }
            (Self::Int(_), ArrowDataType::Int64 | ArrowDataType::TimestampMicros) => true,
            (Self::Float(_), ArrowDataType::Float32 | ArrowDataType::Float64) => true,
            (Self::String(_), ArrowDataType::Utf8 | ArrowDataType::LargeUtf8) => true,
            (Self::Binary(_), ArrowDataType::Binary) => true,
            _ => false,
        }
    }

    /// Decode a JSON value for a column of `data_type`.
    pub fn from_json(
        json: &serde_json::Value,
        data_type: ArrowDataType,
    ) -> Result<Self, ConnectorError> {
        use serde_json::Value as Json;

        let value = match (json, data_type) {
            (Json::Null, _) => Some(Self::Null),
            (Json::Bool(b), ArrowDataType::Boolean) => Some(Self::Boolean(*b)),
            (
                Json::Number(n),
                ArrowDataType::Int32
                | ArrowDataType::Int64
                | ArrowDataType::Date32
                | ArrowDataType::TimestampMicros,
            ) => n.as_i64().map(Self::Int),
            (Json::Number(n), ArrowDataType::Float32 | ArrowDataType::Float64) => {
                n.as_f64().map(Self::Float)
            }
            (Json::String(s), ArrowDataType::Utf8 | ArrowDataType::LargeUtf8) => {
                Some(Self::String(s.clone()))
            }
            (Json::String(s), ArrowDataType::Binary) => Some(Self::Binary(s.as_bytes().to_vec())),
            _ => None,
        };

        match value {
            Some(v) if v.conforms_to(data_type) => Ok(v),
            _ => Err(ConnectorError::data(
                "RECORD_JSON_TYPE",
                format!("JSON value {json} cannot be read as {data_type}"),
            )),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Self::Null => Json::Null,
            Self::Boolean(b) => Json::Bool(*b),
            Self::Int(v) => Json::from(*v),
            Self::Float(v) => serde_json::Number::from_f64(*v).map_or(Json::Null, Json::Number),
            Self::String(s) => Json::String(s.clone()),
            Self::Binary(bytes) => Json::String(String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
            Self::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Immutable row conforming to a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: SchemaRef,
    values: Vec<Value>,
}

impl Record {
    pub fn builder(schema: SchemaRef) -> RecordBuilder {
        RecordBuilder::new(schema)
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Value of the named field, or `None` when the schema has no such field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.index_of(name).map(|idx| &self.values[idx])
    }

    /// Value at a schema position.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the schema.
    pub fn value(&self, index: usize) -> &Value {
        &self.values[index]
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Decode one JSON object into a record of `schema`.
    ///
    /// Keys missing from the object read as null; keys not in the schema are
    /// ignored.
    pub fn from_json(schema: SchemaRef, row: &serde_json::Value) -> Result<Self, ConnectorError> {
        let object = row.as_object().ok_or_else(|| {
            ConnectorError::data("RECORD_JSON_SHAPE", "record JSON must be an object")
        })?;

        let mut builder = RecordBuilder::new(SchemaRef::clone(&schema));
        for (idx, column) in schema.fields().iter().enumerate() {
            let value = match object.get(&column.name) {
                Some(json) => Value::from_json(json, column.data_type).map_err(|e| {
                    ConnectorError::data(
                        e.code,
                        format!("field '{}': {}", column.name, e.message),
                    )
                })?,
                None => Value::Null,
            };
            builder.set_at(idx, value)?;
        }
        builder.build()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .schema
            .fields()
            .iter()
            .zip(&self.values)
            .map(|(column, value)| (column.name.clone(), value.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

/// Field-by-field accumulator for a [`Record`].
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    schema: SchemaRef,
    values: Vec<Value>,
}

impl RecordBuilder {
    pub fn new(schema: SchemaRef) -> Self {
        let values = vec![Value::Null; schema.len()];
        Self { schema, values }
    }

    /// Set a field by name.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, ConnectorError> {
        let idx = self.schema.index_of(name).ok_or_else(|| {
            ConnectorError::data(
                "RECORD_UNKNOWN_FIELD",
                format!("field '{name}' is not declared in schema '{}'", self.schema.name),
            )
        })?;
        self.set_at(idx, value)
    }

    /// Set a field by schema position.
    pub fn set_at(
        &mut self,
        index: usize,
        value: impl Into<Value>,
    ) -> Result<&mut Self, ConnectorError> {
        let value = value.into();
        let column = self.schema.fields().get(index).ok_or_else(|| {
            ConnectorError::internal(
                "RECORD_INDEX",
                format!(
                    "field index {index} out of range for schema '{}' ({} fields)",
                    self.schema.name,
                    self.schema.len()
                ),
            )
        })?;
        if !value.conforms_to(column.data_type) {
            return Err(ConnectorError::data(
                "RECORD_TYPE_MISMATCH",
                format!(
                    "field '{}' is {} but was given a {} value",
                    column.name,
                    column.data_type,
                    value.kind()
                ),
            ));
        }
        self.values[index] = value;
        Ok(self)
    }

    /// Finish the record, checking that non-nullable fields were set.
    pub fn build(self) -> Result<Record, ConnectorError> {
        for (column, value) in self.schema.fields().iter().zip(&self.values) {
            if !column.nullable && value.is_null() {
                return Err(ConnectorError::data(
                    "RECORD_FIELD_REQUIRED",
                    format!("non-nullable field '{}' must contain a value", column.name),
                ));
            }
        }
        Ok(Record {
            schema: self.schema,
            values: self.values,
        })
    }
}
