//! Arrow schema construction from record schemas, and back.

use std::sync::Arc;

use arrow::datatypes::{Field, Schema};
use splitter_types::error::ConnectorError;
use splitter_types::schema::{ColumnSchema, RecordSchema};

use super::types::{arrow_data_type, protocol_data_type};

/// Build an Arrow Schema from a record schema.
pub fn build_arrow_schema(schema: &RecordSchema) -> Arc<Schema> {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|col| Field::new(&col.name, arrow_data_type(col.data_type), col.nullable))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Describe an Arrow Schema as a record schema named `name`.
pub fn record_schema_from_arrow(
    name: &str,
    schema: &Schema,
) -> Result<RecordSchema, ConnectorError> {
    let columns = schema
        .fields()
        .iter()
        .map(|field| {
            let data_type = protocol_data_type(field.data_type()).ok_or_else(|| {
                ConnectorError::schema(
                    "ARROW_UNSUPPORTED_TYPE",
                    format!(
                        "column '{}' has unsupported Arrow type {}",
                        field.name(),
                        field.data_type()
                    ),
                )
            })?;
            Ok(ColumnSchema::new(field.name(), data_type, field.is_nullable()))
        })
        .collect::<Result<Vec<_>, ConnectorError>>()?;

    RecordSchema::new(name, columns)
        .map_err(|e| ConnectorError::schema("ARROW_SCHEMA_INVALID", e.to_string()))
}
