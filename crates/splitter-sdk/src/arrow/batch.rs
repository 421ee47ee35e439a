//! Row views over Arrow `RecordBatch`es.
//!
//! Record transforms work one row at a time; these helpers unpack a batch into
//! [`Record`]s and pack emitted records back into a batch.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BinaryArray, BinaryBuilder, BooleanArray, BooleanBuilder, Date32Array,
    Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, LargeStringBuilder,
    PrimitiveBuilder, StringArray, StringBuilder, TimestampMicrosecondArray,
};
use arrow::datatypes::{
    ArrowPrimitiveType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type, Schema,
    TimestampMicrosecondType,
};
use arrow::record_batch::RecordBatch;
use splitter_types::arrow::ArrowDataType;
use splitter_types::error::ConnectorError;
use splitter_types::metric::TransformSummary;
use splitter_types::record::{Record, RecordBuilder, Value};
use splitter_types::schema::{ColumnSchema, SchemaRef};

use super::schema::{build_arrow_schema, record_schema_from_arrow};
use crate::connector::Transform;
use crate::context::{Context, LogLevel};
use crate::runner::process_counted;

fn downcast<'a, A: Array + 'static>(array: &'a dyn Array) -> Result<&'a A, ConnectorError> {
    array.as_any().downcast_ref::<A>().ok_or_else(|| {
        ConnectorError::internal(
            "ARROW_DOWNCAST",
            format!(
                "column of type {} is not a {}",
                array.data_type(),
                std::any::type_name::<A>()
            ),
        )
    })
}

fn cell_value(
    array: &dyn Array,
    row: usize,
    data_type: ArrowDataType,
) -> Result<Value, ConnectorError> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match data_type {
        ArrowDataType::Boolean => Value::Boolean(downcast::<BooleanArray>(array)?.value(row)),
        ArrowDataType::Int32 => Value::Int(i64::from(downcast::<Int32Array>(array)?.value(row))),
        ArrowDataType::Int64 => Value::Int(downcast::<Int64Array>(array)?.value(row)),
        ArrowDataType::Float32 => {
            Value::Float(f64::from(downcast::<Float32Array>(array)?.value(row)))
        }
        ArrowDataType::Float64 => Value::Float(downcast::<Float64Array>(array)?.value(row)),
        ArrowDataType::Utf8 => Value::String(downcast::<StringArray>(array)?.value(row).to_string()),
        ArrowDataType::LargeUtf8 => {
            Value::String(downcast::<LargeStringArray>(array)?.value(row).to_string())
        }
        ArrowDataType::Binary => Value::Binary(downcast::<BinaryArray>(array)?.value(row).to_vec()),
        ArrowDataType::Date32 => Value::Int(i64::from(downcast::<Date32Array>(array)?.value(row))),
        ArrowDataType::TimestampMicros => {
            Value::Int(downcast::<TimestampMicrosecondArray>(array)?.value(row))
        }
        other => {
            return Err(ConnectorError::schema(
                "ARROW_UNSUPPORTED_TYPE",
                format!("cannot read Arrow column of type {other}"),
            ))
        }
    };
    Ok(value)
}

/// Unpack every row of `batch` into a record of `schema`.
pub fn records_from_batch(
    schema: &SchemaRef,
    batch: &RecordBatch,
) -> Result<Vec<Record>, ConnectorError> {
    if batch.num_columns() != schema.len() {
        return Err(ConnectorError::schema(
            "ARROW_COLUMN_COUNT",
            format!(
                "batch has {} columns but schema '{}' declares {}",
                batch.num_columns(),
                schema.name,
                schema.len()
            ),
        ));
    }

    let mut records = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let mut builder = RecordBuilder::new(Arc::clone(schema));
        for (idx, column) in schema.fields().iter().enumerate() {
            let value = cell_value(batch.column(idx).as_ref(), row, column.data_type)?;
            builder.set_at(idx, value)?;
        }
        records.push(builder.build()?);
    }
    Ok(records)
}

fn mismatch(column: &ColumnSchema, value: &Value) -> ConnectorError {
    ConnectorError::data(
        "ARROW_VALUE_TYPE",
        format!(
            "column '{}' is {} but holds a {} value",
            column.name,
            column.data_type,
            value.kind()
        ),
    )
}

fn primitive_column<P: ArrowPrimitiveType>(
    records: &[Record],
    idx: usize,
    column: &ColumnSchema,
    convert: impl Fn(&Value) -> Option<P::Native>,
) -> Result<ArrayRef, ConnectorError> {
    let mut builder = PrimitiveBuilder::<P>::with_capacity(records.len());
    for record in records {
        match record.value(idx) {
            Value::Null => builder.append_null(),
            value => builder.append_value(convert(value).ok_or_else(|| mismatch(column, value))?),
        }
    }
    let array: ArrayRef = Arc::new(builder.finish());
    Ok(array)
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(v) => Some(*v),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Float(v) => Some(*v),
        _ => None,
    }
}

/// Narrow to `f32`, refusing finite values that would overflow to infinity.
fn narrow_f32(value: f64) -> Option<f32> {
    let narrowed = value as f32;
    (narrowed.is_finite() || !value.is_finite()).then_some(narrowed)
}

fn build_column(
    records: &[Record],
    idx: usize,
    column: &ColumnSchema,
) -> Result<ArrayRef, ConnectorError> {
    let array: ArrayRef = match column.data_type {
        ArrowDataType::Boolean => {
            let mut builder = BooleanBuilder::with_capacity(records.len());
            for record in records {
                match record.value(idx) {
                    Value::Null => builder.append_null(),
                    Value::Boolean(b) => builder.append_value(*b),
                    other => return Err(mismatch(column, other)),
                }
            }
            Arc::new(builder.finish())
        }
        ArrowDataType::Int32 => primitive_column::<Int32Type>(records, idx, column, |v| {
            as_int(v).and_then(|n| i32::try_from(n).ok())
        })?,
        ArrowDataType::Int64 => primitive_column::<Int64Type>(records, idx, column, as_int)?,
        ArrowDataType::Float32 => primitive_column::<Float32Type>(records, idx, column, |v| {
            as_float(v).and_then(narrow_f32)
        })?,
        ArrowDataType::Float64 => primitive_column::<Float64Type>(records, idx, column, as_float)?,
        ArrowDataType::Date32 => primitive_column::<Date32Type>(records, idx, column, |v| {
            as_int(v).and_then(|n| i32::try_from(n).ok())
        })?,
        ArrowDataType::TimestampMicros => {
            primitive_column::<TimestampMicrosecondType>(records, idx, column, as_int)?
        }
        ArrowDataType::Utf8 => {
            let mut builder = StringBuilder::new();
            for record in records {
                match record.value(idx) {
                    Value::Null => builder.append_null(),
                    Value::String(s) => builder.append_value(s),
                    other => return Err(mismatch(column, other)),
                }
            }
            Arc::new(builder.finish())
        }
        ArrowDataType::LargeUtf8 => {
            let mut builder = LargeStringBuilder::new();
            for record in records {
                match record.value(idx) {
                    Value::Null => builder.append_null(),
                    Value::String(s) => builder.append_value(s),
                    other => return Err(mismatch(column, other)),
                }
            }
            Arc::new(builder.finish())
        }
        ArrowDataType::Binary => {
            let mut builder = BinaryBuilder::new();
            for record in records {
                match record.value(idx) {
                    Value::Null => builder.append_null(),
                    Value::Binary(bytes) => builder.append_value(bytes),
                    other => return Err(mismatch(column, other)),
                }
            }
            Arc::new(builder.finish())
        }
        other => {
            return Err(ConnectorError::schema(
                "ARROW_UNSUPPORTED_TYPE",
                format!("cannot build Arrow column of type {other}"),
            ))
        }
    };
    Ok(array)
}

/// Pack records that all share `schema` into one batch.
pub fn records_to_batch(
    schema: &SchemaRef,
    records: &[Record],
) -> Result<RecordBatch, ConnectorError> {
    if let Some(stray) = records.iter().find(|r| r.schema() != schema) {
        return Err(ConnectorError::schema(
            "ARROW_MIXED_SCHEMAS",
            format!(
                "record of schema '{}' cannot join a batch of schema '{}'",
                stray.schema().name,
                schema.name
            ),
        ));
    }

    let columns = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, column)| build_column(records, idx, column))
        .collect::<Result<Vec<_>, _>>()?;

    RecordBatch::try_new(build_arrow_schema(schema), columns).map_err(|e| {
        ConnectorError::internal("ARROW_BATCH", format!("failed to build record batch: {e}"))
    })
}

/// Drives a record transform over a sequence of Arrow batches.
///
/// The transform is opened once against the first batch schema; every later
/// batch must carry the same schema.
pub struct BatchTransformer<'a, T: Transform> {
    transform: &'a T,
    ctx: &'a Context,
    input_schema: SchemaRef,
    output_schema: Option<SchemaRef>,
    state: T::State,
    summary: TransformSummary,
}

impl<'a, T: Transform> BatchTransformer<'a, T> {
    pub fn open(
        transform: &'a T,
        ctx: &'a Context,
        arrow_schema: &Schema,
    ) -> Result<Self, ConnectorError> {
        let input_schema = Arc::new(record_schema_from_arrow(ctx.stream_name(), arrow_schema)?);
        let state = transform.open(&input_schema)?;
        let output_schema = transform.output_schema();
        if let Some(schema) = &output_schema {
            ctx.log(
                LogLevel::Debug,
                &format!("output schema '{}' with {} fields", schema.name, schema.len()),
            );
        }
        Ok(Self {
            transform,
            ctx,
            input_schema,
            output_schema,
            state,
            summary: TransformSummary::default(),
        })
    }

    pub fn input_schema(&self) -> &SchemaRef {
        &self.input_schema
    }

    /// Schema declared by the transform for its output, if any.
    pub fn output_schema(&self) -> Option<&SchemaRef> {
        self.output_schema.as_ref()
    }

    /// Arrow form of [`Self::output_schema`], for hosts that wire downstream
    /// stages before any batch flows.
    pub fn arrow_output_schema(&self) -> Option<Arc<Schema>> {
        self.output_schema.as_deref().map(build_arrow_schema)
    }

    /// Transform one batch. Returns `None` when no rows were emitted.
    ///
    /// Output rows are packed with the declared output schema, or with the
    /// schema of the first emitted record when the transform declares none.
    pub fn transform(&mut self, batch: &RecordBatch) -> Result<Option<RecordBatch>, ConnectorError> {
        let records = records_from_batch(&self.input_schema, batch)?;
        let mut emitted: Vec<Record> = Vec::new();
        let mut batch_summary = TransformSummary {
            batches_processed: 1,
            ..TransformSummary::default()
        };
        for record in &records {
            process_counted(
                self.transform,
                &self.state,
                record,
                &mut emitted,
                &mut batch_summary,
            )?;
        }
        self.summary.merge(&batch_summary);

        let output_schema = match (&self.output_schema, emitted.first()) {
            (_, None) => return Ok(None),
            (Some(declared), _) => Arc::clone(declared),
            (None, Some(first)) => Arc::clone(first.schema()),
        };
        records_to_batch(&output_schema, &emitted).map(Some)
    }

    /// Close out the run and return its summary.
    pub fn finish(self) -> TransformSummary {
        self.ctx.log(
            LogLevel::Info,
            &format!(
                "Transform complete: {} rows in, {} rows out, {} batches",
                self.summary.records_in, self.summary.records_out, self.summary.batches_processed
            ),
        );
        self.summary
    }
}
