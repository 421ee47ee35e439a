//! Conversion between protocol-level ArrowDataType and arrow crate DataType.

use arrow::datatypes::{DataType, TimeUnit};
use splitter_types::arrow::ArrowDataType;

/// Convert protocol ArrowDataType to the arrow crate DataType.
///
/// This is the single source of truth for type mapping.
pub fn arrow_data_type(proto: ArrowDataType) -> DataType {
    match proto {
        ArrowDataType::Boolean => DataType::Boolean,
        ArrowDataType::Int32 => DataType::Int32,
        ArrowDataType::Int64 => DataType::Int64,
        ArrowDataType::Float32 => DataType::Float32,
        ArrowDataType::Float64 => DataType::Float64,
        ArrowDataType::Utf8 => DataType::Utf8,
        ArrowDataType::LargeUtf8 => DataType::LargeUtf8,
        ArrowDataType::Binary => DataType::Binary,
        ArrowDataType::Date32 => DataType::Date32,
        ArrowDataType::TimestampMicros => DataType::Timestamp(TimeUnit::Microsecond, None),
        // Future-proof: treat unknown variants as Utf8.
        _ => DataType::Utf8,
    }
}

/// Reverse mapping; `None` for Arrow types outside the portable subset.
pub fn protocol_data_type(data_type: &DataType) -> Option<ArrowDataType> {
    match data_type {
        DataType::Boolean => Some(ArrowDataType::Boolean),
        DataType::Int32 => Some(ArrowDataType::Int32),
        DataType::Int64 => Some(ArrowDataType::Int64),
        DataType::Float32 => Some(ArrowDataType::Float32),
        DataType::Float64 => Some(ArrowDataType::Float64),
        DataType::Utf8 => Some(ArrowDataType::Utf8),
        DataType::LargeUtf8 => Some(ArrowDataType::LargeUtf8),
        DataType::Binary => Some(ArrowDataType::Binary),
        DataType::Date32 => Some(ArrowDataType::Date32),
        DataType::Timestamp(TimeUnit::Microsecond, None) => Some(ArrowDataType::TimestampMicros),
        _ => None,
    }
}
