//! Arrow data type identifiers for cross-boundary schema exchange.
//!
//! A portable subset of Apache Arrow logical types, used in
//! [`crate::schema::ColumnSchema`] so serialized schemas can be parsed
//! without depending on the Arrow crate itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Arrow-compatible logical data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ArrowDataType {
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Utf8,
    LargeUtf8,
    Binary,
    Date32,
    TimestampMicros,
}

impl ArrowDataType {
    /// Returns the canonical string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Utf8 => "Utf8",
            Self::LargeUtf8 => "LargeUtf8",
            Self::Binary => "Binary",
            Self::Date32 => "Date32",
            Self::TimestampMicros => "TimestampMicros",
        }
    }

    /// Whether values of this type are UTF-8 strings.
    #[must_use]
    pub fn is_string(self) -> bool {
        matches!(self, Self::Utf8 | Self::LargeUtf8)
    }
}

impl fmt::Display for ArrowDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
