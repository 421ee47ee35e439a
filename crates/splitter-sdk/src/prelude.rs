//! Convenience re-exports for transform authors.
//!
//! ```ignore
//! use splitter_sdk::prelude::*;
//! ```

// Transform lifecycle
pub use crate::connector::{parse_config, Transform};
pub use crate::emitter::Emitter;
pub use crate::runner::run_records;

// Context and logging
pub use crate::context::{Context, LogLevel};

// Errors
pub use splitter_types::error::{
    ConnectorError, ErrorCategory, ErrorScope, ValidationResult, ValidationStatus,
};

// Data model
pub use splitter_types::arrow::ArrowDataType;
pub use splitter_types::metric::TransformSummary;
pub use splitter_types::record::{Record, RecordBuilder, Value};
pub use splitter_types::schema::{ColumnSchema, RecordSchema, SchemaRef};
