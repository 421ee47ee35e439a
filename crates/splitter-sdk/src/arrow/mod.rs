//! Arrow interop for hosts that move records as `RecordBatch`es.

pub mod batch;
pub mod schema;
pub mod types;

pub use batch::{records_from_batch, records_to_batch, BatchTransformer};
pub use schema::{build_arrow_schema, record_schema_from_arrow};
pub use types::{arrow_data_type, protocol_data_type};
