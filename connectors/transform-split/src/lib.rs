//! Record splitter: one output record per fragment of a delimited string
//! field.

pub mod config;
pub mod split;
pub mod transform;

use std::sync::Arc;

use splitter_sdk::prelude::*;

pub use config::{CompiledConfig, Config, DelimiterMode};
pub use transform::SplitState;

pub const CONNECTOR_ID: &str = "transform-split";

pub struct TransformSplit {
    config: CompiledConfig,
}

impl Transform for TransformSplit {
    type Config = Config;
    type State = SplitState;

    fn init(config: Self::Config) -> Result<Self, ConnectorError> {
        let compiled = config.compile()?;
        tracing::debug!(
            field = %compiled.field_to_split,
            output = %compiled.output_field,
            delimiter = compiled.delimiter.as_str(),
            mode = ?compiled.delimiter.mode(),
            "split transform initialized"
        );
        Ok(Self { config: compiled })
    }

    fn validate(
        config: &Self::Config,
        input_schema: &RecordSchema,
    ) -> Result<ValidationResult, ConnectorError> {
        let compiled = match config.validate(input_schema) {
            Ok(compiled) => compiled,
            Err(e) if e.category == ErrorCategory::Config => {
                return Ok(ValidationResult::failed(e.message));
            }
            Err(e) => return Err(e),
        };

        let warnings = transform::copy_type_warnings(&compiled, input_schema);
        if warnings.is_empty() {
            Ok(ValidationResult::success("Split transform config is valid"))
        } else {
            Ok(ValidationResult {
                status: ValidationStatus::Warning,
                message: warnings.join("; "),
            })
        }
    }

    fn output_schema(&self) -> Option<SchemaRef> {
        Some(Arc::clone(&self.config.output_schema))
    }

    fn open(&self, input_schema: &SchemaRef) -> Result<Self::State, ConnectorError> {
        transform::open(&self.config, input_schema)
    }

    fn process(
        &self,
        state: &Self::State,
        record: &Record,
        emitter: &mut dyn Emitter,
    ) -> Result<(), ConnectorError> {
        transform::process(&self.config, state, record, emitter)
    }
}
