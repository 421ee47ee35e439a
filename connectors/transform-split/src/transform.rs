//! Per-run state and the per-record split.

use std::sync::Arc;

use splitter_sdk::prelude::*;

use crate::config::CompiledConfig;
use crate::split::trim_fragment;

/// State resolved once per run from the input schema.
#[derive(Debug, Clone)]
pub struct SplitState {
    input_schema: SchemaRef,
    output_schema: SchemaRef,
    split_index: usize,
    output_index: usize,
    /// `(input index, output index)` pairs copied verbatim into every output.
    copy_plan: Vec<(usize, usize)>,
}

impl SplitState {
    pub fn input_schema(&self) -> &SchemaRef {
        &self.input_schema
    }

    pub fn output_schema(&self) -> &SchemaRef {
        &self.output_schema
    }

    pub fn copy_plan(&self) -> &[(usize, usize)] {
        &self.copy_plan
    }
}

/// Input fields carried into the output: present in both schemas, excluding
/// the split field and the output field.
pub fn plan_copies(
    config: &CompiledConfig,
    input_schema: &RecordSchema,
) -> Vec<(usize, usize)> {
    input_schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, col)| col.name != config.field_to_split && col.name != config.output_field)
        .filter_map(|(from, col)| {
            config
                .output_schema
                .index_of(&col.name)
                .map(|to| (from, to))
        })
        .collect()
}

/// Copied columns whose input and output types differ. Values still flow,
/// but a record whose value does not fit the output column fails.
pub fn copy_type_warnings(config: &CompiledConfig, input_schema: &RecordSchema) -> Vec<String> {
    plan_copies(config, input_schema)
        .into_iter()
        .filter_map(|(from, to)| {
            let input = &input_schema.fields()[from];
            let output = &config.output_schema.fields()[to];
            (input.data_type != output.data_type).then(|| {
                format!(
                    "field '{}' is {} in the input but {} in the output schema",
                    input.name, input.data_type, output.data_type
                )
            })
        })
        .collect()
}

pub fn open(config: &CompiledConfig, input_schema: &SchemaRef) -> Result<SplitState, ConnectorError> {
    let split_index = config.check_input(input_schema)?;
    let output_index = config
        .output_schema
        .index_of(&config.output_field)
        .ok_or_else(|| {
            ConnectorError::internal(
                "SPLIT_OUTPUT_FIELD_MISSING",
                format!("output field '{}' vanished from the output schema", config.output_field),
            )
        })?;
    let copy_plan = plan_copies(config, input_schema);

    tracing::debug!(
        input = %input_schema.name,
        output = %config.output_schema.name,
        copied = copy_plan.len(),
        "split state opened"
    );

    Ok(SplitState {
        input_schema: Arc::clone(input_schema),
        output_schema: Arc::clone(&config.output_schema),
        split_index,
        output_index,
        copy_plan,
    })
}

/// Emit one output record per fragment of the split field.
///
/// A null value emits nothing. Any other non-string value is a data error.
pub fn process(
    config: &CompiledConfig,
    state: &SplitState,
    record: &Record,
    emitter: &mut dyn Emitter,
) -> Result<(), ConnectorError> {
    if record.schema() != &state.input_schema {
        return Err(ConnectorError::schema(
            "SPLIT_INPUT_SCHEMA_CHANGED",
            format!(
                "record schema '{}' does not match the schema '{}' this run was opened with",
                record.schema().name,
                state.input_schema.name
            ),
        )
        .with_details(serde_json::json!({
            "expected_schema": state.input_schema.name,
            "actual_schema": record.schema().name,
        })));
    }

    let text = match record.value(state.split_index) {
        Value::Null => return Ok(()),
        Value::String(s) => s.as_str(),
        other => {
            return Err(ConnectorError::data(
                "SPLIT_VALUE_NOT_STRING",
                format!(
                    "field '{}' holds a {} value; only strings can be split",
                    config.field_to_split,
                    other.kind()
                ),
            )
            .with_scope(ErrorScope::Record)
            .with_details(serde_json::json!({
                "field": config.field_to_split,
                "kind": other.kind(),
            })))
        }
    };

    for fragment in config.delimiter.split(text) {
        let mut builder = RecordBuilder::new(Arc::clone(&state.output_schema));
        for &(from, to) in &state.copy_plan {
            builder.set_at(to, record.value(from).clone())?;
        }
        builder.set_at(state.output_index, trim_fragment(fragment))?;
        emitter.emit(builder.build()?)?;
    }
    Ok(())
}
