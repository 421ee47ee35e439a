//! Transform lifecycle trait.
//!
//! The host drives a transform through two phases. At pipeline-build time it
//! calls [`Transform::validate`] against the declared input schema. At run
//! time it calls [`Transform::init`], then [`Transform::open`] exactly once,
//! then [`Transform::process`] for every record in order.

use serde::de::DeserializeOwned;

use splitter_types::error::{ConnectorError, ValidationResult};
use splitter_types::record::Record;
use splitter_types::schema::{RecordSchema, SchemaRef};

use crate::emitter::Emitter;

/// Default validation response for transforms that do not implement validation.
pub fn default_validation<C>(_config: &C) -> Result<ValidationResult, ConnectorError> {
    Ok(ValidationResult::success("Validation not implemented"))
}

/// Parse a transform config from its JSON form.
pub fn parse_config<T: DeserializeOwned>(config_json: &str) -> Result<T, ConnectorError> {
    serde_json::from_str(config_json).map_err(|e| {
        ConnectorError::config("INVALID_CONFIG", format!("Config parse error: {e}"))
    })
}

/// Record transform lifecycle.
pub trait Transform: Sized {
    type Config: DeserializeOwned;

    /// Per-run state computed by [`Transform::open`] and read-only afterwards.
    type State;

    fn init(config: Self::Config) -> Result<Self, ConnectorError>;

    /// Check the configuration against the declared input schema.
    ///
    /// Must not depend on any record; failures block pipeline startup.
    fn validate(
        config: &Self::Config,
        input_schema: &RecordSchema,
    ) -> Result<ValidationResult, ConnectorError> {
        let _ = input_schema;
        default_validation(config)
    }

    /// Schema of every record this transform emits, when it is fixed by the
    /// configuration. Available right after `init`, before any record flows.
    fn output_schema(&self) -> Option<SchemaRef> {
        None
    }

    /// Prepare the run state for records of `input_schema`.
    fn open(&self, input_schema: &SchemaRef) -> Result<Self::State, ConnectorError>;

    /// Transform one record, emitting zero or more records.
    fn process(
        &self,
        state: &Self::State,
        record: &Record,
        emitter: &mut dyn Emitter,
    ) -> Result<(), ConnectorError>;

    fn close(&mut self) -> Result<(), ConnectorError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use splitter_types::error::ValidationStatus;

    #[derive(Debug, Deserialize)]
    struct TestConfig {
        field: String,
    }

    struct Passthrough;

    impl Transform for Passthrough {
        type Config = TestConfig;
        type State = ();

        fn init(_config: Self::Config) -> Result<Self, ConnectorError> {
            Ok(Self)
        }

        fn open(&self, _input_schema: &SchemaRef) -> Result<(), ConnectorError> {
            Ok(())
        }

        fn process(
            &self,
            _state: &(),
            record: &Record,
            emitter: &mut dyn Emitter,
        ) -> Result<(), ConnectorError> {
            emitter.emit(record.clone())
        }
    }

    #[test]
    fn parse_config_reads_json() {
        let config: TestConfig = parse_config(r#"{"field":"tags"}"#).unwrap();
        assert_eq!(config.field, "tags");
    }

    #[test]
    fn parse_config_failure_is_config_error() {
        let err = parse_config::<TestConfig>(r#"{"other":1}"#).unwrap_err();
        assert_eq!(err.code, "INVALID_CONFIG");
        assert!(err.message.starts_with("Config parse error"));
    }

    #[test]
    fn default_validate_succeeds() {
        let config = TestConfig {
            field: "x".to_string(),
        };
        let schema = RecordSchema {
            name: "in".to_string(),
            fields: vec![],
        };
        let result = Passthrough::validate(&config, &schema).unwrap();
        assert_eq!(result.status, ValidationStatus::Success);
    }

    #[test]
    fn output_schema_is_unknown_by_default() {
        let transform = Passthrough::init(TestConfig {
            field: "x".to_string(),
        })
        .unwrap();
        assert!(transform.output_schema().is_none());
    }
}
