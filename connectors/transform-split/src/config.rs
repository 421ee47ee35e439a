use serde::Deserialize;
use splitter_sdk::prelude::*;

use crate::split::Delimiter;

/// How the `delimiter` option is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelimiterMode {
    /// The delimiter is a regular expression (`"."` matches any character).
    #[default]
    Regex,
    /// The delimiter is matched verbatim.
    Literal,
}

/// Record splitter configuration, as resolved by the host.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Input string field whose value is split.
    pub field_to_split: String,
    pub delimiter: String,
    /// Output field receiving each fragment.
    pub output_field: String,
    /// Serialized output schema.
    pub schema: String,
    #[serde(default)]
    pub delimiter_mode: DelimiterMode,
}

#[derive(Debug, Clone)]
pub struct CompiledConfig {
    pub field_to_split: String,
    pub output_field: String,
    pub delimiter: Delimiter,
    pub output_schema: SchemaRef,
}

fn ensure_non_empty_field(option: &str, field: &str) -> Result<(), ConnectorError> {
    if field.trim().is_empty() {
        Err(ConnectorError::config(
            "SPLIT_CONFIG",
            format!("{option} must name a field"),
        ))
    } else {
        Ok(())
    }
}

impl Config {
    /// Check everything that does not depend on the input schema, and parse
    /// the output schema.
    pub fn compile(&self) -> Result<CompiledConfig, ConnectorError> {
        ensure_non_empty_field("fieldToSplit", &self.field_to_split)?;
        ensure_non_empty_field("outputField", &self.output_field)?;
        if self.delimiter.is_empty() {
            return Err(ConnectorError::config(
                "SPLIT_CONFIG",
                "delimiter must not be empty",
            ));
        }

        let delimiter = Delimiter::new(&self.delimiter, self.delimiter_mode).map_err(|e| {
            ConnectorError::config(
                "SPLIT_DELIMITER_INVALID",
                format!("invalid delimiter pattern '{}': {e}", self.delimiter),
            )
        })?;

        let output_schema = RecordSchema::parse_json(&self.schema).map_err(|e| {
            ConnectorError::config(
                "SPLIT_SCHEMA_INVALID",
                format!("Unable to parse output schema: {e}"),
            )
        })?;

        let output_column = output_schema.field(&self.output_field).ok_or_else(|| {
            ConnectorError::config(
                "SPLIT_OUTPUT_FIELD_MISSING",
                format!(
                    "Output schema must contain the specified outputField '{}'",
                    self.output_field
                ),
            )
        })?;
        if !output_column.data_type.is_string() {
            return Err(ConnectorError::config(
                "SPLIT_OUTPUT_FIELD_NOT_STRING",
                format!(
                    "Output field: {} must be of type string. It is type: {}",
                    self.output_field, output_column.data_type
                ),
            ));
        }

        Ok(CompiledConfig {
            field_to_split: self.field_to_split.clone(),
            output_field: self.output_field.clone(),
            delimiter,
            output_schema: SchemaRef::new(output_schema),
        })
    }

    /// Validate against the declared input schema before any record flows.
    pub fn validate(&self, input_schema: &RecordSchema) -> Result<CompiledConfig, ConnectorError> {
        let compiled = self.compile()?;
        compiled.check_input(input_schema)?;
        Ok(compiled)
    }
}

impl CompiledConfig {
    /// Locate `fieldToSplit` in the input schema and require a string type.
    ///
    /// Nullability is a column flag, so a nullable string column passes.
    pub fn check_input(&self, input_schema: &RecordSchema) -> Result<usize, ConnectorError> {
        let index = input_schema.index_of(&self.field_to_split).ok_or_else(|| {
            ConnectorError::config(
                "SPLIT_FIELD_MISSING",
                format!(
                    "Source field: {} not found in input schema '{}'",
                    self.field_to_split, input_schema.name
                ),
            )
        })?;
        let data_type = input_schema.fields()[index].data_type;
        if !data_type.is_string() {
            return Err(ConnectorError::config(
                "SPLIT_FIELD_NOT_STRING",
                format!(
                    "Source field: {} must be of type string. It is type: {}",
                    self.field_to_split, data_type
                ),
            ));
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = r#"{"name":"output","fields":[
        {"name":"id","data_type":"Int64","nullable":false},
        {"name":"tag","data_type":"Utf8","nullable":true}
    ]}"#;

    fn config(field: &str, output_field: &str, schema: &str) -> Config {
        Config {
            field_to_split: field.to_string(),
            delimiter: ",".to_string(),
            output_field: output_field.to_string(),
            schema: schema.to_string(),
            delimiter_mode: DelimiterMode::Regex,
        }
    }

    fn input(tags_type: ArrowDataType, nullable: bool) -> RecordSchema {
        RecordSchema::new(
            "input",
            vec![
                ColumnSchema::new("id", ArrowDataType::Int64, false),
                ColumnSchema::new("tags", tags_type, nullable),
            ],
        )
        .expect("schema should build")
    }

    #[test]
    fn deserializes_camel_case_options_with_regex_default() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "fieldToSplit": "tags",
            "delimiter": ",",
            "outputField": "tag",
            "schema": OUTPUT,
        }))
        .expect("config should deserialize");
        assert_eq!(config.field_to_split, "tags");
        assert_eq!(config.output_field, "tag");
        assert_eq!(config.delimiter_mode, DelimiterMode::Regex);

        let literal: Config = serde_json::from_value(serde_json::json!({
            "fieldToSplit": "tags",
            "delimiter": ".",
            "outputField": "tag",
            "schema": OUTPUT,
            "delimiterMode": "literal",
        }))
        .expect("config should deserialize");
        assert_eq!(literal.delimiter_mode, DelimiterMode::Literal);
    }

    #[test]
    fn compile_parses_output_schema() {
        let compiled = config("tags", "tag", OUTPUT).compile().expect("config should compile");
        assert_eq!(compiled.output_schema.len(), 2);
        assert_eq!(compiled.output_schema.name, "output");
    }

    #[test]
    fn malformed_output_schema_is_rejected() {
        let err = config("tags", "tag", "{\"fields\": [").compile().unwrap_err();
        assert_eq!(err.category, ErrorCategory::Config);
        assert_eq!(err.code, "SPLIT_SCHEMA_INVALID");
        assert!(err.message.starts_with("Unable to parse output schema"));
    }

    #[test]
    fn output_schema_must_declare_output_field() {
        let err = config("tags", "label", OUTPUT).compile().unwrap_err();
        assert_eq!(err.code, "SPLIT_OUTPUT_FIELD_MISSING");
        assert!(err.message.contains("'label'"));
    }

    #[test]
    fn output_field_must_be_a_string_column() {
        let err = config("tags", "id", OUTPUT).compile().unwrap_err();
        assert_eq!(err.code, "SPLIT_OUTPUT_FIELD_NOT_STRING");
        assert!(err.message.contains("Int64"));
    }

    #[test]
    fn blank_names_and_empty_delimiter_are_rejected() {
        assert_eq!(config("  ", "tag", OUTPUT).compile().unwrap_err().code, "SPLIT_CONFIG");
        assert_eq!(config("tags", "", OUTPUT).compile().unwrap_err().code, "SPLIT_CONFIG");

        let mut no_delimiter = config("tags", "tag", OUTPUT);
        no_delimiter.delimiter = String::new();
        assert_eq!(no_delimiter.compile().unwrap_err().code, "SPLIT_CONFIG");
    }

    #[test]
    fn whitespace_delimiter_is_allowed() {
        let mut spaced = config("tags", "tag", OUTPUT);
        spaced.delimiter = " ".to_string();
        assert!(spaced.compile().is_ok());
    }

    #[test]
    fn invalid_regex_delimiter_is_rejected_but_valid_as_literal() {
        let mut bad = config("tags", "tag", OUTPUT);
        bad.delimiter = "(".to_string();
        assert_eq!(bad.compile().unwrap_err().code, "SPLIT_DELIMITER_INVALID");

        bad.delimiter_mode = DelimiterMode::Literal;
        assert!(bad.compile().is_ok());
    }

    #[test]
    fn validate_accepts_string_and_nullable_string_fields() {
        let config = config("tags", "tag", OUTPUT);
        assert!(config.validate(&input(ArrowDataType::Utf8, false)).is_ok());
        assert!(config.validate(&input(ArrowDataType::Utf8, true)).is_ok());
        assert!(config.validate(&input(ArrowDataType::LargeUtf8, true)).is_ok());
    }

    #[test]
    fn validate_rejects_non_string_field_with_name_and_type() {
        let config = config("tags", "tag", OUTPUT);
        for nullable in [false, true] {
            let err = config
                .validate(&input(ArrowDataType::Int64, nullable))
                .unwrap_err();
            assert_eq!(err.code, "SPLIT_FIELD_NOT_STRING");
            assert_eq!(
                err.message,
                "Source field: tags must be of type string. It is type: Int64"
            );
        }
    }

    #[test]
    fn validate_rejects_missing_source_field() {
        let err = config("labels", "tag", OUTPUT)
            .validate(&input(ArrowDataType::Utf8, true))
            .unwrap_err();
        assert_eq!(err.code, "SPLIT_FIELD_MISSING");
    }

    #[test]
    fn validate_reports_output_schema_errors_before_input_errors() {
        let err = config("labels", "label", OUTPUT)
            .validate(&input(ArrowDataType::Utf8, true))
            .unwrap_err();
        assert_eq!(err.code, "SPLIT_OUTPUT_FIELD_MISSING");
    }
}
