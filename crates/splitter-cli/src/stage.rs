//! Stage YAML parsing and structural validation.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use splitter_types::schema::{RecordSchema, SchemaRef};

/// One transform stage: the declared input schema plus the transform config.
#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    pub stage: String,
    pub input_schema: RecordSchema,
    /// Transform options, handed to the transform as JSON.
    pub config: serde_json::Value,
}

impl StageConfig {
    /// Input schema re-checked for empty and duplicate field lists.
    pub fn input_schema(&self) -> Result<SchemaRef> {
        let schema = RecordSchema::new(
            self.input_schema.name.clone(),
            self.input_schema.fields.clone(),
        )
        .with_context(|| format!("Invalid input_schema for stage '{}'", self.stage))?;
        Ok(SchemaRef::new(schema))
    }

    /// Transform config in the JSON form the transform parses.
    pub fn config_json(&self) -> String {
        self.config.to_string()
    }
}

/// Parse a stage YAML string.
///
/// # Errors
///
/// Returns an error if the YAML is invalid or misses required keys.
pub fn parse_stage_str(yaml_str: &str) -> Result<StageConfig> {
    let stage: StageConfig = serde_yaml::from_str(yaml_str).context("Failed to parse stage YAML")?;
    Ok(stage)
}

/// Parse a stage YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the YAML is invalid.
pub fn parse_stage(path: &Path) -> Result<StageConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read stage file: {}", path.display()))?;
    parse_stage_str(&content)
}

/// Validate stage structure. Transform-specific checks are left to the
/// transform's own `validate`.
pub fn validate_stage(stage: &StageConfig) -> Result<()> {
    let mut errors = Vec::new();

    if stage.stage.trim().is_empty() {
        errors.push("stage name must not be empty".to_string());
    }
    if !stage.config.is_object() {
        errors.push("config must be a mapping of transform options".to_string());
    }
    if let Err(e) = stage.input_schema() {
        errors.push(format!("{e:#}"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        bail!("Stage validation failed:\n  - {}", errors.join("\n  - "))
    }
}
