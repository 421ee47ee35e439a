pub mod check;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use splitter_sdk::connector::parse_config;
use splitter_types::schema::SchemaRef;
use transform_split::Config;

use crate::stage::{self, StageConfig};

/// A parsed, structurally valid stage with its transform config decoded.
pub(crate) struct LoadedStage {
    pub stage: StageConfig,
    pub input_schema: SchemaRef,
    pub config: Config,
}

pub(crate) fn load_stage(stage_path: &Path) -> Result<LoadedStage> {
    let stage = stage::parse_stage(stage_path)
        .with_context(|| format!("Failed to parse stage: {}", stage_path.display()))?;
    stage::validate_stage(&stage)?;

    let input_schema = stage.input_schema()?;
    let config: Config = parse_config(&stage.config_json())
        .with_context(|| format!("Invalid transform config in stage '{}'", stage.stage))?;

    Ok(LoadedStage {
        stage,
        input_schema,
        config,
    })
}
