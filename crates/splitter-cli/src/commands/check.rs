use std::path::Path;

use anyhow::Result;
use splitter_sdk::connector::Transform;
use splitter_types::error::{ValidationResult, ValidationStatus};
use transform_split::TransformSplit;

/// Execute the `check` command: validate the stage file and the transform
/// config against the declared input schema.
pub fn execute(stage_path: &Path) -> Result<()> {
    let loaded = super::load_stage(stage_path)?;
    println!("Stage structure:   OK");

    let result = TransformSplit::validate(&loaded.config, &loaded.input_schema)?;
    print_validation("Transform", &result);

    if result.status == ValidationStatus::Failed {
        anyhow::bail!("Stage '{}' failed validation", loaded.stage.stage)
    }

    let transform = TransformSplit::init(loaded.config)?;
    if let Some(output) = transform.output_schema() {
        println!(
            "{:18} {} ({} fields)",
            "Output schema:",
            output.name,
            output.len()
        );
    }
    println!("\nAll checks passed.");
    Ok(())
}

fn print_validation(label: &str, result: &ValidationResult) {
    let status = match result.status {
        ValidationStatus::Success => "OK",
        ValidationStatus::Failed => "FAILED",
        ValidationStatus::Warning => "WARNING",
    };
    println!("{:18} {}", format!("{label}:"), status);
    if !result.message.is_empty() {
        println!("  {}", result.message);
    }
}
