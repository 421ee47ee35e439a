use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use splitter_sdk::connector::Transform;
use splitter_sdk::context::Context as StageContext;
use splitter_sdk::runner::run_records;
use splitter_types::error::ValidationStatus;
use splitter_types::metric::TransformSummary;
use transform_split::{TransformSplit, CONNECTOR_ID};

use crate::ndjson::{read_records, NdjsonEmitter};

/// Execute the `run` command: validate the stage, then split every NDJSON row
/// of `input` into `output` (stdout when absent).
pub fn execute(stage_path: &Path, input: &Path, output: Option<&Path>) -> Result<()> {
    let loaded = super::load_stage(stage_path)?;
    let stage_name = loaded.stage.stage.clone();

    let validation = TransformSplit::validate(&loaded.config, &loaded.input_schema)?;
    match validation.status {
        ValidationStatus::Failed => {
            anyhow::bail!("Stage '{stage_name}' failed validation: {}", validation.message)
        }
        ValidationStatus::Warning => {
            tracing::warn!(stage = %stage_name, "{}", validation.message);
        }
        ValidationStatus::Success => {}
    }

    let reader = BufReader::new(
        File::open(input)
            .with_context(|| format!("Failed to open input file: {}", input.display()))?,
    );
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    tracing::info!(
        stage = %stage_name,
        input = %input.display(),
        fields = loaded.input_schema.len(),
        "Stage validated"
    );

    let start = Instant::now();
    let mut transform = TransformSplit::init(loaded.config)?;
    let ctx = StageContext::new(CONNECTOR_ID, stage_name.as_str());
    let mut emitter = NdjsonEmitter::new(BufWriter::new(writer));
    let summary = run_records(
        &transform,
        &ctx,
        &loaded.input_schema,
        read_records(loaded.input_schema.clone(), reader),
        &mut emitter,
    )
    .with_context(|| format!("Stage '{stage_name}' failed"))?;
    transform.close()?;
    emitter
        .into_inner()
        .flush()
        .context("Failed to flush output")?;

    print_summary(&stage_name, &summary, start.elapsed().as_secs_f64());
    Ok(())
}

/// Summary goes to stderr so stdout stays pure NDJSON.
fn print_summary(stage: &str, summary: &TransformSummary, duration_secs: f64) {
    eprintln!("Stage '{stage}' completed successfully.");
    eprintln!("  Records in:      {}", summary.records_in);
    eprintln!("  Records out:     {}", summary.records_out);
    eprintln!("  Records dropped: {}", summary.records_dropped);
    eprintln!("  Duration:        {duration_secs:.2}s");
}
