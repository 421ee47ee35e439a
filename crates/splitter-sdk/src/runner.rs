//! Sequential record driver.
//!
//! Plays the host's role for a single stage: opens the transform once, feeds
//! records in order, and returns a [`TransformSummary`].

use splitter_types::error::ConnectorError;
use splitter_types::metric::TransformSummary;
use splitter_types::record::Record;
use splitter_types::schema::SchemaRef;

use crate::connector::Transform;
use crate::context::{Context, LogLevel};
use crate::emitter::{CountingEmitter, Emitter};

/// Run `transform` over `records`, forwarding output to `emitter`.
///
/// Stops at the first error, whether it comes from the input iterator, the
/// transform, or the emitter.
pub fn run_records<T, I>(
    transform: &T,
    ctx: &Context,
    input_schema: &SchemaRef,
    records: I,
    emitter: &mut dyn Emitter,
) -> Result<TransformSummary, ConnectorError>
where
    T: Transform,
    I: IntoIterator<Item = Result<Record, ConnectorError>>,
{
    let state = transform.open(input_schema)?;
    ctx.log(
        LogLevel::Debug,
        &format!("transform opened for {} input fields", input_schema.len()),
    );
    if let Some(output) = transform.output_schema() {
        ctx.log(
            LogLevel::Debug,
            &format!("emitting records of schema '{}'", output.name),
        );
    }

    let mut summary = TransformSummary::default();
    for record in records {
        process_counted(transform, &state, &record?, emitter, &mut summary)?;
    }

    ctx.log(
        LogLevel::Info,
        &format!(
            "Transform complete: {} records in, {} records out, {} dropped",
            summary.records_in, summary.records_out, summary.records_dropped
        ),
    );
    Ok(summary)
}

/// Process one record and fold its outcome into `summary`.
pub(crate) fn process_counted<T: Transform>(
    transform: &T,
    state: &T::State,
    record: &Record,
    emitter: &mut dyn Emitter,
    summary: &mut TransformSummary,
) -> Result<(), ConnectorError> {
    let mut counting = CountingEmitter::new(emitter);
    transform.process(state, record, &mut counting)?;

    summary.records_in += 1;
    summary.records_out += counting.count;
    if counting.count == 0 {
        summary.records_dropped += 1;
    }
    Ok(())
}
