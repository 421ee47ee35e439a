//! Newline-delimited JSON record input and output.

use std::io::{BufRead, Write};

use splitter_sdk::emitter::Emitter;
use splitter_types::error::ConnectorError;
use splitter_types::record::Record;
use splitter_types::schema::SchemaRef;

/// Read one record per non-blank line of `reader`.
///
/// Errors carry the 1-based line number.
pub fn read_records<R: BufRead>(
    schema: SchemaRef,
    reader: R,
) -> impl Iterator<Item = Result<Record, ConnectorError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(move |(idx, line)| {
            let line_no = idx + 1;
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(ConnectorError::internal(
                        "NDJSON_READ",
                        format!("line {line_no}: {e}"),
                    )))
                }
            };
            if line.trim().is_empty() {
                return None;
            }
            Some(parse_line(&schema, &line).map_err(|e| ConnectorError {
                message: format!("line {line_no}: {}", e.message),
                ..e
            }))
        })
}

fn parse_line(schema: &SchemaRef, line: &str) -> Result<Record, ConnectorError> {
    let row: serde_json::Value = serde_json::from_str(line)
        .map_err(|e| ConnectorError::data("NDJSON_PARSE", format!("invalid JSON: {e}")))?;
    Record::from_json(SchemaRef::clone(schema), &row)
}

/// Emitter writing each record as one JSON line.
pub struct NdjsonEmitter<W: Write> {
    writer: W,
}

impl<W: Write> NdjsonEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Emitter for NdjsonEmitter<W> {
    fn emit(&mut self, record: Record) -> Result<(), ConnectorError> {
        serde_json::to_writer(&mut self.writer, &record.to_json())
            .map_err(|e| ConnectorError::internal("NDJSON_WRITE", e.to_string()))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| ConnectorError::internal("NDJSON_WRITE", e.to_string()))
    }
}
