//! Output capability handed to [`crate::connector::Transform::process`].

use splitter_types::error::ConnectorError;
use splitter_types::record::Record;

/// Sink for records produced by a transform.
///
/// The host owns batching and delivery; a transform only hands records over
/// in the order it produces them.
pub trait Emitter {
    fn emit(&mut self, record: Record) -> Result<(), ConnectorError>;
}

impl Emitter for Vec<Record> {
    fn emit(&mut self, record: Record) -> Result<(), ConnectorError> {
        self.push(record);
        Ok(())
    }
}

/// Forwards to an inner emitter while counting records.
pub(crate) struct CountingEmitter<'a> {
    inner: &'a mut dyn Emitter,
    pub(crate) count: u64,
}

impl<'a> CountingEmitter<'a> {
    pub(crate) fn new(inner: &'a mut dyn Emitter) -> Self {
        Self { inner, count: 0 }
    }
}

impl Emitter for CountingEmitter<'_> {
    fn emit(&mut self, record: Record) -> Result<(), ConnectorError> {
        self.inner.emit(record)?;
        self.count += 1;
        Ok(())
    }
}
