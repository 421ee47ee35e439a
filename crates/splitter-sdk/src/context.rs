//! Transform execution context.
//!
//! `Context` carries the identity of the running stage so log lines can be
//! attributed without every call site passing it along.

use tracing::{debug, error, info, warn};

/// Log severity levels used by [`Context::log`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

/// Execution context carrying stage metadata.
///
/// ```ignore
/// ctx.log(LogLevel::Info, "split transform opened");
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    connector_id: String,
    stream_name: String,
}

impl Context {
    pub fn new(connector_id: impl Into<String>, stream_name: impl Into<String>) -> Self {
        Self {
            connector_id: connector_id.into(),
            stream_name: stream_name.into(),
        }
    }

    pub fn connector_id(&self) -> &str {
        &self.connector_id
    }

    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    /// Write a log message tagged with the connector and stream.
    pub fn log(&self, level: LogLevel, message: &str) {
        let connector = self.connector_id.as_str();
        let stream = self.stream_name.as_str();
        match level {
            LogLevel::Error => error!(connector, stream, "{message}"),
            LogLevel::Warn => warn!(connector, stream, "{message}"),
            LogLevel::Info => info!(connector, stream, "{message}"),
            LogLevel::Debug => debug!(connector, stream, "{message}"),
        }
    }
}
