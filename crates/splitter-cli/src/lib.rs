//! Local runner for a single record splitter stage.

pub mod commands;
pub mod logging;
pub mod ndjson;
pub mod stage;
