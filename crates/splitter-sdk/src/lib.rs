pub mod arrow;
pub mod connector;
pub mod context;
pub mod emitter;
pub mod prelude;
pub mod runner;

pub use splitter_types::{error, metric, record, schema};
