//! Shared schema, record, and error model types.
//!
//! This crate has no Arrow dependency so it stays usable from both the
//! transform and any host that moves rows as JSON.

pub mod arrow;
pub mod error;
pub mod metric;
pub mod record;
pub mod schema;
