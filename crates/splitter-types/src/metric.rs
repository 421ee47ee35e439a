//! Execution summaries.

use serde::{Deserialize, Serialize};

/// Summary returned after a transform run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformSummary {
    /// Records received from upstream.
    pub records_in: u64,
    /// Records emitted downstream.
    pub records_out: u64,
    /// Input records that produced no output.
    pub records_dropped: u64,
    /// Batches processed, when the host delivers batches.
    pub batches_processed: u64,
}

impl TransformSummary {
    /// Fold another summary into this one.
    pub fn merge(&mut self, other: &Self) {
        self.records_in += other.records_in;
        self.records_out += other.records_out;
        self.records_dropped += other.records_dropped;
        self.batches_processed += other.batches_processed;
    }
}
