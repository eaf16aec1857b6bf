//! Engine run metrics.
//!
//! One [`PassMetrics`] per applied pattern plus a total. Metrics are always
//! collected (they are cheap counters and timestamps) but have no effect on
//! segmentation; they exist for the CLI report and for profiling catalogs
//! against large outputs.

use std::time::Duration;

/// Timings and counts for a whole segmentation run.
#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time, pattern passes plus leftover wrapping.
    pub total: Duration,
    /// One entry per pattern, in application order.
    pub passes: Vec<PassMetrics>,
}

/// Timings and counts for a single pattern pass.
#[derive(Debug, Default, Clone)]
pub struct PassMetrics {
    /// Subtype of the pattern applied in this pass.
    pub subtype: String,
    /// Elapsed time for the pass.
    pub duration: Duration,
    /// Unclassified spans scanned.
    pub spans_scanned: usize,
    /// Matches accepted and turned into elements.
    pub matched: usize,
}
