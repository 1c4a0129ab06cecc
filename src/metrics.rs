//! Metrics for batch analysis.
//!
//! Recording goes through the `metrics` facade and is a no-op until the
//! embedding application installs a recorder.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

// === Metric Name Constants ===

/// Batch analysis latency metric name.
pub const METRIC_ANALYSIS_LATENCY: &str = "analysis_latency_ms";
/// Batches analyzed counter metric name.
pub const METRIC_BATCHES_ANALYZED: &str = "batches_analyzed_total";
/// Batches rejected by validation counter metric name.
pub const METRIC_BATCHES_REJECTED: &str = "batches_rejected_total";
/// Records scored counter metric name.
pub const METRIC_RECORDS_SCORED: &str = "records_scored_total";
/// Records skipped counter metric name.
pub const METRIC_RECORDS_SKIPPED: &str = "records_skipped_total";
/// Profitable opportunities counter metric name.
pub const METRIC_PROFITABLE_OPPORTUNITIES: &str = "profitable_opportunities_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_ANALYSIS_LATENCY,
        "Time to validate, score and rank one batch in milliseconds"
    );

    describe_counter!(METRIC_BATCHES_ANALYZED, "Total number of batches analyzed");
    describe_counter!(
        METRIC_BATCHES_REJECTED,
        "Total number of batches rejected by validation"
    );
    describe_counter!(METRIC_RECORDS_SCORED, "Total number of records scored");
    describe_counter!(
        METRIC_RECORDS_SKIPPED,
        "Total number of records skipped while scoring"
    );
    describe_counter!(
        METRIC_PROFITABLE_OPPORTUNITIES,
        "Total number of positive-EV opportunities found"
    );

    debug!("Metrics initialized");
}

/// Increment batches analyzed counter.
pub fn inc_batches_analyzed() {
    counter!(METRIC_BATCHES_ANALYZED).increment(1);
}

/// Increment batches rejected counter.
pub fn inc_batches_rejected() {
    counter!(METRIC_BATCHES_REJECTED).increment(1);
}

/// Add to the records scored counter.
pub fn add_records_scored(count: usize) {
    counter!(METRIC_RECORDS_SCORED).increment(count as u64);
}

/// Add to the records skipped counter.
pub fn add_records_skipped(count: usize) {
    counter!(METRIC_RECORDS_SKIPPED).increment(count as u64);
}

/// Add to the profitable opportunities counter.
pub fn add_profitable_opportunities(count: usize) {
    counter!(METRIC_PROFITABLE_OPPORTUNITIES).increment(count as u64);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for batch analysis.
pub fn timer_analysis() -> LatencyTimer {
    LatencyTimer::new(METRIC_ANALYSIS_LATENCY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn latency_timer_measures_time() {
        let timer = timer_analysis();
        sleep(Duration::from_millis(10));
        assert!(timer.elapsed_ms() >= 9.0);
    }

    #[test]
    fn counters_are_safe_without_recorder() {
        init_metrics();
        inc_batches_analyzed();
        add_records_scored(3);
    }
}
