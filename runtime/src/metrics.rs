//! Prometheus metrics for the processing pipeline.
//!
//! The pipeline always records through the [`metrics`] facade. Nothing is
//! collected until a recorder is installed, which is what
//! [`MetricsRecorder::install`] does.
//!
//! # Example
//!
//! ```rust,no_run
//! use recipe_stats_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let recorder = MetricsRecorder::install()?;
//!
//! // ... run the processor ...
//!
//! if let Some(text) = recorder.render() {
//!     eprintln!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors from metrics setup.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// A process-wide Prometheus recorder.
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl fmt::Debug for MetricsRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsRecorder")
            .field("installed", &self.handle.is_some())
            .finish()
    }
}

impl MetricsRecorder {
    /// Describe the pipeline metrics and install a Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// Only one recorder can be installed per process. If one already is, this
    /// succeeds without a handle and [`render`](Self::render) returns `None`.
    pub fn install() -> Result<Self, MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => Ok(Self {
                handle: Some(handle),
            }),
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!(
                        "Metrics recorder already initialized, skipping re-initialization"
                    );
                    Ok(Self { handle: None })
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Current metrics in the Prometheus text format.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

fn register_metrics() {
    describe_counter!(
        "pipeline_records_received_total",
        "Total number of records decoded from input"
    );
    describe_counter!(
        "pipeline_records_accepted_total",
        "Total number of records forwarded to aggregation"
    );
    describe_counter!(
        "pipeline_records_rejected_total",
        "Total number of records dropped by validation or delivery parsing"
    );
    describe_counter!(
        "pipeline_chunks_total",
        "Total number of chunks handed to workers"
    );
    describe_histogram!(
        "pipeline_process_duration_seconds",
        "Time taken to process one input document"
    );

    describe_counter!(
        "dlq_pushed_total",
        "Total number of records added to the dead letter queue"
    );
    describe_counter!(
        "dlq_dropped_total",
        "Total number of dead letters discarded because the queue was full"
    );
    describe_gauge!("dlq_size", "Current number of entries in the dead letter queue");
}

/// Pipeline metrics recorder.
pub struct PipelineMetrics;

impl PipelineMetrics {
    /// Record a decoded document and the chunks it was split into.
    pub fn record_received(records: usize, chunks: usize) {
        counter!("pipeline_records_received_total").increment(records as u64);
        counter!("pipeline_chunks_total").increment(chunks as u64);
    }

    /// Record records forwarded to aggregation.
    pub fn record_accepted(count: usize) {
        counter!("pipeline_records_accepted_total").increment(count as u64);
    }

    /// Record one dropped record.
    pub fn record_rejected(reason: &'static str) {
        counter!("pipeline_records_rejected_total", "reason" => reason).increment(1);
    }

    /// Record the time taken by one run.
    pub fn record_duration(duration: Duration) {
        histogram!("pipeline_process_duration_seconds").record(duration.as_secs_f64());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn test_install_and_render() {
        let recorder = MetricsRecorder::install().unwrap();

        PipelineMetrics::record_received(6, 1);
        PipelineMetrics::record_accepted(5);
        PipelineMetrics::record_rejected("missing_fields");
        PipelineMetrics::record_duration(Duration::from_millis(3));

        // Another test may have installed the recorder first
        if let Some(text) = recorder.render() {
            assert!(text.contains("pipeline_records_received"));
            assert!(text.contains("reason=\"missing_fields\""));
            assert!(text.contains("pipeline_process_duration_seconds"));
        }
    }

    #[test]
    fn test_second_install_is_tolerated() {
        let _first = MetricsRecorder::install().unwrap();
        let second = MetricsRecorder::install().unwrap();
        assert!(second.render().is_none());
    }

    #[test]
    fn test_debug_reports_whether_installed() {
        let recorder = MetricsRecorder { handle: None };
        assert_eq!(format!("{recorder:?}"), "MetricsRecorder { installed: false }");
    }

    #[test]
    fn test_recording_without_recorder_is_a_noop() {
        PipelineMetrics::record_received(1, 1);
        PipelineMetrics::record_rejected("delivery_window");
    }
}
