//! Error types for the processing pipeline.

use thiserror::Error;

/// Failures that abort [`Processor::process`](crate::Processor::process).
///
/// Per-record problems never show up here. They are logged, counted, and
/// handed to the dead-letter sink instead.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The input is not a JSON array of record objects
    #[error("failed parsing JSON input: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// A worker or the consumer task panicked or was cancelled
    #[error("pipeline task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_error_display() {
        let err: ProcessError = serde_json::from_str::<Vec<u8>>("fff").unwrap_err().into();
        assert!(err.to_string().starts_with("failed parsing JSON input:"));
    }
}
