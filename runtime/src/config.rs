//! Tuning knobs for [`Processor`](crate::Processor).

use crate::chunk::ChunkSize;

/// Configuration for a [`Processor`](crate::Processor).
///
/// # Example
///
/// ```
/// use recipe_stats_runtime::{ChunkSize, ProcessorConfig};
///
/// let config = ProcessorConfig::default()
///     .with_chunk_size(ChunkSize::new(500))
///     .with_channel_capacity(64);
///
/// assert_eq!(config.chunk_size.get(), 500);
/// assert_eq!(config.channel_capacity_for(10_000), 64);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Records per worker
    pub chunk_size: ChunkSize,
    /// Capacity of the channel between workers and the aggregator.
    /// `None` sizes it to the number of input records.
    pub channel_capacity: Option<usize>,
}

impl ProcessorConfig {
    /// Create a configuration with explicit values.
    #[must_use]
    pub const fn new(chunk_size: ChunkSize, channel_capacity: Option<usize>) -> Self {
        Self {
            chunk_size,
            channel_capacity,
        }
    }

    /// Set the chunk size
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: ChunkSize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set a fixed channel capacity
    #[must_use]
    pub const fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = Some(capacity);
        self
    }

    /// Channel capacity for a run over `records` input records. Never zero.
    #[must_use]
    pub fn channel_capacity_for(&self, records: usize) -> usize {
        self.channel_capacity.unwrap_or(records).max(1)
    }
}
