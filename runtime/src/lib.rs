//! # Recipe Stats Runtime
//!
//! The concurrent pipeline that turns an input document into a report.
//!
//! ## Core Components
//!
//! - **Processor**: decodes input, fans chunks out to workers and fans valid
//!   records back in to one aggregator
//! - **Chunking**: splits decoded records into per-worker slices
//! - **Parsing**: required-field checks and delivery window extraction
//! - **Dead letters**: where dropped records go, if anywhere
//! - **Metrics**: Prometheus counters for received, accepted and rejected records
//!
//! ## Pipeline
//!
//! ```text
//!                ┌─ worker(chunk 1) ─┐
//! JSON ─ decode ─┼─ worker(chunk 2) ─┼─ mpsc ─ Aggregator ─ Report
//!                └─ worker(chunk n) ─┘
//!                        │
//!                        └─ DeadLetterSink (invalid records)
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use recipe_stats_core::AggregatorInput;
//! use recipe_stats_runtime::{ChunkSize, DeadLetterQueue, Processor, ProcessorConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dlq = DeadLetterQueue::default();
//! let processor = Processor::new(
//!     ProcessorConfig::default().with_chunk_size(ChunkSize::new(100)),
//!     AggregatorInput::default(),
//! )
//! .with_dead_letter_sink(Arc::new(dlq.clone()));
//!
//! let input = br#"[
//!     {"postcode": "10120", "recipe": "Veggie Soup", "delivery": "Friday 11AM - 2PM"},
//!     {"postcode": "10120", "recipe": "Steak", "delivery": "soon"}
//! ]"#;
//! let report = processor.process(input).await?;
//!
//! assert_eq!(report.match_by_name, ["Veggie Soup"]);
//! assert_eq!(dlq.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod chunk;
pub mod config;
pub mod dead_letter;
pub mod error;
pub mod metrics;
pub mod parse;
pub mod processor;

pub use chunk::{to_chunks, ChunkSize};
pub use config::ProcessorConfig;
pub use dead_letter::{DeadLetter, DeadLetterQueue, DeadLetterSink};
pub use error::ProcessError;
pub use self::metrics::{MetricsError, MetricsRecorder, PipelineMetrics};
pub use processor::{build_report, Processor};
