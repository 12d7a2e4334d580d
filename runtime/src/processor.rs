//! The concurrent validate-and-aggregate pipeline.

use crate::chunk::to_chunks;
use crate::config::ProcessorConfig;
use crate::dead_letter::{DeadLetter, DeadLetterSink};
use crate::error::ProcessError;
use crate::metrics::PipelineMetrics;
use crate::parse::parse_record;
use futures::future::join_all;
use recipe_stats_core::{AggregatorInput, Record, Report};
use recipe_stats_projections::Aggregator;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Turns one input document into a [`Report`].
///
/// Records are split into chunks and each chunk is validated on its own
/// worker task. Valid records flow through one bounded channel to a single
/// consumer task that owns the [`Aggregator`]. Invalid records are logged,
/// counted and, when a sink is configured, handed to it.
///
/// The channel is closed only after every worker has finished, and the
/// report is read only after the consumer has drained it.
///
/// # Example
///
/// ```
/// use recipe_stats_runtime::{Processor, ProcessorConfig};
/// use recipe_stats_core::{AggregatorInput, TimeOfDay};
///
/// # #[tokio::main(flavor = "multi_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let input = AggregatorInput::new("10245", TimeOfDay::parse("10AM")?, TimeOfDay::parse("3PM")?)
///     .with_terms(["ea"]);
/// let processor = Processor::new(ProcessorConfig::default(), input);
///
/// let report = processor
///     .process(br#"[{"postcode": "10245", "recipe": "Steak", "delivery": "Monday 11AM - 1PM"}]"#)
///     .await?;
///
/// assert_eq!(report.unique_recipe_count, 1);
/// assert_eq!(report.count_per_postcode_and_time.delivery_count, 1);
/// assert_eq!(report.match_by_name, ["Steak"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Processor {
    config: ProcessorConfig,
    input: AggregatorInput,
    dead_letters: Option<Arc<dyn DeadLetterSink>>,
}

impl Processor {
    /// Create a processor with no dead-letter sink.
    #[must_use]
    pub const fn new(config: ProcessorConfig, input: AggregatorInput) -> Self {
        Self {
            config,
            input,
            dead_letters: None,
        }
    }

    /// Send dropped records to `sink`.
    #[must_use]
    pub fn with_dead_letter_sink(mut self, sink: Arc<dyn DeadLetterSink>) -> Self {
        self.dead_letters = Some(sink);
        self
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// The aggregation settings in use.
    #[must_use]
    pub const fn input(&self) -> &AggregatorInput {
        &self.input
    }

    /// Decode `bytes` as a JSON array of records and build the report.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::Deserialize`] if `bytes` is not a JSON array of
    /// record objects. Invalid individual records are not errors. Returns
    /// [`ProcessError::TaskFailed`] only if a pipeline task panicked.
    pub async fn process(&self, bytes: &[u8]) -> Result<Report, ProcessError> {
        let started = Instant::now();

        let records = Record::decode_all(bytes)?;
        let received = records.len();
        let capacity = self.config.channel_capacity_for(received);

        let chunks = to_chunks(records, self.config.chunk_size);
        tracing::debug!(
            chunk_size = %self.config.chunk_size,
            chunks = chunks.len(),
            records = received,
            "Partitioned records into chunks"
        );
        PipelineMetrics::record_received(received, chunks.len());

        let (tx, mut rx) = mpsc::channel(capacity);

        let mut aggregator = Aggregator::new(&self.input);
        let consumer = tokio::spawn(async move {
            aggregator
                .consume(futures::stream::poll_fn(move |cx| rx.poll_recv(cx)))
                .await;
            aggregator
        });

        let workers: Vec<_> = chunks
            .into_iter()
            .map(|chunk| tokio::spawn(run_worker(chunk, tx.clone(), self.dead_letters.clone())))
            .collect();

        let outcomes = join_all(workers).await;
        // Every worker is done; closing now cannot drop in-flight records.
        drop(tx);

        let mut totals = ChunkOutcome::default();
        for outcome in outcomes {
            totals.add(outcome?);
        }

        let aggregator = consumer.await?;
        let report = build_report(&aggregator);

        let elapsed = started.elapsed();
        PipelineMetrics::record_duration(elapsed);
        tracing::debug!(
            accepted = totals.accepted,
            rejected = totals.rejected,
            consumed = aggregator.consumed(),
            elapsed_ms = elapsed.as_millis(),
            "Processing complete"
        );

        Ok(report)
    }
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("config", &self.config)
            .field("input", &self.input)
            .field("dead_letters", &self.dead_letters.is_some())
            .finish()
    }
}

/// Assemble the report from a drained and finalized aggregator.
#[must_use]
pub fn build_report(aggregator: &Aggregator) -> Report {
    Report {
        unique_recipe_count: aggregator.unique_recipe_count(),
        count_per_recipe: aggregator.recipe_counts_sorted(),
        busiest_postcode: aggregator.busiest_postcode(),
        count_per_postcode_and_time: aggregator.window_count(),
        match_by_name: aggregator.matching_recipes().to_vec(),
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct ChunkOutcome {
    accepted: usize,
    rejected: usize,
}

impl ChunkOutcome {
    const fn add(&mut self, other: Self) {
        self.accepted += other.accepted;
        self.rejected += other.rejected;
    }
}

/// Validate one chunk in order, forwarding good records to the aggregator.
async fn run_worker(
    chunk: Vec<Record>,
    tx: mpsc::Sender<Record>,
    dead_letters: Option<Arc<dyn DeadLetterSink>>,
) -> ChunkOutcome {
    let mut outcome = ChunkOutcome::default();

    for record in chunk {
        match parse_record(&record) {
            Ok((from, to)) => {
                if tx.send(record.with_window(from, to)).await.is_err() {
                    tracing::error!("Aggregator stopped receiving, abandoning chunk");
                    break;
                }
                outcome.accepted += 1;
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    recipe = %record.recipe,
                    postcode = %record.postcode,
                    "Failed processing record"
                );
                PipelineMetrics::record_rejected(e.reason());
                if let Some(sink) = &dead_letters {
                    sink.send(DeadLetter::new(record, e.to_string()));
                }
                outcome.rejected += 1;
            }
        }
    }

    PipelineMetrics::record_accepted(outcome.accepted);
    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::chunk::ChunkSize;
    use crate::dead_letter::DeadLetterQueue;
    use recipe_stats_core::{PostcodeCount, NO_POSTCODE};
    use recipe_stats_testing::{default_input, mock_data, mock_records};

    #[tokio::test]
    async fn test_build_report_from_consumed_aggregator() {
        let mut aggr = Aggregator::new(&default_input());
        aggr.consume(futures::stream::iter(mock_records())).await;

        let report = build_report(&aggr);

        assert_eq!(report.unique_recipe_count, 5);
        assert_eq!(report.busiest_postcode.delivery_count, 3);
        assert_eq!(report.count_per_postcode_and_time.delivery_count, 2);
        assert_eq!(report.match_by_name, ["Pear", "Steak"]);
    }

    #[tokio::test]
    async fn test_process_on_current_thread_runtime() {
        let processor = Processor::new(
            ProcessorConfig::default().with_chunk_size(ChunkSize::new(1)),
            default_input(),
        );

        let report = processor.process(mock_data().as_bytes()).await.unwrap();

        assert_eq!(report.unique_recipe_count, 5);
        assert_eq!(report.count_per_recipe.iter().map(|c| c.count).sum::<usize>(), 6);
    }

    #[tokio::test]
    async fn test_tiny_channel_applies_backpressure_without_losing_records() {
        let config = ProcessorConfig::default()
            .with_chunk_size(ChunkSize::new(2))
            .with_channel_capacity(1);
        let processor = Processor::new(config, default_input());

        let report = processor.process(mock_data().as_bytes()).await.unwrap();

        assert_eq!(report.count_per_recipe.iter().map(|c| c.count).sum::<usize>(), 6);
    }

    #[tokio::test]
    async fn test_empty_document() {
        let processor = Processor::new(ProcessorConfig::default(), default_input());

        let report = processor.process(b"[]").await.unwrap();

        assert_eq!(report.unique_recipe_count, 0);
        assert!(report.count_per_recipe.is_empty());
        assert_eq!(report.busiest_postcode, PostcodeCount::none());
        assert_eq!(report.busiest_postcode.postcode, NO_POSTCODE);
        assert_eq!(report.count_per_postcode_and_time.delivery_count, 0);
        assert!(report.match_by_name.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_is_fatal() {
        let dlq = DeadLetterQueue::default();
        let processor = Processor::new(ProcessorConfig::default(), default_input())
            .with_dead_letter_sink(Arc::new(dlq.clone()));

        let err = processor.process(b"fff").await.unwrap_err();

        assert!(matches!(err, ProcessError::Deserialize(_)));
        assert!(dlq.is_empty());
    }

    #[tokio::test]
    async fn test_worker_reports_outcome() {
        let (tx, mut rx) = mpsc::channel(4);
        let dlq = DeadLetterQueue::default();
        let chunk = vec![
            Record::new("Honey", "10311", "Thursday 3PM - 4PM"),
            Record::new("Steak", "", "Thursday 3PM - 4PM"),
            Record::new("Salt", "10245", "whenever"),
        ];

        let outcome = run_worker(chunk, tx, Some(Arc::new(dlq.clone()))).await;

        assert_eq!((outcome.accepted, outcome.rejected), (1, 2));
        let forwarded = rx.recv().await.unwrap();
        assert_eq!(forwarded.recipe, "Honey");
        assert!(forwarded.window().is_some());
        assert!(rx.recv().await.is_none());

        let letters = dlq.drain();
        assert_eq!(letters.len(), 2);
        assert_eq!(letters[0].record.recipe, "Steak");
        assert_eq!(letters[1].error_message, "invalid delivery time: whenever");
    }

    #[test]
    fn test_debug_shows_sink_presence() {
        let processor = Processor::new(ProcessorConfig::default(), default_input())
            .with_dead_letter_sink(Arc::new(DeadLetterQueue::default()));
        assert!(format!("{processor:?}").contains("dead_letters: true"));
    }
}
