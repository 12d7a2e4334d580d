//! Records dropped by the pipeline and where they go.
//!
//! Workers hand every record that fails validation or delivery parsing to a
//! [`DeadLetterSink`], if one was configured. Sinks are shared by all workers
//! of a run, so they must accept concurrent sends.

use chrono::{DateTime, Utc};
use recipe_stats_core::Record;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

/// A record the pipeline could not use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetter {
    /// The record as it was decoded
    pub record: Record,

    /// Why it was dropped
    pub error_message: String,

    /// When it was dropped
    pub failed_at: DateTime<Utc>,
}

impl DeadLetter {
    /// Stamp `record` as failed now.
    #[must_use]
    pub fn new(record: Record, error_message: impl Into<String>) -> Self {
        Self {
            record,
            error_message: error_message.into(),
            failed_at: Utc::now(),
        }
    }
}

/// Destination for dropped records.
///
/// `send` must not block for long: it runs on the worker tasks.
pub trait DeadLetterSink: Send + Sync {
    /// Accept one dropped record.
    fn send(&self, letter: DeadLetter);
}

impl DeadLetterSink for mpsc::UnboundedSender<DeadLetter> {
    fn send(&self, letter: DeadLetter) {
        if mpsc::UnboundedSender::send(self, letter).is_err() {
            tracing::warn!("Dead letter receiver is closed, discarding record");
        }
    }
}

/// Bounded in-memory store of dropped records.
///
/// Entries are kept oldest first. When the queue is full the oldest entry is
/// discarded to make room. Clones share the same storage, so one handle can
/// be given to a [`Processor`](crate::Processor) and another kept for
/// inspection.
///
/// # Example
///
/// ```
/// use recipe_stats_core::Record;
/// use recipe_stats_runtime::{DeadLetter, DeadLetterQueue};
///
/// let dlq = DeadLetterQueue::new(2);
/// dlq.push(DeadLetter::new(Record::new("Steak", "", "bad"), "missing postcode"));
///
/// assert_eq!(dlq.len(), 1);
/// assert_eq!(dlq.drain()[0].record.recipe, "Steak");
/// assert!(dlq.is_empty());
/// ```
#[derive(Debug)]
pub struct DeadLetterQueue {
    queue: Arc<Mutex<VecDeque<DeadLetter>>>,
    max_size: usize,
}

impl DeadLetterQueue {
    /// Create an empty queue holding at most `max_size` entries.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            max_size,
        }
    }

    /// Append an entry, dropping the oldest one if the queue is full.
    ///
    /// A queue with `max_size` 0 stores nothing; each entry counts as dropped.
    pub fn push(&self, letter: DeadLetter) {
        if self.max_size == 0 {
            metrics::counter!("dlq_dropped_total").increment(1);
            tracing::debug!(
                recipe = %letter.record.recipe,
                "DLQ has no capacity, discarding entry"
            );
            return;
        }

        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);

        if queue.len() >= self.max_size {
            queue.pop_front();
            metrics::counter!("dlq_dropped_total").increment(1);
            tracing::warn!(max_size = self.max_size, "DLQ at capacity, dropping oldest entry");
        }

        queue.push_back(letter);

        // queue length is bounded by max_size
        #[allow(clippy::cast_precision_loss)]
        metrics::gauge!("dlq_size").set(queue.len() as f64);
        metrics::counter!("dlq_pushed_total").increment(1);

        tracing::debug!(queue_size = queue.len(), "Record added to dead letter queue");
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// `true` if no entries are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return every entry, oldest first.
    pub fn drain(&self) -> Vec<DeadLetter> {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let entries: Vec<_> = queue.drain(..).collect();

        metrics::gauge!("dlq_size").set(0.0);
        tracing::debug!(count = entries.len(), "Drained dead letter queue");

        entries
    }

    /// The oldest entry, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<DeadLetter> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .front()
            .cloned()
    }

    /// Maximum number of entries held.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Clone for DeadLetterQueue {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
            max_size: self.max_size,
        }
    }
}

impl Default for DeadLetterQueue {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl DeadLetterSink for DeadLetterQueue {
    fn send(&self, letter: DeadLetter) {
        self.push(letter);
    }
}
