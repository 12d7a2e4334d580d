//! Deliveries per postcode, plus the in-window count for one target postcode.

use crate::projection::{LimitError, RecordProjection};
use recipe_stats_core::{
    AggregatorInput, PostcodeCount, PostcodeTimeCount, Record, TimeOfDay, POSTCODE_MAX_LEN,
};
use std::collections::HashMap;

/// Counts deliveries for every postcode seen and, separately, deliveries to
/// the configured postcode whose whole window lies inside the configured one.
#[derive(Debug, Clone)]
pub struct PostcodeAggregator {
    counts: HashMap<String, usize>,
    target_postcode: String,
    window_from: TimeOfDay,
    window_to: TimeOfDay,
    window_count: usize,
}

impl PostcodeAggregator {
    /// Create an aggregator counting in-window deliveries to `target_postcode`.
    #[must_use]
    pub fn new(
        target_postcode: impl Into<String>,
        window_from: TimeOfDay,
        window_to: TimeOfDay,
    ) -> Self {
        Self {
            counts: HashMap::new(),
            target_postcode: target_postcode.into(),
            window_from,
            window_to,
            window_count: 0,
        }
    }

    /// Create an aggregator from the shared settings bundle.
    #[must_use]
    pub fn from_input(input: &AggregatorInput) -> Self {
        Self::new(
            input.postcode.clone(),
            input.delivery_from.clone(),
            input.delivery_to.clone(),
        )
    }

    /// Count one delivery.
    ///
    /// A postcode over the length limit is not counted, silently. The window
    /// count is bumped when the postcode is the target and both ends of the
    /// delivery window fall inside the configured window.
    pub fn aggregate(&mut self, record: &Record) {
        if let Err(e) = self.add(record) {
            tracing::trace!(error = %e, "Skipping postcode count");
        }

        if self.is_target(record) && self.in_window(record) {
            self.window_count += 1;
        }
    }

    fn add(&mut self, record: &Record) -> Result<(), LimitError> {
        if record.postcode.len() > POSTCODE_MAX_LEN {
            return Err(LimitError::PostcodeTooLong {
                postcode: record.postcode.clone(),
                limit: POSTCODE_MAX_LEN,
            });
        }
        *self.counts.entry(record.postcode.clone()).or_insert(0) += 1;
        Ok(())
    }

    fn is_target(&self, record: &Record) -> bool {
        record.postcode == self.target_postcode
    }

    fn in_window(&self, record: &Record) -> bool {
        record.window().is_some_and(|(from, to)| {
            from.inclusive_between(&self.window_from, &self.window_to)
                && to.inclusive_between(&self.window_from, &self.window_to)
        })
    }

    /// The postcode with the most deliveries, or `("n/a", 0)` if none.
    ///
    /// Ties go to the lexicographically smallest postcode so the result does
    /// not depend on hash map iteration order.
    #[must_use]
    pub fn busiest_postcode(&self) -> PostcodeCount {
        self.counts
            .iter()
            .fold(None, |best: Option<(&String, usize)>, (postcode, &count)| match best {
                Some((best_postcode, best_count))
                    if best_count > count || (best_count == count && best_postcode < postcode) =>
                {
                    best
                }
                _ => Some((postcode, count)),
            })
            .map_or_else(PostcodeCount::none, |(postcode, count)| PostcodeCount {
                postcode: postcode.clone(),
                delivery_count: count,
            })
    }

    /// The configured postcode and window with the number of matching deliveries.
    #[must_use]
    pub fn window_count(&self) -> PostcodeTimeCount {
        PostcodeTimeCount {
            postcode: self.target_postcode.clone(),
            from: self.window_from.to_string(),
            to: self.window_to.to_string(),
            delivery_count: self.window_count,
        }
    }

    /// Deliveries counted for `postcode`.
    #[must_use]
    pub fn count_for(&self, postcode: &str) -> usize {
        self.counts.get(postcode).copied().unwrap_or(0)
    }

    /// Number of distinct postcodes counted.
    #[must_use]
    pub fn distinct_postcodes(&self) -> usize {
        self.counts.len()
    }
}

impl RecordProjection for PostcodeAggregator {
    fn name(&self) -> &'static str {
        "postcodes"
    }

    fn apply(&mut self, record: &Record) {
        self.aggregate(record);
    }
}
