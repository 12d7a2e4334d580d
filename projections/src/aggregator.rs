//! The single consumer that folds validated records into both projections.

use crate::postcode::PostcodeAggregator;
use crate::projection::RecordProjection;
use crate::recipe::RecipeAggregator;
use futures::{Stream, StreamExt};
use recipe_stats_core::{AggregatorInput, PostcodeCount, PostcodeTimeCount, RecipeCount, Record};

/// Owns the postcode and recipe aggregators and drives them from one stream.
///
/// This is the only place aggregation state is mutated. Producers may run in
/// parallel, but every record goes through [`consume`](Self::consume) on a
/// single task, so neither aggregator needs locking.
#[derive(Debug, Clone)]
pub struct Aggregator {
    postcodes: PostcodeAggregator,
    recipes: RecipeAggregator,
    consumed: usize,
}

impl Aggregator {
    /// Build both aggregators from one settings bundle.
    #[must_use]
    pub fn new(input: &AggregatorInput) -> Self {
        Self {
            postcodes: PostcodeAggregator::from_input(input),
            recipes: RecipeAggregator::from_input(input),
            consumed: 0,
        }
    }

    /// Drain `records` until it ends, then finalize.
    ///
    /// Each record is applied to the postcode aggregator and then to the
    /// recipe aggregator. The recipe aggregator is finalized exactly once,
    /// after the stream is exhausted.
    pub async fn consume<S>(&mut self, records: S)
    where
        S: Stream<Item = Record>,
    {
        let mut records = std::pin::pin!(records);
        while let Some(record) = records.next().await {
            self.apply(&record);
        }

        tracing::debug!(
            consumed = self.consumed,
            "Record stream is closed and drained, finalizing"
        );
        self.finalize();
    }

    fn apply(&mut self, record: &Record) {
        self.postcodes.apply(record);
        self.recipes.apply(record);
        self.consumed += 1;
    }

    fn finalize(&mut self) {
        let projections: [&mut dyn RecordProjection; 2] = [&mut self.postcodes, &mut self.recipes];
        for projection in projections {
            tracing::trace!(projection = projection.name(), "Finalizing projection");
            projection.finalize();
        }
    }

    /// Number of records consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    /// The postcode aggregator.
    #[must_use]
    pub const fn postcodes(&self) -> &PostcodeAggregator {
        &self.postcodes
    }

    /// The recipe aggregator.
    #[must_use]
    pub const fn recipes(&self) -> &RecipeAggregator {
        &self.recipes
    }

    /// See [`RecipeAggregator::unique_recipe_count`].
    #[must_use]
    pub fn unique_recipe_count(&self) -> usize {
        self.recipes.unique_recipe_count()
    }

    /// See [`RecipeAggregator::recipe_counts_sorted`].
    #[must_use]
    pub fn recipe_counts_sorted(&self) -> Vec<RecipeCount> {
        self.recipes.recipe_counts_sorted()
    }

    /// See [`RecipeAggregator::matching_recipes`].
    #[must_use]
    pub fn matching_recipes(&self) -> &[String] {
        self.recipes.matching_recipes()
    }

    /// See [`PostcodeAggregator::busiest_postcode`].
    #[must_use]
    pub fn busiest_postcode(&self) -> PostcodeCount {
        self.postcodes.busiest_postcode()
    }

    /// See [`PostcodeAggregator::window_count`].
    #[must_use]
    pub fn window_count(&self) -> PostcodeTimeCount {
        self.postcodes.window_count()
    }
}
