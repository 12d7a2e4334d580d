//! The capability shared by every aggregation over validated records.

use recipe_stats_core::Record;
use thiserror::Error;

/// A length limit violated while aggregating.
///
/// Aggregators never surface these to callers: the offending increment is
/// skipped and aggregation carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// Postcode longer than the postcode limit
    #[error("postcode: {postcode} is longer than limit: {limit}")]
    PostcodeTooLong {
        /// The offending postcode
        postcode: String,
        /// Maximum length in bytes
        limit: usize,
    },

    /// Recipe name longer than the recipe name limit
    #[error("recipe name: {recipe} is longer than limit: {limit}")]
    RecipeNameTooLong {
        /// The offending recipe name
        recipe: String,
        /// Maximum length in bytes
        limit: usize,
    },
}

/// A read model built from a stream of validated, parsed records.
///
/// Implementations are driven by a single consumer, so `apply` takes
/// `&mut self` and needs no interior locking.
pub trait RecordProjection {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Fold one record into the projection.
    fn apply(&mut self, record: &Record);

    /// Derive any post-aggregation state. Called exactly once, after the
    /// last `apply` and before any read.
    fn finalize(&mut self) {}
}
