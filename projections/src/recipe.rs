//! Deliveries per recipe name and recipe name matching.

use crate::projection::{LimitError, RecordProjection};
use recipe_stats_core::{AggregatorInput, RecipeCount, Record, RECIPE_NAME_MAX_LEN};
use std::collections::HashMap;

/// Counts deliveries per recipe name and, once finalized, lists the names
/// containing any configured term.
///
/// Read methods reflect the state as of the last [`finalize`](Self::finalize)
/// call; before it they report nothing.
#[derive(Debug, Clone, Default)]
pub struct RecipeAggregator {
    counts: HashMap<String, usize>,
    terms: Vec<String>,
    sorted_names: Vec<String>,
    matches: Vec<String>,
}

impl RecipeAggregator {
    /// Create an aggregator matching names against `terms` (case-sensitive).
    #[must_use]
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Create an aggregator from the shared settings bundle.
    #[must_use]
    pub fn from_input(input: &AggregatorInput) -> Self {
        Self::new(input.terms.iter().cloned())
    }

    /// Count one delivery. Names over the length limit are skipped silently.
    pub fn aggregate(&mut self, record: &Record) {
        if let Err(e) = self.add(record) {
            tracing::trace!(error = %e, "Skipping recipe count");
        }
    }

    fn add(&mut self, record: &Record) -> Result<(), LimitError> {
        if record.recipe.len() > RECIPE_NAME_MAX_LEN {
            return Err(LimitError::RecipeNameTooLong {
                recipe: record.recipe.clone(),
                limit: RECIPE_NAME_MAX_LEN,
            });
        }
        *self.counts.entry(record.recipe.clone()).or_insert(0) += 1;
        Ok(())
    }

    /// Sort the distinct names and compute the matches.
    ///
    /// Each name is listed once even if it contains several terms.
    pub fn finalize(&mut self) {
        let mut names: Vec<String> = self.counts.keys().cloned().collect();
        names.sort_unstable();

        self.matches = names
            .iter()
            .filter(|name| self.terms.iter().any(|term| name.contains(term.as_str())))
            .cloned()
            .collect();
        self.sorted_names = names;
    }

    /// Number of distinct recipe names.
    #[must_use]
    pub fn unique_recipe_count(&self) -> usize {
        self.sorted_names.len()
    }

    /// `(name, count)` pairs sorted by name ascending.
    #[must_use]
    pub fn recipe_counts_sorted(&self) -> Vec<RecipeCount> {
        self.sorted_names
            .iter()
            .map(|name| RecipeCount {
                recipe: name.clone(),
                count: self.counts.get(name).copied().unwrap_or(0),
            })
            .collect()
    }

    /// Names containing any configured term, ascending.
    #[must_use]
    pub fn matching_recipes(&self) -> &[String] {
        &self.matches
    }
}

impl RecordProjection for RecipeAggregator {
    fn name(&self) -> &'static str {
        "recipes"
    }

    fn apply(&mut self, record: &Record) {
        self.aggregate(record);
    }

    fn finalize(&mut self) {
        Self::finalize(self);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use recipe_stats_testing::mock_records;

    fn finalized(terms: &[&str], records: &[Record]) -> RecipeAggregator {
        let mut aggr = RecipeAggregator::new(terms.iter().copied());
        for record in records {
            aggr.aggregate(record);
        }
        aggr.finalize();
        aggr
    }

    #[test]
    fn test_counts_sorted_by_name() {
        let aggr = finalized(&[], &mock_records());

        assert_eq!(aggr.unique_recipe_count(), 5);
        let counts: Vec<(String, usize)> = aggr
            .recipe_counts_sorted()
            .into_iter()
            .map(|c| (c.recipe, c.count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("Apple".to_string(), 1),
                ("Honey".to_string(), 2),
                ("Pear".to_string(), 1),
                ("Salt".to_string(), 1),
                ("Steak".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_sorting_is_case_sensitive_byte_order() {
        let records =
            ["banana", "Zucchini", "apple", "Apple"].map(|name| Record::new(name, "1", "1AM 2AM"));
        let aggr = finalized(&[], &records);

        let names: Vec<String> = aggr
            .recipe_counts_sorted()
            .into_iter()
            .map(|c| c.recipe)
            .collect();
        assert_eq!(names, vec!["Apple", "Zucchini", "apple", "banana"]);
    }

    #[test]
    fn test_reads_are_stable_after_finalize() {
        let aggr = finalized(&["ea"], &mock_records());

        assert_eq!(aggr.recipe_counts_sorted(), aggr.recipe_counts_sorted());
        assert_eq!(aggr.matching_recipes(), aggr.matching_recipes());
    }

    #[test]
    fn test_reads_before_finalize_are_empty() {
        let mut aggr = RecipeAggregator::new(["ea"]);
        for record in &mock_records() {
            aggr.aggregate(record);
        }

        assert_eq!(aggr.unique_recipe_count(), 0);
        assert!(aggr.recipe_counts_sorted().is_empty());
        assert!(aggr.matching_recipes().is_empty());
    }

    #[test]
    fn test_matching_recipes() {
        let aggr = finalized(&["ea"], &mock_records());
        assert_eq!(aggr.matching_recipes(), ["Pear", "Steak"]);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let aggr = finalized(&["EA", "honey"], &mock_records());
        assert!(aggr.matching_recipes().is_empty());
    }

    #[test]
    fn test_name_matching_several_terms_is_listed_once() {
        let records = [Record::new("Steak and Pear", "1", ""), Record::new("Pear", "1", "")];
        let aggr = finalized(&["Pear", "Steak", "ea"], &records);

        assert_eq!(aggr.matching_recipes(), ["Pear", "Steak and Pear"]);
    }

    #[test]
    fn test_no_terms_match_nothing() {
        let aggr = finalized(&[], &mock_records());
        assert!(aggr.matching_recipes().is_empty());
    }

    #[test]
    fn test_long_recipe_name_is_skipped_silently() {
        let long_name = "x".repeat(RECIPE_NAME_MAX_LEN + 1);
        let limit_name = "y".repeat(RECIPE_NAME_MAX_LEN);
        let records = [Record::new(long_name, "1", ""), Record::new(limit_name.clone(), "1", "")];
        let aggr = finalized(&["x", "y"], &records);

        assert_eq!(aggr.unique_recipe_count(), 1);
        assert_eq!(aggr.matching_recipes(), [limit_name]);
    }

    #[test]
    fn test_recipe_name_limit_counts_bytes() {
        let wide_name = "é".repeat(51);
        let short_wide_name = "é".repeat(50);
        let records = [
            Record::new(wide_name, "1", ""),
            Record::new(short_wide_name.clone(), "1", ""),
        ];
        let aggr = finalized(&["é"], &records);

        assert_eq!(aggr.unique_recipe_count(), 1);
        assert_eq!(aggr.matching_recipes(), [short_wide_name]);
    }
}
