//! # Recipe Stats Testing
//!
//! Shared fixtures for the recipe delivery statistics crates.
//!
//! This crate provides:
//! - A small sample input document and the records it parses into
//! - Helpers for building times of day and parsed records in one line
//! - The aggregation settings most tests run with
//! - proptest strategies for generating raw input records
//!
//! ## Example
//!
//! ```
//! use recipe_stats_core::Record;
//! use recipe_stats_testing::{mock_data, mock_records};
//!
//! let decoded = Record::decode_all(mock_data().as_bytes()).unwrap();
//! assert_eq!(decoded.len(), mock_records().len());
//! ```

use recipe_stats_core::{AggregatorInput, Record, TimeOfDay};

/// Mock data and fixture builders.
pub mod mocks {
    use super::{AggregatorInput, Record, TimeOfDay};

    /// Parse a time of day known to be valid.
    ///
    /// # Panics
    ///
    /// Panics if `text` is not a valid time of day. Only call with literals.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn time(text: &str) -> TimeOfDay {
        TimeOfDay::parse(text).expect("fixture time of day should parse")
    }

    /// A record whose delivery window has already been parsed.
    ///
    /// The delivery text is rendered as `"<from> - <to>"`.
    ///
    /// # Panics
    ///
    /// Panics if `from` or `to` is not a valid time of day.
    #[must_use]
    pub fn parsed_record(recipe: &str, postcode: &str, from: &str, to: &str) -> Record {
        Record::new(recipe, postcode, format!("{from} - {to}")).with_window(time(from), time(to))
    }

    /// Settings used by most tests: postcode `10245`, window `10AM`-`3PM`,
    /// match term `ea`.
    ///
    /// # Panics
    ///
    /// Never in practice; the window bounds are literals.
    #[must_use]
    pub fn default_input() -> AggregatorInput {
        AggregatorInput::new("10245", time("10AM"), time("3PM")).with_terms(["ea"])
    }

    /// Six deliveries across three postcodes and five recipes.
    ///
    /// Matches [`mock_records`] one to one.
    #[must_use]
    pub const fn mock_data() -> &'static str {
        r#"
  [{
    "postcode": "10245",
    "recipe": "Apple",
    "delivery": "Wednesday 1PM - 5PM"
  },
  {
    "postcode": "10245",
    "recipe": "Steak",
    "delivery": "Thursday 10AM - 2PM"
  },
  {
    "postcode": "10245",
    "recipe": "Salt",
    "delivery": "Thursday 12PM - 2PM"
  },
  {
    "postcode": "10342",
    "recipe": "Pear",
    "delivery": "Thursday 8PM - 11PM"
  },
  {
    "postcode": "10311",
    "recipe": "Honey",
    "delivery": "Thursday 3PM - 4PM"
  },
  {
    "postcode": "10311",
    "recipe": "Honey",
    "delivery": "Thursday 3PM - 4PM"
  }]
"#
    }

    /// The records in [`mock_data`], already parsed.
    ///
    /// # Panics
    ///
    /// Never in practice; every time is a literal.
    #[must_use]
    pub fn mock_records() -> Vec<Record> {
        [
            ("Apple", "10245", "Wednesday 1PM - 5PM", "1PM", "5PM"),
            ("Steak", "10245", "Thursday 10AM - 2PM", "10AM", "2PM"),
            ("Salt", "10245", "Thursday 12PM - 2PM", "12PM", "2PM"),
            ("Pear", "10342", "Thursday 8PM - 11PM", "8PM", "11PM"),
            ("Honey", "10311", "Thursday 3PM - 4PM", "3PM", "4PM"),
            ("Honey", "10311", "Thursday 3PM - 4PM", "3PM", "4PM"),
        ]
        .into_iter()
        .map(|(recipe, postcode, delivery, from, to)| {
            Record::new(recipe, postcode, delivery).with_window(time(from), time(to))
        })
        .collect()
    }
}

/// proptest strategies for raw input.
pub mod properties {
    use super::Record;
    use proptest::prelude::*;

    /// A time token, e.g. `7AM`.
    pub fn time_token() -> impl Strategy<Value = String> {
        (1u32..=12, prop::bool::ANY)
            .prop_map(|(hour, pm)| format!("{hour}{}", if pm { "PM" } else { "AM" }))
    }

    /// A record that passes validation and delivery parsing.
    pub fn valid_record() -> impl Strategy<Value = Record> {
        (
            "[A-Z][a-z]{0,6}( [A-Z][a-z]{0,6})?",
            "10[0-9]{3}",
            "(Monday|Tuesday|Wednesday|Thursday|Friday)",
            time_token(),
            time_token(),
        )
            .prop_map(|(recipe, postcode, day, from, to)| {
                Record::new(recipe, postcode, format!("{day} {from} - {to}"))
            })
    }

    /// A record that fails validation or delivery parsing.
    pub fn invalid_record() -> impl Strategy<Value = Record> {
        prop_oneof![
            ("[A-Z][a-z]{1,6}", time_token(), time_token())
                .prop_map(|(recipe, from, to)| Record::new(recipe, "", format!("{from} - {to}"))),
            ("10[0-9]{3}", time_token(), time_token()).prop_map(|(postcode, from, to)| {
                Record::new("", postcode, format!("{from} - {to}"))
            }),
            ("[A-Z][a-z]{1,6}", "10[0-9]{3}")
                .prop_map(|(recipe, postcode)| Record::new(recipe, postcode, "")),
            ("[A-Z][a-z]{1,6}", "10[0-9]{3}", time_token()).prop_map(|(recipe, postcode, at)| {
                Record::new(recipe, postcode, format!("Sunday {at}"))
            }),
        ]
    }

    /// A mix of valid and invalid records, tagged with whether each is valid.
    pub fn mixed_records(max: usize) -> impl Strategy<Value = Vec<(Record, bool)>> {
        prop::collection::vec(
            prop_oneof![
                3 => valid_record().prop_map(|r| (r, true)),
                1 => invalid_record().prop_map(|r| (r, false)),
            ],
            0..max,
        )
    }
}

pub use mocks::{default_input, mock_data, mock_records, parsed_record, time};
