//! Per-record validation and delivery window parsing.

use recipe_stats_core::{Record, RecordError, TimeOfDay};
use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)] // constant pattern
static TIME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:1[0-2]|[1-9])[AP]M").expect("time token pattern is valid"));

/// Check that recipe, postcode and delivery text are all non-empty.
///
/// # Errors
///
/// Returns [`RecordError::MissingFields`] if any of them is empty.
pub fn validate_required_fields(record: &Record) -> Result<(), RecordError> {
    if record.recipe.is_empty() || record.postcode.is_empty() || record.delivery.is_empty() {
        return Err(RecordError::MissingFields);
    }
    Ok(())
}

/// Extract the delivery window from free text such as `Wednesday 1PM - 5PM`.
///
/// The first two time tokens found anywhere in the text are the start and
/// end; anything else, including further tokens, is ignored.
///
/// # Errors
///
/// Returns [`RecordError::DeliveryWindow`] if fewer than two tokens are
/// present, or [`RecordError::TimeOfDay`] if a token does not parse.
pub fn parse_delivery(delivery: &str) -> Result<(TimeOfDay, TimeOfDay), RecordError> {
    let mut tokens = TIME_TOKEN.find_iter(delivery).map(|m| m.as_str());
    match (tokens.next(), tokens.next()) {
        (Some(from), Some(to)) => Ok((TimeOfDay::parse(from)?, TimeOfDay::parse(to)?)),
        _ => Err(RecordError::DeliveryWindow(delivery.to_string())),
    }
}

/// Validate `record` and parse its delivery window.
///
/// # Errors
///
/// Returns the first failure from [`validate_required_fields`] or
/// [`parse_delivery`].
pub fn parse_record(record: &Record) -> Result<(TimeOfDay, TimeOfDay), RecordError> {
    validate_required_fields(record)?;
    parse_delivery(&record.delivery)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use recipe_stats_testing::time;

    #[test]
    fn test_validate_required_fields() {
        let complete = Record::new("Honey", "10311", "Thursday 3PM - 4PM");
        assert!(validate_required_fields(&complete).is_ok());

        for record in [
            Record::new("", "10311", "Thursday 3PM - 4PM"),
            Record::new("Honey", "", "Thursday 3PM - 4PM"),
            Record::new("Honey", "10311", ""),
        ] {
            assert_eq!(validate_required_fields(&record), Err(RecordError::MissingFields));
        }
    }

    #[test]
    fn test_parse_delivery() {
        let (from, to) = parse_delivery("Wednesday 1PM - 5PM").unwrap();
        assert_eq!(from, time("1PM"));
        assert_eq!(to, time("5PM"));
        assert_eq!(to.to_string(), "5PM");
    }

    #[test]
    fn test_parse_delivery_ignores_words_and_extra_tokens() {
        let (from, to) = parse_delivery("from 10AM, until 12PM, maybe 3PM").unwrap();
        assert_eq!((from.as_str(), to.as_str()), ("10AM", "12PM"));
    }

    #[test]
    fn test_parse_delivery_needs_two_tokens() {
        for text in ["bad", "Monday 1PM", "Monday 0AM - 3pm", ""] {
            assert_eq!(
                parse_delivery(text),
                Err(RecordError::DeliveryWindow(text.to_string())),
                "{text}"
            );
        }
    }

    #[test]
    fn test_parse_delivery_takes_longest_valid_hour() {
        let (from, to) = parse_delivery("11AM-12PM").unwrap();
        assert_eq!((from.hour(), to.hour()), (11, 12));

        let (from, _) = parse_delivery("13PM - 4PM").unwrap();
        assert_eq!(from.as_str(), "3PM");
    }

    #[test]
    fn test_parse_record_checks_fields_first() {
        assert_eq!(
            parse_record(&Record::new("Steak", "", "bad")),
            Err(RecordError::MissingFields)
        );
        assert!(matches!(
            parse_record(&Record::new("Steak", "x", "bad")),
            Err(RecordError::DeliveryWindow(_))
        ));
    }
}
