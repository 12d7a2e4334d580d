//! Error types shared across the pipeline.
//!
//! Only [`TimeOfDayError`] and [`RecordError`] travel between crates; the
//! runtime wraps the fatal input error in its own `ProcessError`.

use thiserror::Error;

/// Failure to read an hour/meridiem token such as `3PM`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeOfDayError {
    /// The text is not an hour between 1 and 12 followed by `AM` or `PM`
    #[error("invalid time of day '{0}': expected an hour 1-12 followed by AM or PM")]
    Invalid(String),
}

/// Per-record failures raised while validating and parsing input records.
///
/// These never abort a batch. A failing record is logged, optionally handed to
/// a dead-letter sink and left out of the report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// One of `recipe`, `postcode` or `delivery` is missing or blank
    #[error("one of required fields [postcode, delivery, recipe] is missing or blank")]
    MissingFields,

    /// The delivery text holds fewer than two time-of-day tokens
    #[error("invalid delivery time: {0}")]
    DeliveryWindow(String),

    /// A delivery token could not be read as a time of day
    #[error(transparent)]
    TimeOfDay(#[from] TimeOfDayError),
}

impl RecordError {
    /// Short, stable label used for metrics and structured logs.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::DeliveryWindow(_) => "delivery_window",
            Self::TimeOfDay(_) => "time_of_day",
        }
    }
}

/// Invalid aggregation settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The target postcode is blank
    #[error("target postcode cannot be empty")]
    EmptyPostcode,

    /// The target postcode exceeds the postcode length limit
    #[error("target postcode '{postcode}' is longer than limit: {limit}")]
    PostcodeTooLong {
        /// The rejected postcode
        postcode: String,
        /// Maximum postcode length in bytes
        limit: usize,
    },

    /// The window ends before it starts
    #[error(
        "invalid delivery window ({from} - {to}): delivery times are not date scoped, \
         'from' must not occur after 'to'"
    )]
    InvertedWindow {
        /// Window start as supplied
        from: String,
        /// Window end as supplied
        to: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_reasons() {
        assert_eq!(RecordError::MissingFields.reason(), "missing_fields");
        assert_eq!(
            RecordError::DeliveryWindow("Monday".to_string()).reason(),
            "delivery_window"
        );
        assert_eq!(
            RecordError::from(TimeOfDayError::Invalid("13PM".to_string())).reason(),
            "time_of_day"
        );
    }

    #[test]
    fn test_time_of_day_error_is_transparent() {
        let err = RecordError::from(TimeOfDayError::Invalid("0AM".to_string()));
        assert_eq!(
            err.to_string(),
            "invalid time of day '0AM': expected an hour 1-12 followed by AM or PM"
        );
    }
}
