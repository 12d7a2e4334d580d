//! Input delivery records.

use crate::time_of_day::TimeOfDay;
use serde::{Deserialize, Deserializer};

/// One delivery event as read from the input document.
///
/// Deserialization is lenient per object: missing fields and `null` values
/// become empty strings and unknown fields are ignored, so a malformed object
/// surfaces later as a per-record validation failure instead of failing the
/// whole document.
///
/// `from` and `to` are filled in once by the processor after the delivery
/// text has been parsed, and the record is read-only from then on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Record {
    /// Recipe name
    #[serde(default, deserialize_with = "string_or_null")]
    pub recipe: String,

    /// Delivery postcode
    #[serde(default, deserialize_with = "string_or_null")]
    pub postcode: String,

    /// Free-text delivery window, e.g. `Wednesday 1PM - 5PM`
    #[serde(default, deserialize_with = "string_or_null")]
    pub delivery: String,

    /// Start of the delivery window, once parsed
    #[serde(skip)]
    pub from: Option<TimeOfDay>,

    /// End of the delivery window, once parsed
    #[serde(skip)]
    pub to: Option<TimeOfDay>,
}

impl Record {
    /// Create an unparsed record.
    #[must_use]
    pub fn new(
        recipe: impl Into<String>,
        postcode: impl Into<String>,
        delivery: impl Into<String>,
    ) -> Self {
        Self {
            recipe: recipe.into(),
            postcode: postcode.into(),
            delivery: delivery.into(),
            from: None,
            to: None,
        }
    }

    /// Attach the parsed delivery window.
    #[must_use]
    pub fn with_window(mut self, from: TimeOfDay, to: TimeOfDay) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    /// The parsed delivery window, if the record has been parsed.
    #[must_use]
    pub const fn window(&self) -> Option<(&TimeOfDay, &TimeOfDay)> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }

    /// Decode a JSON array of records.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if `bytes` is not a JSON array of objects.
    pub fn decode_all(bytes: &[u8]) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

fn string_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
