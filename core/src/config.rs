//! Aggregation settings.
//!
//! An [`AggregatorInput`] is built once, typically from command-line flags,
//! and handed by value to the processor. Nothing in the pipeline mutates it.
//!
//! # Example
//!
//! ```
//! use recipe_stats_core::{AggregatorInput, TimeOfDay};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let input = AggregatorInput::new(
//!     "10245",
//!     TimeOfDay::parse("10AM")?,
//!     TimeOfDay::parse("3PM")?,
//! )
//! .with_terms(["Potato", "Veggie"]);
//!
//! input.validate()?;
//! assert_eq!(input.terms.len(), 2);
//! # Ok(())
//! # }
//! ```

use crate::error::ConfigError;
use crate::time_of_day::{Meridiem, TimeOfDay};

/// Maximum postcode length, in bytes.
pub const POSTCODE_MAX_LEN: usize = 10;

/// Maximum recipe name length, in bytes.
pub const RECIPE_NAME_MAX_LEN: usize = 100;

/// Postcode counted within the window when none is configured.
pub const DEFAULT_POSTCODE: &str = "10120";

/// Recipe name terms matched when none are configured.
pub const DEFAULT_TERMS: [&str; 3] = ["Potato", "Veggie", "Mushroom"];

/// Settings for both aggregation concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorInput {
    /// Postcode whose in-window deliveries are counted
    pub postcode: String,
    /// Window start (inclusive)
    pub delivery_from: TimeOfDay,
    /// Window end (inclusive)
    pub delivery_to: TimeOfDay,
    /// Case-sensitive substrings matched against recipe names
    pub terms: Vec<String>,
}

impl AggregatorInput {
    /// Create settings with no match terms.
    #[must_use]
    pub fn new(
        postcode: impl Into<String>,
        delivery_from: TimeOfDay,
        delivery_to: TimeOfDay,
    ) -> Self {
        Self {
            postcode: postcode.into(),
            delivery_from,
            delivery_to,
            terms: Vec::new(),
        }
    }

    /// Replace the recipe name match terms.
    #[must_use]
    pub fn with_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Check the settings describe a countable postcode and a non-empty window.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyPostcode`] if the postcode is blank
    /// - [`ConfigError::PostcodeTooLong`] if it exceeds [`POSTCODE_MAX_LEN`]
    /// - [`ConfigError::InvertedWindow`] if `delivery_to` is before `delivery_from`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.postcode.trim().is_empty() {
            return Err(ConfigError::EmptyPostcode);
        }
        if self.postcode.len() > POSTCODE_MAX_LEN {
            return Err(ConfigError::PostcodeTooLong {
                postcode: self.postcode.clone(),
                limit: POSTCODE_MAX_LEN,
            });
        }
        if self.delivery_to.before(&self.delivery_from) {
            return Err(ConfigError::InvertedWindow {
                from: self.delivery_from.to_string(),
                to: self.delivery_to.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for AggregatorInput {
    fn default() -> Self {
        Self {
            postcode: DEFAULT_POSTCODE.to_string(),
            delivery_from: default_time(10, Meridiem::Am),
            delivery_to: default_time(3, Meridiem::Pm),
            terms: DEFAULT_TERMS.iter().map(ToString::to_string).collect(),
        }
    }
}

fn default_time(hour: u32, meridiem: Meridiem) -> TimeOfDay {
    TimeOfDay::new(hour, meridiem).unwrap_or_else(|_| TimeOfDay::midnight())
}
