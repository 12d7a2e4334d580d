//! # Recipe Stats Core
//!
//! Core types for the recipe delivery statistics pipeline.
//!
//! This crate holds the data model shared by the aggregation projections,
//! the concurrent processor and the command-line front end. It performs no
//! I/O and owns no threads.
//!
//! ## Core Concepts
//!
//! - **`TimeOfDay`**: an hour on the 12-hour clock plus AM/PM, no date or timezone
//! - **`Record`**: one delivery event (recipe, postcode, delivery window text)
//! - **`AggregatorInput`**: immutable settings for the postcode window count and recipe matching
//! - **`Report`**: the final summary, built once and never mutated
//!
//! ## Error Taxonomy
//!
//! - [`TimeOfDayError`]: a token is not `<1-12><AM|PM>`
//! - [`RecordError`]: a single record failed validation or delivery parsing
//! - [`ConfigError`]: aggregation settings are unusable
//!
//! ## Example
//!
//! ```
//! use recipe_stats_core::{Record, TimeOfDay};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let records = Record::decode_all(
//!     br#"[{"postcode": "10245", "recipe": "Apple", "delivery": "Wednesday 1PM - 5PM"}]"#,
//! )?;
//! let record = records[0].clone().with_window(TimeOfDay::parse("1PM")?, TimeOfDay::parse("5PM")?);
//! assert!(record.window().is_some());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod record;
pub mod report;
pub mod time_of_day;

pub use config::{
    AggregatorInput, DEFAULT_POSTCODE, DEFAULT_TERMS, POSTCODE_MAX_LEN, RECIPE_NAME_MAX_LEN,
};
pub use error::{ConfigError, RecordError, TimeOfDayError};
pub use record::Record;
pub use report::{PostcodeCount, PostcodeTimeCount, RecipeCount, Report, NO_POSTCODE};
pub use time_of_day::{Meridiem, TimeOfDay};
