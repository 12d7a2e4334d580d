//! Aggregations over validated delivery records.
//!
//! # Overview
//!
//! Two independent read models are built from the same record stream:
//! - **`PostcodeAggregator`**: deliveries per postcode, the busiest postcode,
//!   and in-window deliveries for one target postcode
//! - **`RecipeAggregator`**: deliveries per recipe name and recipe name matches
//!
//! [`Aggregator`] composes both and is the single consumer of the stream:
//!
//! ```text
//! worker 1 ─┐
//! worker 2 ─┼─► channel ─► Aggregator::consume ─► PostcodeAggregator
//! worker N ─┘                                  └─► RecipeAggregator
//! ```
//!
//! # Example
//!
//! ```
//! use recipe_stats_core::{AggregatorInput, Record, TimeOfDay};
//! use recipe_stats_projections::Aggregator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let input = AggregatorInput::new("10245", TimeOfDay::parse("10AM")?, TimeOfDay::parse("3PM")?)
//!     .with_terms(["ea"]);
//! let record = Record::new("Pear", "10245", "Monday 11AM - 1PM")
//!     .with_window(TimeOfDay::parse("11AM")?, TimeOfDay::parse("1PM")?);
//!
//! let mut aggregator = Aggregator::new(&input);
//! aggregator.consume(futures::stream::iter(vec![record])).await;
//!
//! assert_eq!(aggregator.window_count().delivery_count, 1);
//! assert_eq!(aggregator.matching_recipes(), ["Pear"]);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod postcode;
pub mod projection;
pub mod recipe;

pub use aggregator::Aggregator;
pub use postcode::PostcodeAggregator;
pub use projection::{LimitError, RecordProjection};
pub use recipe::RecipeAggregator;
