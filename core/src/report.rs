//! The summary report produced at the end of a run.

use serde::{Deserialize, Serialize};
use std::io::Write;

/// Postcode reported when no deliveries were aggregated.
pub const NO_POSTCODE: &str = "n/a";

/// Number of deliveries for one recipe name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeCount {
    /// Recipe name
    pub recipe: String,
    /// Number of deliveries
    pub count: usize,
}

/// Number of deliveries for one postcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostcodeCount {
    /// Postcode
    pub postcode: String,
    /// Number of deliveries
    pub delivery_count: usize,
}

impl PostcodeCount {
    /// The placeholder reported when nothing was aggregated.
    #[must_use]
    pub fn none() -> Self {
        Self {
            postcode: NO_POSTCODE.to_string(),
            delivery_count: 0,
        }
    }
}

/// Deliveries to one postcode that fall entirely inside a time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostcodeTimeCount {
    /// Target postcode
    pub postcode: String,
    /// Window start, as originally supplied
    pub from: String,
    /// Window end, as originally supplied
    pub to: String,
    /// Number of matching deliveries
    pub delivery_count: usize,
}

/// Final, read-only result of processing one input document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Number of distinct recipe names
    pub unique_recipe_count: usize,
    /// Per-recipe counts, sorted by recipe name ascending
    pub count_per_recipe: Vec<RecipeCount>,
    /// The postcode with the most deliveries
    pub busiest_postcode: PostcodeCount,
    /// Deliveries to the target postcode within the target window
    pub count_per_postcode_and_time: PostcodeTimeCount,
    /// Recipe names containing any of the match terms, ascending
    pub match_by_name: Vec<String>,
}

impl Report {
    /// Write the report as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying writer fails.
    pub fn write_pretty<W: Write>(&self, mut writer: W) -> Result<(), serde_json::Error> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n").map_err(serde_json::Error::io)?;
        writer.flush().map_err(serde_json::Error::io)
    }
}
