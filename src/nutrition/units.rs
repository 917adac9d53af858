//! Nutrient unit tags
//!
//! Every nutrient has a fixed unit decided by the nutrient itself, never by
//! the data source or the user.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

/// Unit of a nutrient amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub enum NutrientUnit {
    /// Kilocalories (energy only)
    #[serde(rename = "kcal")]
    Kilocalorie,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "mg")]
    Milligram,
    #[serde(rename = "µg")]
    Microgram,
}

impl NutrientUnit {
    /// Get the display/storage tag for this unit
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientUnit::Kilocalorie => "kcal",
            NutrientUnit::Gram => "g",
            NutrientUnit::Milligram => "mg",
            NutrientUnit::Microgram => "µg",
        }
    }
}
