//! Data models
//!
//! Rust structs for food records and their nutrition facts.

mod food;
mod nutrition;

pub use food::{FoodRecord, DEFAULT_SERVING_GRAMS, SERVING_SIZE_UNKNOWN};
pub use nutrition::{Nutrient, NutrientInfo, NutritionFacts};
