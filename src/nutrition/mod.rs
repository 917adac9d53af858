//! Nutrition module
//!
//! Unit tags and normalization of food-database payloads.

pub mod normalizer;
pub mod units;

pub use normalizer::{normalize, normalize_with_fallback, NormalizeError};
pub use units::NutrientUnit;
