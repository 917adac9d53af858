//! Open Food Facts payload normalization
//!
//! Turns the loosely-typed product JSON returned by Open Food Facts into a
//! `FoodRecord` whose nutrient amounts are scaled to one serving.
//!
//! Default policy:
//! - `serving_size` missing or blank: "N/A"
//! - `serving_quantity` missing, non-numeric or not positive: fallback grams
//! - `<stem>_100g` missing or non-numeric: 0
//! - `<stem>_value` missing or non-numeric: no percent daily value
//!
//! Numbers may arrive as JSON numbers or as numeric strings.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{
    FoodRecord, Nutrient, NutrientInfo, NutritionFacts, DEFAULT_SERVING_GRAMS,
    SERVING_SIZE_UNKNOWN,
};

/// Key stem for energy in kilocalories
pub const ENERGY_KEY_STEM: &str = "energy-kcal";

/// Normalization failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),
}

/// Normalize with the default 100 g fallback serving
pub fn normalize(barcode: &str, payload: &Value) -> Result<FoodRecord, NormalizeError> {
    normalize_with_fallback(barcode, payload, DEFAULT_SERVING_GRAMS)
}

/// Normalize a raw product payload into a food record.
///
/// `fallback_serving_grams` is used when the payload has no usable
/// `serving_quantity`; a non-positive fallback is replaced by 100 g.
pub fn normalize_with_fallback(
    barcode: &str,
    payload: &Value,
    fallback_serving_grams: f64,
) -> Result<FoodRecord, NormalizeError> {
    let root = payload
        .as_object()
        .ok_or_else(|| NormalizeError::MalformedPayload("payload is not a JSON object".into()))?;

    let product = root
        .get("product")
        .and_then(Value::as_object)
        .ok_or_else(|| NormalizeError::MalformedPayload("no product object in payload".into()))?;

    let name = product
        .get("product_name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| NormalizeError::MissingRequiredField("product_name".into()))?;

    let nutriments = product
        .get("nutriments")
        .and_then(Value::as_object)
        .ok_or_else(|| NormalizeError::MissingRequiredField("nutriments".into()))?;

    let serving_size = product
        .get("serving_size")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(SERVING_SIZE_UNKNOWN);

    let fallback = if is_positive(fallback_serving_grams) {
        fallback_serving_grams
    } else {
        DEFAULT_SERVING_GRAMS
    };
    let serving_grams = product
        .get("serving_quantity")
        .and_then(read_number)
        .filter(|q| is_positive(*q))
        .unwrap_or(fallback);

    let facts = per_100g_facts(nutriments).scale(serving_grams / 100.0);
    if !facts.is_finite() {
        return Err(NormalizeError::MalformedPayload(format!(
            "nutrient values overflow at {} g per serving",
            serving_grams
        )));
    }

    tracing::debug!(
        barcode = %barcode,
        name = %name,
        serving_grams,
        "Normalized product payload"
    );

    Ok(FoodRecord::new(barcode, name, serving_size, serving_grams, facts))
}

/// Facts exactly as reported per 100 g, with reported percent daily values
fn per_100g_facts(nutriments: &Map<String, Value>) -> NutritionFacts {
    let mut facts = NutritionFacts::empty();
    facts.calories = amount_100g(nutriments, ENERGY_KEY_STEM);

    for nutrient in Nutrient::ALL {
        let stem = nutrient.key_stem();
        *facts.get_mut(nutrient) = NutrientInfo {
            amount: amount_100g(nutriments, stem),
            unit: nutrient.unit(),
            percent_daily_value: nutriments
                .get(&format!("{}_value", stem))
                .and_then(read_number),
        };
    }

    facts
}

fn amount_100g(nutriments: &Map<String, Value>, stem: &str) -> f64 {
    nutriments
        .get(&format!("{}_100g", stem))
        .and_then(read_number)
        .map(|v| v.max(0.0))
        .unwrap_or(0.0)
}

/// Finite number from a JSON number or numeric string
fn read_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
