//! Nutrition facts data structures
//!
//! A `NutritionFacts` value always carries the same fourteen nutrients in the
//! same order, each tagged with the unit fixed for that nutrient.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

use crate::nutrition::NutrientUnit;

/// The fourteen label nutrients, in label order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nutrient {
    TotalFat,
    SaturatedFat,
    TransFat,
    Cholesterol,
    Sodium,
    TotalCarbohydrate,
    DietaryFiber,
    TotalSugars,
    AddedSugars,
    Protein,
    VitaminD,
    Calcium,
    Iron,
    Potassium,
}

impl Nutrient {
    pub const ALL: [Nutrient; 14] = [
        Nutrient::TotalFat,
        Nutrient::SaturatedFat,
        Nutrient::TransFat,
        Nutrient::Cholesterol,
        Nutrient::Sodium,
        Nutrient::TotalCarbohydrate,
        Nutrient::DietaryFiber,
        Nutrient::TotalSugars,
        Nutrient::AddedSugars,
        Nutrient::Protein,
        Nutrient::VitaminD,
        Nutrient::Calcium,
        Nutrient::Iron,
        Nutrient::Potassium,
    ];

    /// Field-name stem used by Open Food Facts (`<stem>_100g`, `<stem>_value`)
    pub fn key_stem(&self) -> &'static str {
        match self {
            Nutrient::TotalFat => "fat",
            Nutrient::SaturatedFat => "saturated-fat",
            Nutrient::TransFat => "trans-fat",
            Nutrient::Cholesterol => "cholesterol",
            Nutrient::Sodium => "sodium",
            Nutrient::TotalCarbohydrate => "carbohydrates",
            Nutrient::DietaryFiber => "fiber",
            Nutrient::TotalSugars => "sugars",
            Nutrient::AddedSugars => "added-sugars",
            Nutrient::Protein => "proteins",
            Nutrient::VitaminD => "vitamin-d",
            Nutrient::Calcium => "calcium",
            Nutrient::Iron => "iron",
            Nutrient::Potassium => "potassium",
        }
    }

    pub fn unit(&self) -> NutrientUnit {
        match self {
            Nutrient::Cholesterol
            | Nutrient::Sodium
            | Nutrient::Calcium
            | Nutrient::Iron
            | Nutrient::Potassium => NutrientUnit::Milligram,
            Nutrient::VitaminD => NutrientUnit::Microgram,
            _ => NutrientUnit::Gram,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Nutrient::TotalFat => "Total Fat",
            Nutrient::SaturatedFat => "Saturated Fat",
            Nutrient::TransFat => "Trans Fat",
            Nutrient::Cholesterol => "Cholesterol",
            Nutrient::Sodium => "Sodium",
            Nutrient::TotalCarbohydrate => "Total Carbohydrate",
            Nutrient::DietaryFiber => "Dietary Fiber",
            Nutrient::TotalSugars => "Total Sugars",
            Nutrient::AddedSugars => "Added Sugars",
            Nutrient::Protein => "Protein",
            Nutrient::VitaminD => "Vitamin D",
            Nutrient::Calcium => "Calcium",
            Nutrient::Iron => "Iron",
            Nutrient::Potassium => "Potassium",
        }
    }
}

/// Amount, unit and optional percent daily value for one nutrient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NutrientInfo {
    pub amount: f64,
    pub unit: NutrientUnit,
    /// Reported by the source; absent means unknown, not zero
    pub percent_daily_value: Option<f64>,
}

impl NutrientInfo {
    /// Zero amount, no percent daily value
    pub fn empty(nutrient: Nutrient) -> Self {
        Self {
            amount: 0.0,
            unit: nutrient.unit(),
            percent_daily_value: None,
        }
    }
}

/// Energy plus the fourteen label nutrients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NutritionFacts {
    /// kcal
    pub calories: f64,
    pub total_fat: NutrientInfo,
    pub saturated_fat: NutrientInfo,
    pub trans_fat: NutrientInfo,
    pub cholesterol: NutrientInfo,
    pub sodium: NutrientInfo,
    pub total_carbohydrate: NutrientInfo,
    pub dietary_fiber: NutrientInfo,
    pub total_sugars: NutrientInfo,
    pub added_sugars: NutrientInfo,
    pub protein: NutrientInfo,
    pub vitamin_d: NutrientInfo,
    pub calcium: NutrientInfo,
    pub iron: NutrientInfo,
    pub potassium: NutrientInfo,
}

impl NutritionFacts {
    /// All amounts zero, no percent daily values, default units
    pub fn empty() -> Self {
        Self {
            calories: 0.0,
            total_fat: NutrientInfo::empty(Nutrient::TotalFat),
            saturated_fat: NutrientInfo::empty(Nutrient::SaturatedFat),
            trans_fat: NutrientInfo::empty(Nutrient::TransFat),
            cholesterol: NutrientInfo::empty(Nutrient::Cholesterol),
            sodium: NutrientInfo::empty(Nutrient::Sodium),
            total_carbohydrate: NutrientInfo::empty(Nutrient::TotalCarbohydrate),
            dietary_fiber: NutrientInfo::empty(Nutrient::DietaryFiber),
            total_sugars: NutrientInfo::empty(Nutrient::TotalSugars),
            added_sugars: NutrientInfo::empty(Nutrient::AddedSugars),
            protein: NutrientInfo::empty(Nutrient::Protein),
            vitamin_d: NutrientInfo::empty(Nutrient::VitaminD),
            calcium: NutrientInfo::empty(Nutrient::Calcium),
            iron: NutrientInfo::empty(Nutrient::Iron),
            potassium: NutrientInfo::empty(Nutrient::Potassium),
        }
    }

    pub fn get(&self, nutrient: Nutrient) -> &NutrientInfo {
        match nutrient {
            Nutrient::TotalFat => &self.total_fat,
            Nutrient::SaturatedFat => &self.saturated_fat,
            Nutrient::TransFat => &self.trans_fat,
            Nutrient::Cholesterol => &self.cholesterol,
            Nutrient::Sodium => &self.sodium,
            Nutrient::TotalCarbohydrate => &self.total_carbohydrate,
            Nutrient::DietaryFiber => &self.dietary_fiber,
            Nutrient::TotalSugars => &self.total_sugars,
            Nutrient::AddedSugars => &self.added_sugars,
            Nutrient::Protein => &self.protein,
            Nutrient::VitaminD => &self.vitamin_d,
            Nutrient::Calcium => &self.calcium,
            Nutrient::Iron => &self.iron,
            Nutrient::Potassium => &self.potassium,
        }
    }

    pub fn get_mut(&mut self, nutrient: Nutrient) -> &mut NutrientInfo {
        match nutrient {
            Nutrient::TotalFat => &mut self.total_fat,
            Nutrient::SaturatedFat => &mut self.saturated_fat,
            Nutrient::TransFat => &mut self.trans_fat,
            Nutrient::Cholesterol => &mut self.cholesterol,
            Nutrient::Sodium => &mut self.sodium,
            Nutrient::TotalCarbohydrate => &mut self.total_carbohydrate,
            Nutrient::DietaryFiber => &mut self.dietary_fiber,
            Nutrient::TotalSugars => &mut self.total_sugars,
            Nutrient::AddedSugars => &mut self.added_sugars,
            Nutrient::Protein => &mut self.protein,
            Nutrient::VitaminD => &mut self.vitamin_d,
            Nutrient::Calcium => &mut self.calcium,
            Nutrient::Iron => &mut self.iron,
            Nutrient::Potassium => &mut self.potassium,
        }
    }

    /// Iterate the nutrients in label order
    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, &NutrientInfo)> + '_ {
        Nutrient::ALL.iter().map(move |n| (*n, self.get(*n)))
    }

    /// Scale energy and every amount by a multiplier.
    /// Percent daily values are reported figures and are left as-is.
    pub fn scale(&self, multiplier: f64) -> Self {
        let mut scaled = self.clone();
        scaled.calories *= multiplier;
        for nutrient in Nutrient::ALL {
            scaled.get_mut(nutrient).amount *= multiplier;
        }
        scaled
    }

    /// Force every unit back to the fixed unit of its nutrient
    pub fn with_canonical_units(mut self) -> Self {
        for nutrient in Nutrient::ALL {
            self.get_mut(nutrient).unit = nutrient.unit();
        }
        self
    }

    /// Whether energy, every amount and every percent daily value is finite
    pub fn is_finite(&self) -> bool {
        self.calories.is_finite()
            && self.iter().all(|(_, info)| {
                info.amount.is_finite() && info.percent_daily_value.map_or(true, f64::is_finite)
            })
    }

    /// First negative amount found, if any (energy reported as "calories")
    pub fn first_negative(&self) -> Option<&'static str> {
        if self.calories < 0.0 {
            return Some("calories");
        }
        self.iter()
            .find_map(|(n, info)| (info.amount < 0.0).then(|| n.label()))
    }
}

impl Default for NutritionFacts {
    fn default() -> Self {
        Self::empty()
    }
}
