//! Food Tools
//!
//! The scan, edit and pantry gestures. A looked-up record is handed back to
//! the caller and only becomes durable when it is passed to `save_food`.

use serde::Serialize;
use uuid::Uuid;

use crate::barcode::{Barcode, Symbology};
use crate::error::{SmartFoodError, SmartFoodResult};
use crate::lookup::FoodDatabaseClient;
use crate::models::FoodRecord;
use crate::nutrition::normalize;
use crate::store::RecordStore;

/// Response for lookup_barcode
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub food: FoodRecord,
    pub symbology: Symbology,
    /// EAN check digit matches; always false for QR text
    pub check_digit_valid: bool,
    /// Ids of pantry entries already saved under this barcode
    pub already_saved: Vec<Uuid>,
}

/// Response for save_food
#[derive(Debug, Serialize)]
pub struct SaveFoodResponse {
    pub success: bool,
    pub id: Uuid,
    pub name: String,
}

/// One row of the pantry list
#[derive(Debug, Serialize)]
pub struct FoodSummary {
    pub id: Uuid,
    pub name: String,
    pub barcode: String,
    pub serving_size: String,
    pub calories: f64,
    pub total_fat: f64,
    pub total_fat_pdv: Option<f64>,
    pub total_carbohydrate: f64,
    pub total_carbohydrate_pdv: Option<f64>,
    pub protein: f64,
}

impl From<&FoodRecord> for FoodSummary {
    fn from(food: &FoodRecord) -> Self {
        let facts = &food.nutrition_facts;
        Self {
            id: food.id,
            name: food.name.clone(),
            barcode: food.barcode.clone(),
            serving_size: food.serving_size.clone(),
            calories: facts.calories,
            total_fat: facts.total_fat.amount,
            total_fat_pdv: facts.total_fat.percent_daily_value,
            total_carbohydrate: facts.total_carbohydrate.amount,
            total_carbohydrate_pdv: facts.total_carbohydrate.percent_daily_value,
            protein: facts.protein.amount,
        }
    }
}

/// Response for list_foods
#[derive(Debug, Serialize)]
pub struct ListFoodsResponse {
    pub items: Vec<FoodSummary>,
    pub total: usize,
}

/// Response for delete_food
#[derive(Debug, Serialize)]
pub struct DeleteFoodResponse {
    pub success: bool,
    pub deleted_id: Uuid,
}

/// Fetch and normalize the product behind a scanned barcode. Nothing is saved.
pub async fn lookup_barcode(
    client: &FoodDatabaseClient,
    store: &dyn RecordStore,
    raw_barcode: &str,
) -> SmartFoodResult<LookupResponse> {
    let barcode = Barcode::parse(raw_barcode)?;
    let check_digit_valid = barcode.has_valid_check_digit();
    if barcode.symbology() != Symbology::Qr && !check_digit_valid {
        tracing::warn!(barcode = %barcode, "EAN check digit mismatch, looking up anyway");
    }

    let payload = client.fetch_product(&barcode).await?;
    let food = normalize(barcode.as_str(), &payload)?;

    let already_saved = store
        .find_by_barcode(barcode.as_str())?
        .into_iter()
        .map(|f| f.id)
        .collect();

    tracing::info!(
        barcode = %barcode,
        symbology = barcode.symbology().as_str(),
        name = %food.name,
        "Looked up product"
    );

    Ok(LookupResponse {
        food,
        symbology: barcode.symbology(),
        check_digit_valid,
        already_saved,
    })
}

/// Save a (possibly edited) record. Units are reset to the fixed table.
pub fn save_food(store: &dyn RecordStore, mut food: FoodRecord) -> SmartFoodResult<SaveFoodResponse> {
    let name = food.name.trim().to_string();
    if name.is_empty() {
        return Err(SmartFoodError::InvalidFood("name cannot be empty".into()));
    }
    food.name = name;

    if !(food.serving_size_grams.is_finite() && food.serving_size_grams > 0.0) {
        return Err(SmartFoodError::InvalidFood(
            "servingSizeGrams must be greater than 0".into(),
        ));
    }
    if food.serving_size.trim().is_empty() {
        food.serving_size = crate::models::SERVING_SIZE_UNKNOWN.to_string();
    }

    let facts = &food.nutrition_facts;
    if !facts.is_finite() {
        return Err(SmartFoodError::InvalidFood("nutrition values must be finite numbers".into()));
    }
    if let Some(field) = facts.first_negative() {
        return Err(SmartFoodError::InvalidFood(format!("{} cannot be negative", field)));
    }
    food.nutrition_facts = food.nutrition_facts.with_canonical_units();

    store.save(&food)?;
    tracing::info!(id = %food.id, name = %food.name, "Saved food");

    Ok(SaveFoodResponse {
        success: true,
        id: food.id,
        name: food.name,
    })
}

/// Pantry contents sorted by name
pub fn list_foods(store: &dyn RecordStore) -> SmartFoodResult<ListFoodsResponse> {
    let foods = store.list_all()?;
    let items: Vec<FoodSummary> = foods.iter().map(FoodSummary::from).collect();
    let total = items.len();
    Ok(ListFoodsResponse { items, total })
}

pub fn get_food(store: &dyn RecordStore, id: &str) -> SmartFoodResult<FoodRecord> {
    let uuid = parse_id(id)?;
    store
        .get(&uuid)?
        .ok_or_else(|| SmartFoodError::NotFound(id.to_string()))
}

pub fn delete_food(store: &dyn RecordStore, id: &str) -> SmartFoodResult<DeleteFoodResponse> {
    let uuid = parse_id(id)?;
    if !store.delete(&uuid)? {
        return Err(SmartFoodError::NotFound(id.to_string()));
    }
    tracing::info!(id = %uuid, "Deleted food");

    Ok(DeleteFoodResponse {
        success: true,
        deleted_id: uuid,
    })
}

fn parse_id(id: &str) -> SmartFoodResult<Uuid> {
    Uuid::parse_str(id.trim())
        .map_err(|_| SmartFoodError::InvalidFood(format!("'{}' is not a valid food id", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutritionFacts;
    use crate::nutrition::NutrientUnit;
    use crate::store::tests::memory_store;
    use std::time::Duration;

    fn scanned(name: &str) -> FoodRecord {
        let mut facts = NutritionFacts::empty();
        facts.calories = 110.0;
        facts.total_fat.amount = 3.0;
        facts.total_fat.percent_daily_value = Some(4.0);
        FoodRecord::new("5000112637922", name, "1 bar (25g)", 25.0, facts)
    }

    #[test]
    fn test_save_list_get_delete() {
        let store = memory_store();
        let b = save_food(&store, scanned("Oat Bar")).unwrap();
        let a = save_food(&store, scanned("  Apricot Bites ")).unwrap();
        assert_eq!(a.name, "Apricot Bites");

        let list = list_foods(&store).unwrap();
        assert_eq!(list.total, 2);
        assert_eq!(list.items[0].name, "Apricot Bites");
        assert_eq!(list.items[1].name, "Oat Bar");
        assert_eq!(list.items[1].total_fat_pdv, Some(4.0));

        let food = get_food(&store, &b.id.to_string()).unwrap();
        assert_eq!(food.name, "Oat Bar");

        let deleted = delete_food(&store, &b.id.to_string()).unwrap();
        assert!(deleted.success);
        assert!(matches!(
            get_food(&store, &b.id.to_string()),
            Err(SmartFoodError::NotFound(_))
        ));
    }

    #[test]
    fn test_save_edited_record_replaces_it() {
        let store = memory_store();
        let mut food = scanned("Oat Bar");
        save_food(&store, food.clone()).unwrap();

        food.nutrition_facts.calories = 95.0;
        save_food(&store, food.clone()).unwrap();

        assert_eq!(list_foods(&store).unwrap().total, 1);
        assert_eq!(get_food(&store, &food.id.to_string()).unwrap().nutrition_facts.calories, 95.0);
    }

    #[test]
    fn test_save_resets_units() {
        let store = memory_store();
        let mut food = scanned("Oat Bar");
        food.nutrition_facts.iron.unit = NutrientUnit::Gram;
        save_food(&store, food.clone()).unwrap();

        let loaded = get_food(&store, &food.id.to_string()).unwrap();
        assert_eq!(loaded.nutrition_facts.iron.unit, NutrientUnit::Milligram);
    }

    #[test]
    fn test_save_rejects_invalid_edits_and_keeps_state() {
        let store = memory_store();

        let mut blank = scanned("x");
        blank.name = "   ".into();
        let mut zero_serving = scanned("Zero");
        zero_serving.serving_size_grams = 0.0;
        let mut negative = scanned("Negative");
        negative.nutrition_facts.sodium.amount = -1.0;
        let mut nan = scanned("Nan");
        nan.nutrition_facts.calories = f64::NAN;

        for food in [blank, zero_serving, negative, nan] {
            let err = save_food(&store, food).unwrap_err();
            assert_eq!(err.kind(), "invalid_food");
        }
        assert_eq!(list_foods(&store).unwrap().total, 0);
    }

    #[test]
    fn test_delete_unknown_and_bad_ids() {
        let store = memory_store();
        let err = delete_food(&store, &Uuid::new_v4().to_string()).unwrap_err();
        assert_eq!(err.kind(), "not_found");

        let err = delete_food(&store, "banana").unwrap_err();
        assert_eq!(err.kind(), "invalid_food");
    }

    #[tokio::test]
    async fn test_lookup_normalizes_and_reports_saved_copies() {
        let store = memory_store();
        let mut earlier = scanned("Nutella");
        earlier.barcode = "3017620422003".into();
        save_food(&store, earlier.clone()).unwrap();

        let (base, server) = crate::lookup::tests::serve_once(
            "HTTP/1.1 200 OK",
            r#"{"code":"3017620422003","status":1,"product":{
                "product_name":"Nutella",
                "serving_size":"15 g",
                "serving_quantity":15,
                "nutriments":{
                    "energy-kcal_100g":539,
                    "fat_100g":30.9,
                    "fat_value":12,
                    "sugars_100g":56.3,
                    "proteins_100g":6.3
                }}}"#,
        )
        .await;
        let client = FoodDatabaseClient::new(&base, Duration::from_secs(5)).unwrap();

        let lookup = lookup_barcode(&client, &store, " 3017620422003\n").await.unwrap();
        assert_eq!(
            server.await.unwrap(),
            "GET /api/v0/product/3017620422003.json HTTP/1.1"
        );

        assert_eq!(lookup.symbology, Symbology::Ean13);
        assert!(lookup.check_digit_valid);
        assert_eq!(lookup.already_saved, vec![earlier.id]);

        let food = &lookup.food;
        assert_ne!(food.id, earlier.id);
        assert_eq!(food.name, "Nutella");
        assert_eq!(food.barcode, "3017620422003");
        assert_eq!(food.serving_size, "15 g");
        assert_eq!(food.serving_size_grams, 15.0);
        assert_eq!(food.nutrition_facts.calories, 539.0 * 0.15);
        assert_eq!(food.nutrition_facts.total_fat.amount, 30.9 * 0.15);
        assert_eq!(food.nutrition_facts.total_fat.percent_daily_value, Some(12.0));
        assert_eq!(food.nutrition_facts.iron.amount, 0.0);

        // Lookup alone never saves
        assert_eq!(list_foods(&store).unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_lookup_rejects_empty_barcode_before_network() {
        let store = memory_store();
        let client = FoodDatabaseClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = lookup_barcode(&client, &store, "  ").await.unwrap_err();
        assert_eq!(err.kind(), "invalid_barcode");
    }

    #[tokio::test]
    async fn test_lookup_network_failure_is_surfaced() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store = memory_store();
        let client =
            FoodDatabaseClient::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
        let err = lookup_barcode(&client, &store, "3017620422003").await.unwrap_err();
        assert_eq!(err.kind(), "network_error");
    }
}
