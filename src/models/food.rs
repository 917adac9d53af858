//! Food record model
//!
//! A scanned product with its nutrition facts, scaled to one serving.

use rmcp::schemars;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::DbResult;
use super::NutritionFacts;

/// Serving label used when the source gives none
pub const SERVING_SIZE_UNKNOWN: &str = "N/A";

/// Serving mass used when the source gives none
pub const DEFAULT_SERVING_GRAMS: f64 = 100.0;

/// A food with nutrition facts for one serving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    #[schemars(with = "String")]
    pub id: Uuid,
    pub barcode: String,
    pub name: String,
    /// Human-readable serving label, e.g. "30g"
    pub serving_size: String,
    pub serving_size_grams: f64,
    pub nutrition_facts: NutritionFacts,
}

impl FoodRecord {
    /// New record with a fresh identifier
    pub fn new(
        barcode: impl Into<String>,
        name: impl Into<String>,
        serving_size: impl Into<String>,
        serving_size_grams: f64,
        nutrition_facts: NutritionFacts,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            barcode: barcode.into(),
            name: name.into(),
            serving_size: serving_size.into(),
            serving_size_grams,
            nutrition_facts,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let id: String = row.get("id")?;
        let id = Uuid::parse_str(&id)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

        // A damaged blob should not hide the rest of the pantry
        let blob: String = row.get("nutrition_facts")?;
        let nutrition_facts = serde_json::from_str(&blob).unwrap_or_else(|e| {
            tracing::warn!(id = %id, error = %e, "Stored nutrition facts unreadable, using empty facts");
            NutritionFacts::empty()
        });

        Ok(Self {
            id,
            barcode: row.get("barcode")?,
            name: row.get("name")?,
            serving_size: row.get("serving_size")?,
            serving_size_grams: row.get("serving_size_grams")?,
            nutrition_facts,
        })
    }

    /// Insert the record, or replace the stored copy with the same id
    pub fn upsert(conn: &Connection, record: &FoodRecord) -> DbResult<()> {
        let facts = serde_json::to_string(&record.nutrition_facts)?;

        conn.execute(
            r#"
            INSERT INTO foods (id, barcode, name, serving_size, serving_size_grams, nutrition_facts)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                barcode = excluded.barcode,
                name = excluded.name,
                serving_size = excluded.serving_size,
                serving_size_grams = excluded.serving_size_grams,
                nutrition_facts = excluded.nutrition_facts,
                updated_at = datetime('now')
            "#,
            params![
                record.id.to_string(),
                record.barcode,
                record.name,
                record.serving_size,
                record.serving_size_grams,
                facts,
            ],
        )?;

        Ok(())
    }

    /// Get a food by ID
    pub fn get_by_id(conn: &Connection, id: &Uuid) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM foods WHERE id = ?1")?;

        let result = stmt.query_row([id.to_string()], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All foods sorted by name (case-insensitive), then id
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM foods ORDER BY name COLLATE NOCASE ASC, name ASC, id ASC",
        )?;

        let items = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Foods saved under a barcode, most recently updated first
    pub fn find_by_barcode(conn: &Connection, barcode: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM foods WHERE barcode = ?1 ORDER BY updated_at DESC, id ASC",
        )?;

        let items = stmt
            .query_map([barcode], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM foods", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a food. Returns Ok(false) if not found.
    pub fn delete(conn: &Connection, id: &Uuid) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM foods WHERE id = ?1", [id.to_string()])?;
        Ok(rows > 0)
    }
}
