//! Record store
//!
//! Persistence seam for saved foods. The SQLite implementation is the only one
//! the server uses; the trait keeps the tool layer independent of it.

use uuid::Uuid;

use crate::db::{Database, DbResult};
use crate::models::FoodRecord;

pub trait RecordStore: Send + Sync {
    /// Insert the record, or replace the stored one with the same id
    fn save(&self, record: &FoodRecord) -> DbResult<()>;

    /// Returns false when no record has this id
    fn delete(&self, id: &Uuid) -> DbResult<bool>;

    fn get(&self, id: &Uuid) -> DbResult<Option<FoodRecord>>;

    /// Every record, sorted by name ascending
    fn list_all(&self) -> DbResult<Vec<FoodRecord>>;

    /// Saved records carrying this barcode
    fn find_by_barcode(&self, barcode: &str) -> DbResult<Vec<FoodRecord>>;

    fn count(&self) -> DbResult<i64>;
}

/// SQLite-backed store
#[derive(Clone)]
pub struct SqliteRecordStore {
    database: Database,
}

impl SqliteRecordStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

impl RecordStore for SqliteRecordStore {
    fn save(&self, record: &FoodRecord) -> DbResult<()> {
        self.database.with_conn(|conn| FoodRecord::upsert(conn, record))
    }

    fn delete(&self, id: &Uuid) -> DbResult<bool> {
        self.database.with_conn(|conn| FoodRecord::delete(conn, id))
    }

    fn get(&self, id: &Uuid) -> DbResult<Option<FoodRecord>> {
        self.database.with_conn(|conn| FoodRecord::get_by_id(conn, id))
    }

    fn list_all(&self) -> DbResult<Vec<FoodRecord>> {
        self.database.with_conn(FoodRecord::list_all)
    }

    fn find_by_barcode(&self, barcode: &str) -> DbResult<Vec<FoodRecord>> {
        self.database.with_conn(|conn| FoodRecord::find_by_barcode(conn, barcode))
    }

    fn count(&self) -> DbResult<i64> {
        self.database.with_conn(FoodRecord::count)
    }
}
