//! SmartFood Status Tool
//!
//! Provides runtime status information about the SmartFood service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::store::RecordStore;

/// Usage notes returned by the `scan_instructions` tool
pub const SCAN_INSTRUCTIONS: &str = r#"
# SmartFood Scan Workflow

1. Scan the product barcode (EAN-8, EAN-13 or QR) and call `lookup_barcode`
   with the decoded text.
2. The result holds a `food` record with nutrition scaled to one serving
   (`servingSizeGrams`, 100 g when the product lists no serving). Nothing is
   saved yet. `already_saved` lists pantry entries with the same barcode.
3. Show the record to the user and apply their edits to name, serving label,
   serving grams, amounts and percent daily values. Units are fixed per
   nutrient and cannot be changed.
4. Call `save_food` with the edited record to store it in the pantry.

If a lookup fails the error says why (network, malformed payload, missing
name or nutriments). Tell the user and offer to scan again.

Pantry: `list_foods` (sorted by name), `get_food`, `delete_food`.
"#;

/// Runtime status
#[derive(Debug, Serialize)]
pub struct SmartFoodStatus {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub saved_foods: Option<i64>,
    pub food_database_url: String,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Tracks service start time for uptime
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    food_database_url: String,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, food_database_url: String) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            food_database_url,
        }
    }

    /// Get the current status
    pub fn get_status(&self, store: &dyn RecordStore) -> SmartFoodStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let saved_foods = match store.count() {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::warn!(error = %e, "Could not count saved foods");
                None
            }
        };

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        SmartFoodStatus {
            version: build_info.version,
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            saved_foods,
            food_database_url: self.food_database_url.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
