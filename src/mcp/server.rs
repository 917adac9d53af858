//! SmartFood MCP Server Implementation
//!
//! Exposes the scan, save and pantry tools over MCP.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::error::SmartFoodResult;
use crate::lookup::FoodDatabaseClient;
use crate::models::FoodRecord;
use crate::store::RecordStore;
use crate::tools::foods;
use crate::tools::status::StatusTracker;

/// SmartFood MCP Service
#[derive(Clone)]
pub struct SmartFoodService {
    status_tracker: Arc<StatusTracker>,
    store: Arc<dyn RecordStore>,
    client: FoodDatabaseClient,
    tool_router: ToolRouter<SmartFoodService>,
}

impl SmartFoodService {
    pub fn new(
        database_path: PathBuf,
        store: Arc<dyn RecordStore>,
        client: FoodDatabaseClient,
        food_database_url: String,
    ) -> Self {
        Self {
            status_tracker: Arc::new(StatusTracker::new(database_path, food_database_url)),
            store,
            client,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupBarcodeParams {
    /// Decoded barcode text (EAN-8, EAN-13 or QR)
    pub barcode: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveFoodParams {
    /// Food record as returned by lookup_barcode, with the user's edits applied
    pub food: FoodRecord,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodIdParams {
    /// Food id (UUID)
    pub id: String,
}

/// Successful results become JSON text; failures become error results the
/// caller can show to the user.
fn respond<T: Serialize>(result: SmartFoodResult<T>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => {
            let json = serde_json::to_string_pretty(&value)
                .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
            Ok(CallToolResult::success(vec![Content::text(json)]))
        }
        Err(e) => {
            tracing::warn!(kind = e.kind(), error = %e, "Tool call failed");
            let json = serde_json::to_string_pretty(&e.to_response())
                .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
            Ok(CallToolResult::error(vec![Content::text(json)]))
        }
    }
}

#[tool_router]
impl SmartFoodService {
    // --- Status ---

    #[tool(description = "Get the current status of the SmartFood service including build info, database status, and saved food count")]
    fn smartfood_status(&self) -> Result<CallToolResult, McpError> {
        let status = self.status_tracker.get_status(self.store.as_ref());
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for the scan, edit and save workflow. Call this before the first lookup.")]
    fn scan_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::SCAN_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(SCAN_INSTRUCTIONS)]))
    }

    // --- Scan ---

    #[tool(description = "Look up a scanned barcode in Open Food Facts and return a food record with nutrition scaled to one serving. Does not save anything.")]
    async fn lookup_barcode(&self, Parameters(p): Parameters<LookupBarcodeParams>) -> Result<CallToolResult, McpError> {
        respond(foods::lookup_barcode(&self.client, self.store.as_ref(), &p.barcode).await)
    }

    // --- Pantry ---

    #[tool(description = "Save a food record (from lookup_barcode, optionally edited) to the pantry. Saving a record with an existing id replaces it.")]
    fn save_food(&self, Parameters(p): Parameters<SaveFoodParams>) -> Result<CallToolResult, McpError> {
        respond(foods::save_food(self.store.as_ref(), p.food))
    }

    #[tool(description = "List saved foods sorted by name")]
    fn list_foods(&self) -> Result<CallToolResult, McpError> {
        respond(foods::list_foods(self.store.as_ref()))
    }

    #[tool(description = "Get the full saved record for a food, including all nutrition facts")]
    fn get_food(&self, Parameters(p): Parameters<FoodIdParams>) -> Result<CallToolResult, McpError> {
        respond(foods::get_food(self.store.as_ref(), &p.id))
    }

    #[tool(description = "Delete a saved food")]
    fn delete_food(&self, Parameters(p): Parameters<FoodIdParams>) -> Result<CallToolResult, McpError> {
        respond(foods::delete_food(self.store.as_ref(), &p.id))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for SmartFoodService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "smartfood".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("SmartFood".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "SmartFood - barcode nutrition lookup and pantry. \
                 Call scan_instructions first. \
                 Scan: lookup_barcode returns an unsaved food record; save_food stores the edited record. \
                 Pantry: list_foods, get_food, delete_food. Status: smartfood_status."
                    .into(),
            ),
        }
    }
}
