//! SmartFood
//!
//! An MCP server for barcode nutrition lookup and a local pantry.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use smartfood::build_info;
use smartfood::config::Config;
use smartfood::db;
use smartfood::lookup::FoodDatabaseClient;
use smartfood::mcp::SmartFoodService;
use smartfood::store::SqliteRecordStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log to stderr; stdout carries the MCP transport
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("smartfood=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let config = Config::from_env();
    tracing::info!(
        database = %config.database_path.display(),
        food_database = %config.api_base_url,
        timeout_secs = config.http_timeout.as_secs(),
        "Starting MCP server on stdio"
    );

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = db::Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        if db::migrations::needs_migration(conn)? {
            tracing::info!("Migrating database schema");
        }
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        tracing::info!(version, "Database ready");
        Ok(())
    })?;

    let client = FoodDatabaseClient::new(&config.api_base_url, config.http_timeout)?;
    let store = Arc::new(SqliteRecordStore::new(database));

    let service = SmartFoodService::new(
        config.database_path.clone(),
        store,
        client,
        config.api_base_url.clone(),
    );

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
