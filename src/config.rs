//! Runtime configuration
//!
//! Read from environment variables:
//! - `SMARTFOOD_DATABASE_PATH`: SQLite file (default `<project>/data/smartfood.db`)
//! - `SMARTFOOD_API_BASE_URL`: food database host (default Open Food Facts)
//! - `SMARTFOOD_HTTP_TIMEOUT_SECS`: lookup timeout in seconds (default 10)

use std::path::PathBuf;
use std::time::Duration;

use crate::lookup::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub api_base_url: String,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = get("SMARTFOOD_DATABASE_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let api_base_url = get("SMARTFOOD_API_BASE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match get("SMARTFOOD_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(value = %raw, "Ignoring invalid SMARTFOOD_HTTP_TIMEOUT_SECS");
                    DEFAULT_TIMEOUT_SECS
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            database_path,
            api_base_url,
            http_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// `data/smartfood.db` next to the project root when run from target/, else
/// next to the executable
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("smartfood.db");
    path
}
