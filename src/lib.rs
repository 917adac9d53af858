//! SmartFood Library
//!
//! Barcode lookup against Open Food Facts, normalization of the returned
//! product into per-serving nutrition facts, and a local pantry store.

pub mod barcode;
pub mod build_info;
pub mod config;
pub mod db;
pub mod error;
pub mod lookup;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod store;
pub mod tools;
