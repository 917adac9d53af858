//! Error taxonomy surfaced to the user
//!
//! Every failure in a scan/save/delete flow ends up as one of these and is
//! reported back to the caller; none of them stop the server.

use serde::Serialize;
use thiserror::Error;

use crate::barcode::BarcodeError;
use crate::db::DbError;
use crate::lookup::LookupError;
use crate::nutrition::NormalizeError;

#[derive(Debug, Error)]
pub enum SmartFoodError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Invalid barcode: {0}")]
    InvalidBarcode(#[from] BarcodeError),

    #[error("Invalid food: {0}")]
    InvalidFood(String),

    #[error("Food not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Store(#[from] DbError),
}

pub type SmartFoodResult<T> = Result<T, SmartFoodError>;

impl SmartFoodError {
    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            SmartFoodError::Network(_) => "network_error",
            SmartFoodError::MalformedPayload(_) => "malformed_payload",
            SmartFoodError::MissingRequiredField(_) => "missing_required_field",
            SmartFoodError::InvalidBarcode(_) => "invalid_barcode",
            SmartFoodError::InvalidFood(_) => "invalid_food",
            SmartFoodError::NotFound(_) => "not_found",
            SmartFoodError::Store(_) => "store_error",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            kind: self.kind(),
        }
    }
}

impl From<LookupError> for SmartFoodError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::InvalidJson(msg) => SmartFoodError::MalformedPayload(msg),
            other => SmartFoodError::Network(other.to_string()),
        }
    }
}

impl From<NormalizeError> for SmartFoodError {
    fn from(e: NormalizeError) -> Self {
        match e {
            NormalizeError::MalformedPayload(msg) => SmartFoodError::MalformedPayload(msg),
            NormalizeError::MissingRequiredField(field) => {
                SmartFoodError::MissingRequiredField(field)
            }
        }
    }
}

/// Error body returned from tools
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_lookup_errors_map_to_taxonomy() {
        let e: SmartFoodError = LookupError::Timeout(Duration::from_secs(10)).into();
        assert_eq!(e.kind(), "network_error");

        let e: SmartFoodError = LookupError::InvalidJson("eof".into()).into();
        assert_eq!(e.kind(), "malformed_payload");
    }

    #[test]
    fn test_normalize_errors_keep_field_name() {
        let e: SmartFoodError = NormalizeError::MissingRequiredField("nutriments".into()).into();
        assert_eq!(e.to_string(), "Missing required field: nutriments");
        let body = e.to_response();
        assert_eq!(body.kind, "missing_required_field");
    }
}
