//! JSON codec for external documents.
//!
//! Field-name mapping happens on the raw JSON tree, before typed
//! deserialization on the way in and after typed serialization on the way
//! out, so mapping rules never need to know about our struct shapes.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::document::ExternalDocument;
use super::error::SyncError;
use super::export::ExportKind;
use super::mapping::FieldMapping;

/// Parses a raw external document, applying inbound field mapping.
///
/// # Errors
///
/// Returns `SyncError::Parse` if the payload is not valid JSON or does not
/// match any known document kind.
pub fn parse_document(raw: &str, mapping: &FieldMapping) -> Result<ExternalDocument, SyncError> {
    let mut value: Value =
        serde_json::from_str(raw).map_err(|e| SyncError::Parse(e.to_string()))?;
    mapping.apply_inbound(&mut value);
    serde_json::from_value(value).map_err(|e| SyncError::Parse(e.to_string()))
}

/// Serializes a document for the external system, applying outbound mapping.
///
/// # Errors
///
/// Returns `SyncError::Parse` if serialization fails (should not happen for
/// well-formed documents).
pub fn serialize_document(
    document: &ExternalDocument,
    mapping: &FieldMapping,
) -> Result<String, SyncError> {
    let mut value = serde_json::to_value(document).map_err(|e| SyncError::Parse(e.to_string()))?;
    mapping.apply_outbound(&mut value);
    serde_json::to_string_pretty(&value).map_err(|e| SyncError::Parse(e.to_string()))
}

/// Names an export download: the export kind plus an ISO-8601 timestamp.
#[must_use]
pub fn export_file_name(kind: ExportKind, at: DateTime<Utc>) -> String {
    format!("{}_{}.json", kind.as_str(), at.format("%Y%m%dT%H%M%SZ"))
}
